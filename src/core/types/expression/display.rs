//! 表达式的文本形式
//!
//! 计划解释输出与 memo 摘要都依赖这里的格式，修改时两者会同时变化

use std::fmt;

use super::def::{AggregateCall, Expression, ProjectItem};
use crate::core::types::operators::{Operator, UnaryOperator};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Column(name) => write!(f, "{}", name),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Binary { left, op, right } => {
                write!(f, "({} {} {})", left, op.name(), right)
            }
            Expression::Unary { op, operand } => match op {
                UnaryOperator::Minus => write!(f, "-({})", operand),
                UnaryOperator::Not => write!(f, "NOT({})", operand),
                UnaryOperator::IsNull | UnaryOperator::IsNotNull => {
                    write!(f, "({} {})", operand, op.name())
                }
            },
        }
    }
}

impl fmt::Display for ProjectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Expression::Column(name) if *name == self.alias => write!(f, "{}", name),
            expr => write!(f, "{} AS {}", expr, self.alias),
        }
    }
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = self.input.as_deref().unwrap_or("*");
        write!(f, "{}({}) AS {}", self.func.name(), input, self.alias)
    }
}
