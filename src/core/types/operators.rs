//! 操作符类型定义
//!
//! 定义表达式中使用的二元、一元操作符以及聚合函数

use serde::{Deserialize, Serialize};

/// 操作符特征定义
pub trait Operator {
    /// 获取操作符的名称
    fn name(&self) -> &str;

    /// 获取操作符的优先级
    fn precedence(&self) -> u8;

    /// 获取操作符的元数（操作数数量）
    fn arity(&self) -> usize;
}

/// 二元操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // 算术操作
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // 比较操作
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // 逻辑操作
    And,
    Or,
}

impl Operator for BinaryOperator {
    fn name(&self) -> &str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 3,
            BinaryOperator::Add | BinaryOperator::Subtract => 4,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 5,
        }
    }

    fn arity(&self) -> usize {
        2
    }
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// 交换左右操作数后的等价操作符，`a < b` 等价于 `b > a`
    pub fn flip(&self) -> BinaryOperator {
        match self {
            BinaryOperator::LessThan => BinaryOperator::GreaterThan,
            BinaryOperator::LessThanOrEqual => BinaryOperator::GreaterThanOrEqual,
            BinaryOperator::GreaterThan => BinaryOperator::LessThan,
            BinaryOperator::GreaterThanOrEqual => BinaryOperator::LessThanOrEqual,
            other => *other,
        }
    }
}

/// 一元操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Minus,
    Not,
    IsNull,
    IsNotNull,
}

impl Operator for UnaryOperator {
    fn name(&self) -> &str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "NOT",
            UnaryOperator::IsNull => "IS NULL",
            UnaryOperator::IsNotNull => "IS NOT NULL",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            UnaryOperator::Minus => 6,
            UnaryOperator::Not => 2,
            UnaryOperator::IsNull | UnaryOperator::IsNotNull => 3,
        }
    }

    fn arity(&self) -> usize {
        1
    }
}

/// 聚合函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Operator for AggregateFunction {
    fn name(&self) -> &str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    fn precedence(&self) -> u8 {
        10
    }

    fn arity(&self) -> usize {
        1
    }
}

impl AggregateFunction {
    /// 是否要求数值类型的输入
    pub fn requires_numeric(&self) -> bool {
        matches!(self, AggregateFunction::Sum | AggregateFunction::Avg)
    }
}
