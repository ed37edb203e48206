//! 表达式类型定义

use serde::{Deserialize, Serialize};

use crate::core::types::operators::{AggregateFunction, BinaryOperator, UnaryOperator};
use crate::core::value::Value;

/// 标量表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// 列引用
    Column(String),
    /// 字面量
    Literal(Value),
    /// 二元运算
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// 一元运算
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

/// 投影项：表达式及其输出列名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub expr: Expression,
    pub alias: String,
}

impl ProjectItem {
    pub fn new(expr: Expression, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// 聚合调用
///
/// `input` 为空表示 `COUNT(*)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCall {
    pub func: AggregateFunction,
    pub input: Option<String>,
    pub alias: String,
}

impl AggregateCall {
    pub fn new(func: AggregateFunction, input: Option<&str>, alias: impl Into<String>) -> Self {
        Self {
            func,
            input: input.map(str::to_string),
            alias: alias.into(),
        }
    }

    pub fn count_star(alias: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Count, None, alias)
    }
}
