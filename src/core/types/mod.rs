//! 核心类型定义
//!
//! 数据类型、操作符以及表达式

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod expression;
pub mod operators;

pub use expression::{AggregateCall, Expression, ProjectItem};
pub use operators::{AggregateFunction, BinaryOperator, Operator, UnaryOperator};

/// 列与表达式的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    /// 仅用于 NULL 字面量
    Null,
    Boolean,
    Int,
    BigInt,
    Double,
    Varchar,
    Date,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::BigInt | DataType::Double)
    }

    /// 两个数值类型做算术运算后的结果类型
    pub fn widen(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) if t.is_numeric() || t == DataType::Null => {
                Some(t)
            }
            (a, b) if a.is_numeric() && b.is_numeric() => Some(a.max(b)),
            _ => None,
        }
    }

    /// 两个类型是否可以比较
    pub fn is_comparable_with(&self, other: &DataType) -> bool {
        self == other
            || *self == DataType::Null
            || *other == DataType::Null
            || (self.is_numeric() && other.is_numeric())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "NULL",
            DataType::Boolean => "BOOLEAN",
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Double => "DOUBLE",
            DataType::Varchar => "VARCHAR",
            DataType::Date => "DATE",
        };
        write!(f, "{}", name)
    }
}
