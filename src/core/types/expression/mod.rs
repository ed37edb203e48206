//! 标量表达式
//!
//! 计划节点上的谓词、投影表达式以及聚合调用。
//!
//! | 变体 | 用途 |
//! |------|------|
//! | `Column` | 列引用，可带表限定前缀，例如 `users.id` |
//! | `Literal` | 字面量值 |
//! | `Binary` | 二元运算 |
//! | `Unary` | 一元运算 |
//!
//! ```rust
//! use relopt::core::types::expression::Expression;
//!
//! let predicate = Expression::gt(Expression::column("age"), Expression::int(30));
//! assert_eq!(predicate.to_string(), "(age > 30)");
//! ```

mod constructors;
mod def;
mod display;
mod fold;
pub mod utils;

pub use def::{AggregateCall, Expression, ProjectItem};
pub use utils::{conjunction, split_conjunction};
