//! 核心类型：值、数据类型、表达式、模式与错误

pub mod error;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{
    OptimizeError, OptimizeResult, OptimizeStage, OptimizerError, PlanError, PlanResult,
};
pub use schema::{ColumnOrigin, Field, Schema};
pub use types::{
    AggregateCall, AggregateFunction, BinaryOperator, DataType, Expression, ProjectItem,
    UnaryOperator,
};
pub use value::Value;
