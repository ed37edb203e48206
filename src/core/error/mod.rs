//! 错误处理
//!
//! - `PlanError`：构造计划节点时的模式校验错误
//! - `OptimizeError`：规则应用与搜索过程中的错误
//! - `OptimizerError`：门面层返回的错误，标注出错阶段

use thiserror::Error;

pub mod optimize;

pub use optimize::{OptimizeError, OptimizeResult, OptimizeStage, OptimizerError};

/// 计划构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// 模式不匹配：列无法解析、类型不兼容、子节点数量错误等
    #[error("模式不匹配: {0}")]
    SchemaMismatch(String),
}

impl PlanError {
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        PlanError::SchemaMismatch(message.into())
    }
}

/// 计划构造结果类型
pub type PlanResult<T> = Result<T, PlanError>;
