//! 优化器错误类型
//!
//! 定义规则重写与代价搜索相关的错误类型，包括：
//! - 输入计划的模式错误
//! - 规则应用错误
//! - 搜索无解
//! - 预算耗尽（非致命，门面层转为告警）

use std::fmt;
use thiserror::Error;

use super::PlanError;

/// 优化器错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// 输入计划模式不匹配
    #[error("模式不匹配: {0}")]
    SchemaMismatch(String),

    /// 规则违反契约，例如改变了输出模式
    #[error("规则 {rule} 应用失败: {message}")]
    RuleApplicationError { rule: String, message: String },

    /// 根等价集在所需物理特征下没有可行计划
    #[error("等价集 #{set} 无法满足所需特征 {required}")]
    NoPlanFound { set: usize, required: String },

    /// 迭代次数、memo 规模或时间超出预算
    #[error("{planner} 超出预算: {limit}")]
    BudgetExceeded { planner: String, limit: String },

    /// 代价计算错误
    #[error("代价计算错误: {0}")]
    Cost(String),
}

impl OptimizeError {
    pub fn rule_application(rule: &str, message: impl Into<String>) -> Self {
        OptimizeError::RuleApplicationError {
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    /// 预算耗尽不算失败，调用方仍然拿到当前最优计划
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OptimizeError::BudgetExceeded { .. })
    }
}

impl From<PlanError> for OptimizeError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::SchemaMismatch(msg) => OptimizeError::SchemaMismatch(msg),
        }
    }
}

/// 优化器结果类型
pub type OptimizeResult<T> = Result<T, OptimizeError>;

/// 优化流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeStage {
    Rewrite,
    Search,
}

impl fmt::Display for OptimizeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizeStage::Rewrite => write!(f, "启发式重写"),
            OptimizeStage::Search => write!(f, "代价搜索"),
        }
    }
}

/// 门面层错误，附带出错阶段
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage}阶段失败: {source}")]
pub struct OptimizerError {
    pub stage: OptimizeStage,
    #[source]
    pub source: OptimizeError,
}

impl OptimizerError {
    pub fn new(stage: OptimizeStage, source: OptimizeError) -> Self {
        Self { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_error_display() {
        let err = OptimizeError::rule_application("JoinCommuteRule", "输出模式改变");
        assert!(err.to_string().contains("JoinCommuteRule"));
        assert!(err.is_fatal());

        let err = OptimizeError::BudgetExceeded {
            planner: "HepPlanner".to_string(),
            limit: "1000 次迭代".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("超出预算"));
    }

    #[test]
    fn test_plan_error_conversion() {
        let err: OptimizeError = PlanError::schema_mismatch("列 x 不存在").into();
        assert!(matches!(err, OptimizeError::SchemaMismatch(_)));
    }

    #[test]
    fn test_stage_wrapping() {
        let err = OptimizerError::new(
            OptimizeStage::Search,
            OptimizeError::NoPlanFound {
                set: 0,
                required: "[PHYSICAL]".to_string(),
            },
        );
        assert_eq!(err.stage, OptimizeStage::Search);
        assert!(err.to_string().contains("代价搜索"));
    }
}
