//! 优化引擎模块
//!
//! - `volcano` - 基于代价的规划器
//! - `exploration` - 代价搜索的规则触发记录与预算
//! - `optimizer` - 优化器门面

pub mod exploration;
pub mod optimizer;
pub mod volcano;

pub use exploration::ExplorationState;
pub use optimizer::{default_logical_rules, default_physical_rules, OptimizedPlan, OptimizerEngine};
pub use volcano::{VolcanoLimits, VolcanoOutcome, VolcanoPlanner};
