//! 查询优化器模块
//!
//! 提供基于代价的优化功能，包括统计信息、代价计算、memo 与优化引擎
//!
//! ## 模块结构
//!
//! - `stats` - 目录接口与内存目录
//! - `cost` - 行数估计与算子代价
//! - `core` - 代价类型
//! - `plan` - memo 与等价集
//! - `engine` - 代价搜索与优化器门面
//!
//! ## 使用示例
//!
//! ```rust
//! use relopt::config::Config;
//! use relopt::core::types::{DataType, Expression};
//! use relopt::query::optimizer::{InMemoryCatalog, OptimizerEngine, TableStatistics};
//! use relopt::query::planner::plan::{PlanBuilder, TraitSet};
//! use std::sync::Arc;
//!
//! let catalog = InMemoryCatalog::new().with_table(TableStatistics::new("orders", 1000));
//! let engine = OptimizerEngine::new(Arc::new(catalog), Config::default());
//!
//! let mut builder = PlanBuilder::new();
//! let scan = builder.scan("orders", &[("qty", DataType::Int)]).unwrap();
//! let tree = builder
//!     .filter(scan, Expression::gt(Expression::column("qty"), Expression::int(0)))
//!     .unwrap();
//!
//! let optimized = engine.optimize(&tree, &TraitSet::physical()).unwrap();
//! assert!(optimized.plan.is_physical_tree());
//! ```

pub mod core;
pub mod cost;
pub mod engine;
pub mod plan;
pub mod stats;

pub use self::core::Cost;

pub use cost::{CostCalculator, CostModelConfig, InputEstimate, SelectivityEstimator};

pub use engine::{
    default_logical_rules, default_physical_rules, OptimizedPlan, OptimizerEngine,
    VolcanoLimits, VolcanoOutcome, VolcanoPlanner,
};

pub use plan::{EquivalenceSet, GroupId, Memo, OptimizationStatus, Winner};

pub use stats::{Catalog, InMemoryCatalog, TableStatistics};
