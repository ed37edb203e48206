//! 代价计算模块
//!
//! - `calculator` - 行数估计与算子代价
//! - `selectivity` - 谓词选择性估计
//! - `config` - 代价模型配置

pub mod calculator;
pub mod config;
pub mod selectivity;

pub use calculator::{CostCalculator, InputEstimate};
pub use config::CostModelConfig;
pub use selectivity::SelectivityEstimator;
