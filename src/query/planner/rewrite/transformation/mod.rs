//! 等价变换规则
//!
//! 只改变计划形状、不改变结果的规则，供代价搜索探索替代方案

pub mod join_commute;

pub use join_commute::JoinCommuteRule;
