//! 物理实现规则
//!
//! 为每个逻辑节点提出一个或多个物理节点，子节点保持不变

pub mod implement_aggregate;
pub mod implement_basic;
pub mod implement_join;
pub mod implement_sort;

pub use implement_aggregate::ImplementAggregateRule;
pub use implement_basic::{
    ImplementEmptyRule, ImplementFilterRule, ImplementProjectRule, ImplementScanRule,
};
pub use implement_join::ImplementJoinRule;
pub use implement_sort::ImplementSortRule;
