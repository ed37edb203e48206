//! 消除规则
//!
//! 常量折叠以及空结果标记的向上传播

pub mod prune_empty;
pub mod reduce_expressions;

pub use prune_empty::{
    PruneEmptyAggregateRule, PruneEmptyFilterRule, PruneEmptyJoinLeftRule,
    PruneEmptyJoinRightRule, PruneEmptyProjectRule, PruneEmptySortRule,
};
pub use reduce_expressions::{
    ReduceFilterExpressionsRule, ReduceJoinExpressionsRule, ReduceProjectExpressionsRule,
};
