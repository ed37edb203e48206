//! 计划重写模块
//!
//! 规则契约、全部重写规则以及启发式规划器。
//!
//! # 模块结构
//!
//! - `context`: 重写上下文定义
//! - `pattern`: 模式匹配定义
//! - `result`: 重写结果定义
//! - `rule`: 重写规则 trait 与规则集
//! - `macros`: 重写规则宏定义
//! - `hep_graph`: 启发式重写的工作图
//! - `plan_rewriter`: 启发式规划器
//! - `predicate_pushdown`: 谓词下推规则
//! - `elimination`: 常量折叠与空结果传播
//! - `transformation`: 连接交换
//! - `implementation`: 逻辑节点到物理节点的实现规则
//!
//! # 规则分类
//!
//! 谓词下推与消除规则总是让计划变小，可以放入启发式规则集；
//! 连接交换与实现规则只提出替代方案，需要代价搜索来取舍。

pub mod context;
pub mod elimination;
pub mod hep_graph;
pub mod implementation;
mod macros;
pub mod pattern;
pub mod plan_rewriter;
pub mod predicate_pushdown;
pub mod result;
pub mod rule;
pub mod transformation;

pub use context::RewriteContext;
pub use hep_graph::{HepGraph, VertexId};
pub use pattern::{MatchNode, Pattern};
pub use plan_rewriter::{HepOutcome, HepPlanner, HepProgram, HepState};
pub use result::{RewriteError, RewriteResult, RuleMatch, TransformResult};
pub use rule::{RewriteRule, RuleKind, RuleSet};

pub use elimination::{
    PruneEmptyAggregateRule, PruneEmptyFilterRule, PruneEmptyJoinLeftRule,
    PruneEmptyJoinRightRule, PruneEmptyProjectRule, PruneEmptySortRule,
    ReduceFilterExpressionsRule, ReduceJoinExpressionsRule, ReduceProjectExpressionsRule,
};
pub use implementation::{
    ImplementAggregateRule, ImplementEmptyRule, ImplementFilterRule, ImplementJoinRule,
    ImplementProjectRule, ImplementScanRule, ImplementSortRule,
};
pub use predicate_pushdown::FilterIntoJoinRule;
pub use transformation::JoinCommuteRule;
