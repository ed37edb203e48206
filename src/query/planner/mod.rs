//! 规划模块
//!
//! - `plan`：表达式节点、特征集合与构造器
//! - `rewrite`：重写规则与启发式规划器

pub mod plan;
pub mod rewrite;

pub use plan::{PlanBuilder, PlanNode, PlanNodeKind, TraitSet};
pub use rewrite::{HepPlanner, HepProgram, HepState, RewriteRule, RuleSet};
