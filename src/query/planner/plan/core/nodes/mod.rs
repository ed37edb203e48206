//! 计划节点定义

pub mod aggregate_node;
pub mod data_processing_node;
pub mod filter_node;
pub mod join_node;
pub mod plan_node;
pub mod plan_node_enum;
pub mod project_node;
pub mod scan_node;
pub mod sort_node;

pub use aggregate_node::AggregateNode;
pub use data_processing_node::{EmptyNode, ExchangeNode, GroupRefNode};
pub use filter_node::FilterNode;
pub use join_node::{EquiKey, JoinConditionInfo, JoinNode, JoinType};
pub use plan_node::PlanNode;
pub use plan_node_enum::PlanNodeKind;
pub use project_node::ProjectNode;
pub use scan_node::{ColumnDef, ScanNode};
pub use sort_node::{resolve_collation, SortNode};
