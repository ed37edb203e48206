//! 计划节点种类
//!
//! 逻辑种类描述“做什么”，物理种类描述“怎么做”。物理种类复用逻辑种类的属性结构。

use serde::{Deserialize, Serialize};

use super::aggregate_node::AggregateNode;
use super::data_processing_node::{EmptyNode, ExchangeNode, GroupRefNode};
use super::filter_node::FilterNode;
use super::join_node::JoinNode;
use super::project_node::ProjectNode;
use super::scan_node::ScanNode;
use super::sort_node::SortNode;
use crate::query::planner::plan::core::explain::Pair;
use crate::query::planner::plan::core::trait_set::Convention;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanNodeKind {
    // ==================== 逻辑节点 ====================
    Scan(ScanNode),
    Filter(FilterNode),
    Project(ProjectNode),
    Join(JoinNode),
    Sort(SortNode),
    Aggregate(AggregateNode),
    Empty(EmptyNode),

    // ==================== 物理节点 ====================
    TableScan(ScanNode),
    FilterExec(FilterNode),
    ProjectExec(ProjectNode),
    HashJoin(JoinNode),
    MergeJoin(JoinNode),
    NestedLoopJoin(JoinNode),
    ExternalSort(SortNode),
    PresortedSort(SortNode),
    HashAggregate(AggregateNode),
    SortAggregate(AggregateNode),
    Exchange(ExchangeNode),
    EmptyValues(EmptyNode),

    // ==================== 搜索占位 ====================
    GroupRef(GroupRefNode),
}

impl PlanNodeKind {
    /// 节点种类名称，模式匹配按名称进行
    pub fn name(&self) -> &'static str {
        match self {
            PlanNodeKind::Scan(_) => "Scan",
            PlanNodeKind::Filter(_) => "Filter",
            PlanNodeKind::Project(_) => "Project",
            PlanNodeKind::Join(_) => "Join",
            PlanNodeKind::Sort(_) => "Sort",
            PlanNodeKind::Aggregate(_) => "Aggregate",
            PlanNodeKind::Empty(_) => "Empty",
            PlanNodeKind::TableScan(_) => "TableScan",
            PlanNodeKind::FilterExec(_) => "FilterExec",
            PlanNodeKind::ProjectExec(_) => "ProjectExec",
            PlanNodeKind::HashJoin(_) => "HashJoin",
            PlanNodeKind::MergeJoin(_) => "MergeJoin",
            PlanNodeKind::NestedLoopJoin(_) => "NestedLoopJoin",
            PlanNodeKind::ExternalSort(_) => "ExternalSort",
            PlanNodeKind::PresortedSort(_) => "PresortedSort",
            PlanNodeKind::HashAggregate(_) => "HashAggregate",
            PlanNodeKind::SortAggregate(_) => "SortAggregate",
            PlanNodeKind::Exchange(_) => "Exchange",
            PlanNodeKind::EmptyValues(_) => "EmptyValues",
            PlanNodeKind::GroupRef(_) => "GroupRef",
        }
    }

    pub fn convention(&self) -> Convention {
        match self {
            PlanNodeKind::Scan(_)
            | PlanNodeKind::Filter(_)
            | PlanNodeKind::Project(_)
            | PlanNodeKind::Join(_)
            | PlanNodeKind::Sort(_)
            | PlanNodeKind::Aggregate(_)
            | PlanNodeKind::Empty(_)
            | PlanNodeKind::GroupRef(_) => Convention::Logical,
            _ => Convention::Physical,
        }
    }

    pub fn is_physical(&self) -> bool {
        self.convention() == Convention::Physical
    }

    /// 子节点数量
    pub fn arity(&self) -> usize {
        match self {
            PlanNodeKind::Scan(_)
            | PlanNodeKind::TableScan(_)
            | PlanNodeKind::Empty(_)
            | PlanNodeKind::EmptyValues(_)
            | PlanNodeKind::GroupRef(_) => 0,
            PlanNodeKind::Join(_)
            | PlanNodeKind::HashJoin(_)
            | PlanNodeKind::MergeJoin(_)
            | PlanNodeKind::NestedLoopJoin(_) => 2,
            _ => 1,
        }
    }

    pub fn as_scan(&self) -> Option<&ScanNode> {
        match self {
            PlanNodeKind::Scan(n) | PlanNodeKind::TableScan(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&FilterNode> {
        match self {
            PlanNodeKind::Filter(n) | PlanNodeKind::FilterExec(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectNode> {
        match self {
            PlanNodeKind::Project(n) | PlanNodeKind::ProjectExec(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&JoinNode> {
        match self {
            PlanNodeKind::Join(n)
            | PlanNodeKind::HashJoin(n)
            | PlanNodeKind::MergeJoin(n)
            | PlanNodeKind::NestedLoopJoin(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_sort(&self) -> Option<&SortNode> {
        match self {
            PlanNodeKind::Sort(n) | PlanNodeKind::ExternalSort(n) | PlanNodeKind::PresortedSort(n) => {
                Some(n)
            }
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateNode> {
        match self {
            PlanNodeKind::Aggregate(n)
            | PlanNodeKind::HashAggregate(n)
            | PlanNodeKind::SortAggregate(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_empty(&self) -> Option<&EmptyNode> {
        match self {
            PlanNodeKind::Empty(n) | PlanNodeKind::EmptyValues(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_empty().is_some()
    }

    /// 节点自身属性的键值描述
    pub fn describe(&self) -> Vec<Pair> {
        match self {
            PlanNodeKind::Scan(n) | PlanNodeKind::TableScan(n) => n.describe(),
            PlanNodeKind::Filter(n) | PlanNodeKind::FilterExec(n) => n.describe(),
            PlanNodeKind::Project(n) | PlanNodeKind::ProjectExec(n) => n.describe(),
            PlanNodeKind::Join(n)
            | PlanNodeKind::HashJoin(n)
            | PlanNodeKind::MergeJoin(n)
            | PlanNodeKind::NestedLoopJoin(n) => n.describe(),
            PlanNodeKind::Sort(n) | PlanNodeKind::ExternalSort(n) | PlanNodeKind::PresortedSort(n) => {
                n.describe()
            }
            PlanNodeKind::Aggregate(n)
            | PlanNodeKind::HashAggregate(n)
            | PlanNodeKind::SortAggregate(n) => n.describe(),
            PlanNodeKind::Empty(n) | PlanNodeKind::EmptyValues(n) => n.describe(),
            PlanNodeKind::Exchange(n) => n.describe(),
            PlanNodeKind::GroupRef(n) => n.describe(),
        }
    }

    /// 种类与属性的文本摘要，不含子节点
    pub fn digest(&self) -> String {
        let attrs: Vec<String> = self
            .describe()
            .into_iter()
            .map(|p| format!("{}={}", p.key, p.value))
            .collect();
        format!("{}({})", self.name(), attrs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Expression;

    #[test]
    fn test_kind_properties() {
        let filter = PlanNodeKind::Filter(FilterNode::new(Expression::bool(true)));
        assert_eq!(filter.name(), "Filter");
        assert_eq!(filter.arity(), 1);
        assert!(!filter.is_physical());
        assert_eq!(filter.digest(), "Filter(condition=TRUE)");

        let exec = PlanNodeKind::FilterExec(FilterNode::new(Expression::bool(true)));
        assert!(exec.is_physical());
        assert!(exec.as_filter().is_some());
    }
}
