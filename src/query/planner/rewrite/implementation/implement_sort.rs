//! 排序的物理实现

use crate::query::planner::rewrite::macros::define_implementation_rule;

define_implementation_rule! {
    /// Sort -> ExternalSort / PresortedSort
    ///
    /// `PresortedSort` 不做比较，只要求输入已按目标顺序排列
    name: ImplementSortRule,
    logical: "Sort",
    implement: |_ctx, node| match node.kind() {
        PlanNodeKind::Sort(sort) => vec![
            PlanNodeKind::ExternalSort(sort.clone()),
            PlanNodeKind::PresortedSort(sort.clone()),
        ],
        _ => vec![],
    }
}
