//! 聚合的物理实现

use crate::query::planner::rewrite::macros::define_implementation_rule;

define_implementation_rule! {
    /// Aggregate -> HashAggregate / SortAggregate
    ///
    /// 流式的 `SortAggregate` 只对分组聚合提出，它要求输入按分组键排序
    name: ImplementAggregateRule,
    logical: "Aggregate",
    implement: |_ctx, node| {
        let agg = match node.kind() {
            PlanNodeKind::Aggregate(agg) => agg,
            _ => return vec![],
        };
        let mut kinds = vec![PlanNodeKind::HashAggregate(agg.clone())];
        if !agg.group_keys().is_empty() {
            kinds.push(PlanNodeKind::SortAggregate(agg.clone()));
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AggregateCall, DataType};
    use crate::query::planner::plan::{Collation, PlanBuilder};
    use crate::query::planner::rewrite::context::RewriteContext;
    use crate::query::planner::rewrite::rule::RewriteRule;

    #[test]
    fn test_sort_aggregate_delivers_key_order() {
        let mut b = PlanBuilder::new();
        let t = b.scan("t", &[("g", DataType::Int), ("v", DataType::Int)]).unwrap();
        let agg = b
            .aggregate(t, &["g"], vec![AggregateCall::count_star("cnt")])
            .unwrap();
        let mut ctx = RewriteContext::new();
        ctx.seed_after(agg.max_id());
        let rule = ImplementAggregateRule::new();
        let matched = rule.matches(&agg, &ctx).remove(0);
        let result = rule.apply(&mut ctx, &matched).unwrap().unwrap();
        assert_eq!(result.new_nodes.len(), 2);
        let sort_agg = &result.new_nodes[1];
        assert_eq!(sort_agg.name(), "SortAggregate");
        assert_eq!(sort_agg.traits().collation, Collation::ascending(&["t.g"]));
    }
}
