//! 空结果传播规则
//!
//! 子节点是空结果标记时，父节点同样不会产生任何行，整体折叠为 `Empty`。

use crate::query::planner::plan::JoinType;
use crate::query::planner::rewrite::macros::define_prune_empty_rule;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RuleMatch;

define_prune_empty_rule! {
    /// 过滤空输入
    ///
    /// ```text
    ///   Filter(cond)           Empty
    ///       |           =>
    ///     Empty
    /// ```
    name: PruneEmptyFilterRule,
    pattern: Pattern::with_filter_matcher().with_dependency(Pattern::with_empty_matcher()),
    prunes: |_matched| true
}

define_prune_empty_rule! {
    /// 投影空输入
    name: PruneEmptyProjectRule,
    pattern: Pattern::with_project_matcher().with_dependency(Pattern::with_empty_matcher()),
    prunes: |_matched| true
}

define_prune_empty_rule! {
    /// 排序空输入
    name: PruneEmptySortRule,
    pattern: Pattern::with_sort_matcher().with_dependency(Pattern::with_empty_matcher()),
    prunes: |_matched| true
}

define_prune_empty_rule! {
    /// 聚合空输入
    ///
    /// 只有分组聚合可以折叠，全局聚合在空输入上仍然输出一行
    name: PruneEmptyAggregateRule,
    pattern: Pattern::with_aggregate_matcher().with_dependency(Pattern::with_empty_matcher()),
    prunes: |matched| {
        matched
            .root()
            .kind()
            .as_aggregate()
            .map(|agg| !agg.group_keys().is_empty())
            .unwrap_or(false)
    }
}

define_prune_empty_rule! {
    /// 左侧为空的连接
    ///
    /// 内连接与左连接折叠；全连接要求右侧也为空
    name: PruneEmptyJoinLeftRule,
    pattern: Pattern::with_join_matcher()
        .with_dependency(Pattern::with_empty_matcher())
        .with_dependency(Pattern::new()),
    prunes: |matched| match join_type(matched) {
        Some(JoinType::Inner) | Some(JoinType::Left) => true,
        Some(JoinType::Full) => right_is_empty(matched),
        _ => false,
    }
}

define_prune_empty_rule! {
    /// 右侧为空的连接
    name: PruneEmptyJoinRightRule,
    pattern: Pattern::with_join_matcher()
        .with_dependency(Pattern::new())
        .with_dependency(Pattern::with_empty_matcher()),
    prunes: |matched| matches!(
        join_type(matched),
        Some(JoinType::Inner) | Some(JoinType::Right)
    )
}

fn join_type(matched: &RuleMatch) -> Option<JoinType> {
    matched.root().kind().as_join().map(|j| j.join_type())
}

fn right_is_empty(matched: &RuleMatch) -> bool {
    matched
        .input(1)
        .map(|right| right.kind().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Field, Schema};
    use crate::core::types::{AggregateCall, DataType, Expression};
    use crate::query::planner::plan::{Collation, PlanBuilder};
    use crate::query::planner::rewrite::context::RewriteContext;
    use crate::query::planner::rewrite::rule::RewriteRule;

    fn empty_schema() -> Schema {
        Schema::new(vec![
            Field::new("e.k", DataType::Int, true),
            Field::new("e.v", DataType::Int, true),
        ])
    }

    fn apply_first(rule: &dyn RewriteRule, node: &std::sync::Arc<crate::query::planner::plan::PlanNode>) -> Option<String> {
        let mut ctx = RewriteContext::new();
        ctx.seed_after(node.max_id());
        let matches = rule.matches(node, &ctx);
        let matched = matches.first()?;
        rule.apply(&mut ctx, matched)
            .unwrap()
            .and_then(|r| r.first_new_node().map(|n| n.digest()))
    }

    #[test]
    fn test_prune_filter_and_sort() {
        let mut b = PlanBuilder::new();
        let empty = b.empty(empty_schema()).unwrap();
        let filter = b
            .filter(empty.clone(), Expression::gt(Expression::column("v"), Expression::int(1)))
            .unwrap();
        let result = apply_first(&PruneEmptyFilterRule::new(), &filter).unwrap();
        assert!(result.starts_with("Empty("));

        let sort = b.sort(empty, Collation::ascending(&["k"])).unwrap();
        assert!(apply_first(&PruneEmptySortRule::new(), &sort).is_some());
        assert!(apply_first(&PruneEmptyFilterRule::new(), &sort).is_none());
    }

    #[test]
    fn test_global_aggregate_is_kept() {
        let mut b = PlanBuilder::new();
        let empty = b.empty(empty_schema()).unwrap();
        let global = b
            .aggregate(empty.clone(), &[], vec![AggregateCall::count_star("cnt")])
            .unwrap();
        assert!(apply_first(&PruneEmptyAggregateRule::new(), &global).is_none());
        let grouped = b
            .aggregate(empty, &["k"], vec![AggregateCall::count_star("cnt")])
            .unwrap();
        assert!(apply_first(&PruneEmptyAggregateRule::new(), &grouped).is_some());
    }

    #[test]
    fn test_join_sides() {
        let mut b = PlanBuilder::new();
        let empty = b.empty(empty_schema()).unwrap();
        let scan = b.scan("t", &[("x", DataType::Int)]).unwrap();
        let cond = Expression::eq(Expression::column("k"), Expression::column("x"));

        let left_join = b
            .join(empty.clone(), scan.clone(), JoinType::Left, cond.clone())
            .unwrap();
        assert!(apply_first(&PruneEmptyJoinLeftRule::new(), &left_join).is_some());

        let right_join = b
            .join(empty.clone(), scan.clone(), JoinType::Right, cond.clone())
            .unwrap();
        assert!(apply_first(&PruneEmptyJoinLeftRule::new(), &right_join).is_none());

        let full = b.join(empty, scan, JoinType::Full, cond).unwrap();
        assert!(apply_first(&PruneEmptyJoinLeftRule::new(), &full).is_none());
        assert!(apply_first(&PruneEmptyJoinRightRule::new(), &full).is_none());
    }
}
