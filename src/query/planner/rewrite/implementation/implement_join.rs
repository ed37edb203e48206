//! 连接的物理实现

use crate::query::planner::rewrite::macros::define_implementation_rule;

define_implementation_rule! {
    /// Join -> NestedLoopJoin / HashJoin / MergeJoin
    ///
    /// 嵌套循环连接总是可用；条件中存在 `左列 = 右列` 等值键时，
    /// 额外提出哈希连接与归并连接
    name: ImplementJoinRule,
    logical: "Join",
    implement: |_ctx, node| {
        let join = match node.kind() {
            PlanNodeKind::Join(join) => join,
            _ => return vec![],
        };
        let mut kinds = vec![PlanNodeKind::NestedLoopJoin(join.clone())];
        if let (Some(left), Some(right)) = (node.child(0), node.child(1)) {
            let info = join.analyze_condition(left.schema(), right.schema());
            if !info.keys.is_empty() {
                kinds.push(PlanNodeKind::HashJoin(join.clone()));
                kinds.push(PlanNodeKind::MergeJoin(join.clone()));
            }
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression};
    use crate::query::planner::plan::{JoinType, PlanBuilder};
    use crate::query::planner::rewrite::context::RewriteContext;
    use crate::query::planner::rewrite::rule::RewriteRule;

    fn implement(condition: Expression) -> Vec<&'static str> {
        let mut b = PlanBuilder::new();
        let l = b.scan("l", &[("k", DataType::Int), ("v", DataType::Int)]).unwrap();
        let r = b.scan("r", &[("k2", DataType::Int)]).unwrap();
        let join = b.join(l, r, JoinType::Inner, condition).unwrap();
        let mut ctx = RewriteContext::new();
        ctx.seed_after(join.max_id());
        let rule = ImplementJoinRule::new();
        let matched = rule.matches(&join, &ctx).remove(0);
        let result = rule.apply(&mut ctx, &matched).unwrap().unwrap();
        result.new_nodes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_equi_join_alternatives() {
        let names = implement(Expression::eq(Expression::column("k"), Expression::column("k2")));
        assert_eq!(names, vec!["NestedLoopJoin", "HashJoin", "MergeJoin"]);
    }

    #[test]
    fn test_theta_join_nested_loop_only() {
        let names = implement(Expression::lt(Expression::column("v"), Expression::column("k2")));
        assert_eq!(names, vec!["NestedLoopJoin"]);
    }
}
