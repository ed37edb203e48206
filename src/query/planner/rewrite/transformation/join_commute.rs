//! 连接交换规则

use crate::core::types::{Expression, ProjectItem};
use crate::query::planner::plan::{JoinNode, PlanNodeKind, ProjectNode};
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{RewriteResult, RuleMatch, TransformResult};
use crate::query::planner::rewrite::rule::RewriteRule;

/// 交换连接两侧输入的规则
///
/// # 转换示例
///
/// ```text
///   Join(A, B)    =>    Project(A 的列, B 的列)
///                               |
///                          Join(B, A)
/// ```
///
/// 上层投影恢复原来的列顺序，因此输出模式不变。
/// 该规则不减少代价，只为代价搜索提供另一种输入顺序，不应放入启发式规则集。
#[derive(Debug, Default)]
pub struct JoinCommuteRule;

impl JoinCommuteRule {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRule for JoinCommuteRule {
    fn name(&self) -> &'static str {
        "JoinCommuteRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::with_join_matcher()
    }

    fn apply(
        &self,
        ctx: &mut RewriteContext,
        matched: &RuleMatch,
    ) -> RewriteResult<Option<TransformResult>> {
        let node = matched.root();
        let join = match node.kind() {
            PlanNodeKind::Join(j) => j,
            _ => return Ok(None),
        };
        let left = matched.input(0)?.clone();
        let right = matched.input(1)?.clone();
        let swapped = ctx.create_node(
            PlanNodeKind::Join(JoinNode::new(
                join.join_type().swap(),
                join.condition().clone(),
            )),
            vec![right, left],
        )?;
        let items = node
            .schema()
            .fields()
            .iter()
            .map(|f| ProjectItem::new(Expression::column(f.name.clone()), f.name.clone()))
            .collect();
        let restored = ctx.create_node(
            PlanNodeKind::Project(ProjectNode::new(items)),
            vec![swapped],
        )?;
        Ok(Some(TransformResult::replace(restored)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataType;
    use crate::query::planner::plan::{JoinType, PlanBuilder};

    #[test]
    fn test_commute_preserves_schema() {
        let mut b = PlanBuilder::new();
        let a = b.scan("a", &[("k", DataType::Int), ("x", DataType::Int)]).unwrap();
        let c = b.scan("c", &[("k2", DataType::Int)]).unwrap();
        let join = b
            .join(
                a,
                c,
                JoinType::Left,
                Expression::eq(Expression::column("a.k"), Expression::column("c.k2")),
            )
            .unwrap();

        let rule = JoinCommuteRule::new();
        let mut ctx = RewriteContext::new();
        ctx.seed_after(join.max_id());
        let matched = rule.matches(&join, &ctx).remove(0);
        let result = rule.apply(&mut ctx, &matched).unwrap().unwrap();
        let project = result.first_new_node().unwrap();

        assert_eq!(project.name(), "Project");
        assert_eq!(project.schema(), join.schema());
        let swapped = project.child(0).unwrap();
        assert_eq!(swapped.kind().as_join().unwrap().join_type(), JoinType::Right);
        assert_eq!(swapped.child(0).unwrap().name(), "Scan");
        assert_eq!(swapped.schema().names(), vec!["c.k2", "a.k", "a.x"]);
    }
}
