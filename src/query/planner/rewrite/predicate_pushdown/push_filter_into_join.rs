//! 将过滤条件下推到连接输入的规则

use std::sync::Arc;

use crate::core::schema::Schema;
use crate::core::types::expression::{conjunction, split_conjunction};
use crate::core::types::Expression;
use crate::query::planner::plan::{FilterNode, PlanNode, PlanNodeKind};
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{RewriteResult, RuleMatch, TransformResult};
use crate::query::planner::rewrite::rule::RewriteRule;

/// 将过滤条件下推到连接输入的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Filter(u.age > 31 AND j.id > 10 AND u.id < j.id)
///           |
///         Join
///       /      \
///   users      jobs
/// ```
///
/// After:
/// ```text
///   Filter(u.id < j.id)
///           |
///         Join
///       /      \
///  Filter      Filter
/// (u.age>31)  (j.id>10)
///     |          |
///   users      jobs
/// ```
///
/// # 适用条件
///
/// - 合取项引用的列全部来自同一侧
/// - 该侧不会被外连接补空
///
/// 不引用任何列的合取项与跨两侧的合取项留在连接之上。
#[derive(Debug, Default)]
pub struct FilterIntoJoinRule;

impl FilterIntoJoinRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRule for FilterIntoJoinRule {
    fn name(&self) -> &'static str {
        "FilterIntoJoinRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::with_filter_matcher().with_dependency(Pattern::with_join_matcher())
    }

    fn apply(
        &self,
        ctx: &mut RewriteContext,
        matched: &RuleMatch,
    ) -> RewriteResult<Option<TransformResult>> {
        let filter = match matched.root().kind() {
            PlanNodeKind::Filter(f) => f,
            _ => return Ok(None),
        };
        let join_node = matched.input(0)?;
        let join = match join_node.kind() {
            PlanNodeKind::Join(j) => j,
            _ => return Ok(None),
        };
        let left = join_node.child(0).cloned();
        let right = join_node.child(1).cloned();
        let (left, right) = match (left, right) {
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(None),
        };

        let mut left_preds = Vec::new();
        let mut right_preds = Vec::new();
        let mut remaining = Vec::new();
        for conjunct in split_conjunction(filter.condition()) {
            let columns = conjunct.referenced_columns();
            if columns.is_empty() {
                remaining.push(conjunct);
            } else if !join.join_type().generates_nulls_on_left()
                && resolves_all(left.schema(), &columns)
            {
                left_preds.push(conjunct);
            } else if !join.join_type().generates_nulls_on_right()
                && resolves_all(right.schema(), &columns)
            {
                right_preds.push(conjunct);
            } else {
                remaining.push(conjunct);
            }
        }
        if left_preds.is_empty() && right_preds.is_empty() {
            return Ok(None);
        }

        let new_left = push_below(ctx, left, left_preds)?;
        let new_right = push_below(ctx, right, right_preds)?;
        let new_join = Arc::new(join_node.with_children(vec![new_left, new_right])?);
        let replacement = match conjunction(remaining) {
            Some(residual) => ctx.create_node(
                PlanNodeKind::Filter(FilterNode::new(residual)),
                vec![new_join],
            )?,
            None => new_join,
        };
        Ok(Some(TransformResult::replace(replacement)))
    }
}

fn resolves_all(schema: &Schema, columns: &[String]) -> bool {
    columns.iter().all(|c| schema.resolve(c).is_some())
}

fn push_below(
    ctx: &mut RewriteContext,
    input: Arc<PlanNode>,
    predicates: Vec<Expression>,
) -> RewriteResult<Arc<PlanNode>> {
    match conjunction(predicates) {
        Some(condition) => ctx.create_node(
            PlanNodeKind::Filter(FilterNode::new(condition)),
            vec![input],
        ),
        None => Ok(input),
    }
}
