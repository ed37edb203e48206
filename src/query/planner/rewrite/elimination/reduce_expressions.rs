//! 表达式化简规则
//!
//! 对过滤条件、投影表达式与连接条件做常量折叠。
//! 恒真的过滤条件直接去掉过滤节点，恒假（或 NULL）的条件把子树替换为 `Empty`。

use crate::core::types::ProjectItem;
use crate::query::planner::plan::{
    EmptyNode, FilterNode, JoinNode, JoinType, PlanNodeKind, ProjectNode,
};
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{RewriteResult, RuleMatch, TransformResult};
use crate::query::planner::rewrite::rule::RewriteRule;

/// 化简过滤条件的规则
///
/// # 转换示例
///
/// ```text
///   Filter((30 + 1) < age)      Filter(31 < age)
///   Filter(TRUE)  -> 输入
///   Filter(FALSE) -> Empty
/// ```
#[derive(Debug, Default)]
pub struct ReduceFilterExpressionsRule;

impl ReduceFilterExpressionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRule for ReduceFilterExpressionsRule {
    fn name(&self) -> &'static str {
        "ReduceFilterExpressionsRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::with_filter_matcher()
    }

    fn apply(
        &self,
        ctx: &mut RewriteContext,
        matched: &RuleMatch,
    ) -> RewriteResult<Option<TransformResult>> {
        let node = matched.root();
        let filter = match node.kind() {
            PlanNodeKind::Filter(f) => f,
            _ => return Ok(None),
        };
        let folded = filter.condition().fold();
        if folded.is_true() {
            let input = matched.input(0)?.clone();
            return Ok(Some(TransformResult::replace(input)));
        }
        if folded.is_false_or_null() {
            let empty = ctx.create_node(
                PlanNodeKind::Empty(EmptyNode::new(node.schema().clone())),
                vec![],
            )?;
            return Ok(Some(TransformResult::replace(empty)));
        }
        if &folded == filter.condition() {
            return Ok(None);
        }
        let reduced = ctx.create_node(
            PlanNodeKind::Filter(FilterNode::new(folded)),
            node.children().to_vec(),
        )?;
        Ok(Some(TransformResult::replace(reduced)))
    }
}

/// 折叠投影表达式中的常量子表达式
#[derive(Debug, Default)]
pub struct ReduceProjectExpressionsRule;

impl ReduceProjectExpressionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRule for ReduceProjectExpressionsRule {
    fn name(&self) -> &'static str {
        "ReduceProjectExpressionsRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::with_project_matcher()
    }

    fn apply(
        &self,
        ctx: &mut RewriteContext,
        matched: &RuleMatch,
    ) -> RewriteResult<Option<TransformResult>> {
        let node = matched.root();
        let project = match node.kind() {
            PlanNodeKind::Project(p) => p,
            _ => return Ok(None),
        };
        let items: Vec<ProjectItem> = project
            .items()
            .iter()
            .map(|item| ProjectItem::new(item.expr.fold(), item.alias.clone()))
            .collect();
        if items.as_slice() == project.items() {
            return Ok(None);
        }
        let reduced = ctx.create_node(
            PlanNodeKind::Project(ProjectNode::new(items)),
            node.children().to_vec(),
        )?;
        Ok(Some(TransformResult::replace(reduced)))
    }
}

/// 折叠连接条件；内连接的恒假条件得到 `Empty`
#[derive(Debug, Default)]
pub struct ReduceJoinExpressionsRule;

impl ReduceJoinExpressionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRule for ReduceJoinExpressionsRule {
    fn name(&self) -> &'static str {
        "ReduceJoinExpressionsRule"
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
        let folded = join.condition().fold();
        if join.join_type() == JoinType::Inner && folded.is_false_or_null() {
            let empty = ctx.create_node(
                PlanNodeKind::Empty(EmptyNode::new(node.schema().clone())),
                vec![],
            )?;
            return Ok(Some(TransformResult::replace(empty)));
        }
        if &folded == join.condition() {
            return Ok(None);
        }
        let reduced = ctx.create_node(
            PlanNodeKind::Join(JoinNode::new(join.join_type(), folded)),
            node.children().to_vec(),
        )?;
        Ok(Some(TransformResult::replace(reduced)))
    }
}
