//! 重写规则宏定义
//!
//! 提供声明式宏用于简化重写规则的定义，减少样板代码。

// ==================== 空结果传播规则宏 ====================

/// 定义空结果传播规则
///
/// 当 `prunes` 判定成立时，把匹配根节点替换为同模式的 `Empty`。
///
/// # 示例
/// ```rust,ignore
/// define_prune_empty_rule! {
///     name: PruneEmptyFilterRule,
///     pattern: Pattern::with_filter_matcher().with_dependency(Pattern::with_empty_matcher()),
///     prunes: |_matched| true
/// }
/// ```
macro_rules! define_prune_empty_rule {
    (
        $(#[$meta:meta])*
        name: $name:ident,
        pattern: $pattern:expr,
        prunes: $prunes_closure:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name;

        impl $name {
            /// 创建规则实例
            pub fn new() -> Self {
                Self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::query::planner::rewrite::rule::RewriteRule for $name {
            fn name(&self) -> &'static str {
                stringify!($name)
            }

            fn pattern(&self) -> $crate::query::planner::rewrite::pattern::Pattern {
                $pattern
            }

            fn apply(
                &self,
                ctx: &mut $crate::query::planner::rewrite::context::RewriteContext,
                matched: &$crate::query::planner::rewrite::result::RuleMatch,
            ) -> $crate::query::planner::rewrite::result::RewriteResult<
                Option<$crate::query::planner::rewrite::result::TransformResult>,
            > {
                use $crate::query::planner::plan::{EmptyNode, PlanNodeKind};
                use $crate::query::planner::rewrite::result::TransformResult;

                let prunes_fn: fn(&$crate::query::planner::rewrite::result::RuleMatch) -> bool =
                    $prunes_closure;
                if !prunes_fn(matched) {
                    return Ok(None);
                }
                let schema = matched.root().schema().clone();
                let empty = ctx.create_node(PlanNodeKind::Empty(EmptyNode::new(schema)), vec![])?;
                Ok(Some(TransformResult::replace(empty)))
            }
        }
    };
}

// ==================== 物理实现规则宏 ====================

/// 定义物理实现规则
///
/// `implement` 根据逻辑节点返回若干物理种类，每个种类都以原节点的子节点构造新节点。
///
/// # 示例
/// ```rust,ignore
/// define_implementation_rule! {
///     name: ImplementFilterRule,
///     logical: "Filter",
///     implement: |_ctx, node| match node.kind() {
///         PlanNodeKind::Filter(f) => vec![PlanNodeKind::FilterExec(f.clone())],
///         _ => vec![],
///     }
/// }
/// ```
macro_rules! define_implementation_rule {
    (
        $(#[$meta:meta])*
        name: $name:ident,
        logical: $logical:literal,
        implement: $implement_closure:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name;

        impl $name {
            /// 创建规则实例
            pub fn new() -> Self {
                Self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::query::planner::rewrite::rule::RewriteRule for $name {
            fn name(&self) -> &'static str {
                stringify!($name)
            }

            fn pattern(&self) -> $crate::query::planner::rewrite::pattern::Pattern {
                $crate::query::planner::rewrite::pattern::Pattern::new_with_name($logical)
            }

            fn kind(&self) -> $crate::query::planner::rewrite::rule::RuleKind {
                $crate::query::planner::rewrite::rule::RuleKind::Implementation
            }

            fn apply(
                &self,
                ctx: &mut $crate::query::planner::rewrite::context::RewriteContext,
                matched: &$crate::query::planner::rewrite::result::RuleMatch,
            ) -> $crate::query::planner::rewrite::result::RewriteResult<
                Option<$crate::query::planner::rewrite::result::TransformResult>,
            > {
                use $crate::query::planner::plan::{PlanNode, PlanNodeKind};
                use $crate::query::planner::rewrite::context::RewriteContext;
                use $crate::query::planner::rewrite::result::TransformResult;

                let implement_fn: fn(&RewriteContext, &PlanNode) -> Vec<PlanNodeKind> =
                    $implement_closure;
                let node = matched.root();
                let kinds = implement_fn(ctx, node);
                if kinds.is_empty() {
                    return Ok(None);
                }
                let mut result = TransformResult::new();
                for kind in kinds {
                    result.add_new_node(ctx.create_node(kind, node.children().to_vec())?);
                }
                Ok(Some(result))
            }
        }
    };
}

pub(crate) use define_implementation_rule;
pub(crate) use define_prune_empty_rule;
