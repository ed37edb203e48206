//! 重写规则 trait 定义
//!
//! 启发式重写与代价搜索共用同一套规则接口。
//! 规则是无状态的：同样的输入子树总是给出同样的替换。

use std::fmt;
use std::sync::Arc;

use crate::query::planner::plan::PlanNode;
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{RewriteResult, RuleMatch, TransformResult};

/// 规则类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// 逻辑等价变换
    Transformation,
    /// 逻辑节点到物理节点的实现
    Implementation,
}

/// 重写规则 trait
///
/// # 示例
/// ```rust
/// use relopt::query::planner::rewrite::{
///     Pattern, RewriteContext, RewriteResult, RewriteRule, RuleMatch, TransformResult,
/// };
///
/// #[derive(Debug)]
/// struct KeepFilterRule;
///
/// impl RewriteRule for KeepFilterRule {
///     fn name(&self) -> &'static str {
///         "KeepFilterRule"
///     }
///
///     fn pattern(&self) -> Pattern {
///         Pattern::new_with_name("Filter")
///     }
///
///     fn apply(
///         &self,
///         _ctx: &mut RewriteContext,
///         _matched: &RuleMatch,
///     ) -> RewriteResult<Option<TransformResult>> {
///         Ok(None)
///     }
/// }
/// ```
pub trait RewriteRule: fmt::Debug + Send + Sync {
    /// 规则名称
    fn name(&self) -> &'static str;

    /// 返回规则的模式
    fn pattern(&self) -> Pattern;

    fn kind(&self) -> RuleKind {
        RuleKind::Transformation
    }

    /// 在以 `node` 为根的子树上匹配模式
    fn matches(&self, node: &Arc<PlanNode>, _ctx: &RewriteContext) -> Vec<RuleMatch> {
        let pattern = self.pattern();
        if pattern.matches(node) {
            vec![RuleMatch::new(node.clone(), &pattern)]
        } else {
            Vec::new()
        }
    }

    /// 应用重写规则
    ///
    /// # 返回
    /// - `Ok(Some(result))`: 提出替换节点，输出模式必须与匹配根节点相同
    /// - `Ok(None)`: 本次匹配不做改变
    /// - `Err(e)`: 规则失败
    fn apply(
        &self,
        ctx: &mut RewriteContext,
        matched: &RuleMatch,
    ) -> RewriteResult<Option<TransformResult>>;
}

/// 有序规则集合
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<Arc<dyn RewriteRule>>,
}

impl RuleSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: Arc<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: Arc<dyn RewriteRule>) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn rules(&self) -> &[Arc<dyn RewriteRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 追加另一个集合的全部规则
    pub fn extend(&mut self, other: &RuleSet) {
        self.rules.extend(other.rules.iter().cloned());
    }

    /// 去掉名称在列表中的规则
    pub fn without(mut self, disabled: &[String]) -> Self {
        self.rules.retain(|r| !disabled.iter().any(|d| d == r.name()));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}
