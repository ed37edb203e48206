//! 计划重写器实现
//!
//! 启发式规划器（Hep）：在工作图上按固定顺序反复应用规则，直到不动点或迭代预算耗尽。
//!
//! 每一轮按前序（自顶向下、从左到右）访问顶点；在每个顶点上按规则列表顺序尝试，
//! 第一个给出替换的规则立即生效，然后从根重新扫描。替换不做代价比较，
//! 规则作者需要保证规则不会让计划变差。

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::error::{OptimizeError, OptimizeResult};
use crate::query::planner::plan::PlanNode;
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::hep_graph::{HepGraph, VertexId};
use crate::query::planner::rewrite::rule::{RewriteRule, RuleSet};

/// 启发式规划器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HepState {
    /// 尚未运行
    Ready,
    /// 正在应用规则
    Firing,
    /// 一整轮扫描没有任何替换
    Fixpoint,
    /// 达到迭代上限，结果是当前最优计划
    Exhausted,
}

impl fmt::Display for HepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HepState::Ready => write!(f, "Ready"),
            HepState::Firing => write!(f, "Firing"),
            HepState::Fixpoint => write!(f, "Fixpoint"),
            HepState::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// 有序规则列表与迭代预算
#[derive(Debug, Clone)]
pub struct HepProgram {
    rules: RuleSet,
    max_iterations: usize,
}

impl HepProgram {
    pub fn new(rules: RuleSet, max_iterations: usize) -> Self {
        Self {
            rules,
            max_iterations,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// 一次重写的结果
#[derive(Debug, Clone)]
pub struct HepOutcome {
    pub plan: Arc<PlanNode>,
    pub state: HepState,
    /// 生效的替换次数
    pub iterations: usize,
    /// 按生效顺序记录的规则名称
    pub fired: Vec<&'static str>,
}

impl HepOutcome {
    /// 迭代预算耗尽时的告警
    pub fn budget_warning(&self, limit: usize) -> Option<OptimizeError> {
        (self.state == HepState::Exhausted).then(|| OptimizeError::BudgetExceeded {
            planner: "HepPlanner".to_string(),
            limit: format!("{} 次迭代", limit),
        })
    }
}

/// 启发式规划器
#[derive(Debug)]
pub struct HepPlanner {
    program: HepProgram,
    state: HepState,
}

impl HepPlanner {
    pub fn new(program: HepProgram) -> Self {
        Self {
            program,
            state: HepState::Ready,
        }
    }

    pub fn state(&self) -> HepState {
        self.state
    }

    pub fn program(&self) -> &HepProgram {
        &self.program
    }

    /// 对输入树运行规则直到不动点或预算耗尽
    ///
    /// 新节点的ID从输入树的最大ID之后分配，因此同样的输入总得到同样的输出。
    pub fn optimize(
        &mut self,
        tree: &Arc<PlanNode>,
        ctx: &mut RewriteContext,
    ) -> OptimizeResult<HepOutcome> {
        ctx.seed_after(tree.max_id());
        let mut graph = HepGraph::new(tree);
        let mut iterations = 0;
        let mut fired = Vec::new();
        self.state = HepState::Firing;

        loop {
            let found = self.find_replacement(&graph, ctx)?;
            let (vertex, rule, replacement) = match found {
                Some(found) => found,
                None => {
                    self.state = HepState::Fixpoint;
                    break;
                }
            };
            if iterations >= self.program.max_iterations {
                warn!(
                    "启发式重写达到迭代上限 {}，返回当前计划",
                    self.program.max_iterations
                );
                self.state = HepState::Exhausted;
                break;
            }
            debug!(
                "规则 {} 生效: {} -> {}",
                rule.name(),
                graph.node(vertex).map(|n| n.kind().digest()).unwrap_or_default(),
                replacement.kind().digest()
            );
            graph
                .replace(vertex, &replacement)
                .map_err(|e| OptimizeError::rule_application(rule.name(), e.to_string()))?;
            iterations += 1;
            fired.push(rule.name());
        }

        let plan = graph.materialize_root()?;
        info!(
            "启发式重写结束: 状态 {}，生效 {} 次，节点数 {} -> {}",
            self.state,
            iterations,
            tree.node_count(),
            plan.node_count()
        );
        Ok(HepOutcome {
            plan,
            state: self.state,
            iterations,
            fired,
        })
    }

    /// 按顶点前序、规则顺序寻找第一个有效替换
    fn find_replacement(
        &self,
        graph: &HepGraph,
        ctx: &mut RewriteContext,
    ) -> OptimizeResult<Option<(VertexId, Arc<dyn RewriteRule>, Arc<PlanNode>)>> {
        for vertex in graph.preorder() {
            let node = match graph.node(vertex) {
                Some(node) => node.clone(),
                None => continue,
            };
            for rule in self.program.rules.rules() {
                for matched in rule.matches(&node, ctx) {
                    let result = rule
                        .apply(ctx, &matched)
                        .map_err(|e| OptimizeError::rule_application(rule.name(), e.to_string()))?;
                    let replacement = match result.and_then(|r| r.first_new_node().cloned()) {
                        Some(replacement) => replacement,
                        None => continue,
                    };
                    if !replacement.schema().same_row_type(node.schema()) {
                        return Err(OptimizeError::rule_application(
                            rule.name(),
                            format!(
                                "输出模式由 {} 变为 {}",
                                node.schema(),
                                replacement.schema()
                            ),
                        ));
                    }
                    if replacement.digest() == node.digest() {
                        continue;
                    }
                    return Ok(Some((vertex, rule.clone(), replacement)));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression};
    use crate::query::planner::plan::{JoinType, PlanBuilder};
    use crate::query::planner::rewrite::elimination::{
        PruneEmptyFilterRule, ReduceFilterExpressionsRule,
    };
    use crate::query::planner::rewrite::pattern::Pattern;
    use crate::query::planner::rewrite::predicate_pushdown::FilterIntoJoinRule;
    use crate::query::planner::rewrite::result::{RewriteResult, RuleMatch, TransformResult};

    fn program(max_iterations: usize) -> HepProgram {
        let mut rules = RuleSet::new("test");
        rules.add_rule(Arc::new(FilterIntoJoinRule::new()));
        rules.add_rule(Arc::new(ReduceFilterExpressionsRule::new()));
        rules.add_rule(Arc::new(PruneEmptyFilterRule::new()));
        HepProgram::new(rules, max_iterations)
    }

    fn users_jobs() -> Arc<PlanNode> {
        let mut b = PlanBuilder::new();
        let users = b
            .scan_as("users", "u", &[("id", DataType::Int), ("age", DataType::Int)])
            .unwrap();
        let jobs = b.scan_as("jobs", "j", &[("id", DataType::Int)]).unwrap();
        let join = b
            .join(
                users,
                jobs,
                JoinType::Inner,
                Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
            )
            .unwrap();
        b.filter(
            join,
            Expression::lt(
                Expression::add(Expression::int(30), Expression::int(1)),
                Expression::column("u.age"),
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_pushdown_then_fold() {
        let mut planner = HepPlanner::new(program(100));
        assert_eq!(planner.state(), HepState::Ready);
        let outcome = planner.optimize(&users_jobs(), &mut RewriteContext::new()).unwrap();
        assert_eq!(outcome.state, HepState::Fixpoint);
        assert_eq!(outcome.fired, vec!["FilterIntoJoinRule", "ReduceFilterExpressionsRule"]);
        assert_eq!(
            outcome.plan.explain(),
            "Join(type=INNER, condition=(u.id = j.id))\n\
             \x20 Filter(condition=(31 < u.age))\n\
             \x20   Scan(table=users, alias=u)\n\
             \x20 Scan(table=jobs, alias=j)\n"
        );
        assert!(outcome.budget_warning(100).is_none());
    }

    #[test]
    fn test_iteration_budget() {
        let mut planner = HepPlanner::new(program(1));
        let outcome = planner.optimize(&users_jobs(), &mut RewriteContext::new()).unwrap();
        assert_eq!(outcome.state, HepState::Exhausted);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.plan.name(), "Join");
        assert!(matches!(
            outcome.budget_warning(1),
            Some(OptimizeError::BudgetExceeded { .. })
        ));
    }

    #[derive(Debug)]
    struct DropColumnRule;

    impl RewriteRule for DropColumnRule {
        fn name(&self) -> &'static str {
            "DropColumnRule"
        }

        fn pattern(&self) -> Pattern {
            Pattern::with_join_matcher()
        }

        fn apply(
            &self,
            _ctx: &mut RewriteContext,
            matched: &RuleMatch,
        ) -> RewriteResult<Option<TransformResult>> {
            Ok(Some(TransformResult::replace(matched.input(1)?.clone())))
        }
    }

    #[test]
    fn test_schema_change_is_rejected() {
        let mut rules = RuleSet::new("broken");
        rules.add_rule(Arc::new(DropColumnRule));
        let mut planner = HepPlanner::new(HepProgram::new(rules, 10));
        let err = planner
            .optimize(&users_jobs(), &mut RewriteContext::new())
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::RuleApplicationError { ref rule, .. } if rule == "DropColumnRule"
        ));
    }
}
