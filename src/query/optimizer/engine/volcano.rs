//! 基于代价的规划器（Volcano）
//!
//! 1. 把输入树自底向上登记进 memo，结构相同的节点只登记一次
//! 2. 反复对所有逻辑成员触发规则，直到没有新成员（或预算耗尽）
//! 3. 按 (等价集, 所需特征) 做动态规划，选出代价最小的完整物理计划
//!
//! 第 3 步中正在求解的 (等价集, 特征) 标记为 InProgress，搜索再次遇到时按无穷代价剪枝。

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::error::{OptimizeError, OptimizeResult};
use crate::core::schema::Schema;
use crate::query::optimizer::core::Cost;
use crate::query::optimizer::cost::{CostCalculator, InputEstimate};
use crate::query::optimizer::engine::exploration::ExplorationState;
use crate::query::optimizer::plan::{
    GroupId, MemberId, Memo, MemoNode, OptimizationStatus, Winner,
};
use crate::query::planner::plan::{
    resolve_collation, Collation, Convention, Distribution, ExchangeNode, FieldCollation,
    GroupRefNode, NodeId, PlanNode, PlanNodeKind, ProjectNode, SortNode, TraitSet,
};
use crate::query::planner::rewrite::{
    Pattern, RewriteContext, RewriteRule, RuleKind, RuleMatch, RuleSet,
};

/// 搜索预算
#[derive(Debug, Clone, Copy)]
pub struct VolcanoLimits {
    /// memo 成员数量上限
    pub max_memo_nodes: usize,
    /// 探索阶段的时间上限
    pub timeout: Option<Duration>,
}

impl Default for VolcanoLimits {
    fn default() -> Self {
        Self {
            max_memo_nodes: 10_000,
            timeout: None,
        }
    }
}

/// 一次搜索的结果
#[derive(Debug, Clone)]
pub struct VolcanoOutcome {
    pub plan: Arc<PlanNode>,
    pub cost: Cost,
    pub root: GroupId,
    /// 预算耗尽等非致命告警
    pub warnings: Vec<OptimizeError>,
    pub memo_nodes: usize,
    pub memo_sets: usize,
}

/// 基于代价的规划器
#[derive(Debug)]
pub struct VolcanoPlanner {
    rules: RuleSet,
    calculator: CostCalculator,
    limits: VolcanoLimits,
    memo: Memo,
    ctx: RewriteContext,
    state: ExplorationState,
    root: Option<GroupId>,
}

impl VolcanoPlanner {
    pub fn new(rules: RuleSet, calculator: CostCalculator, limits: VolcanoLimits) -> Self {
        // 实现规则先于变换规则触发，预算耗尽时每个逻辑成员仍然尽量有物理实现
        let mut ordered = RuleSet::new(&rules.name);
        for rule in rules.rules() {
            if rule.kind() == RuleKind::Implementation {
                ordered.add_rule(rule.clone());
            }
        }
        for rule in rules.rules() {
            if rule.kind() != RuleKind::Implementation {
                ordered.add_rule(rule.clone());
            }
        }
        let ctx = RewriteContext::new().with_catalog(calculator.catalog().clone());
        Self {
            rules: ordered,
            calculator,
            limits,
            memo: Memo::new(),
            ctx,
            state: ExplorationState::default(),
            root: None,
        }
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn root(&self) -> Option<GroupId> {
        self.root.map(|g| self.memo.find(g))
    }

    pub fn exploration(&self) -> &ExplorationState {
        &self.state
    }

    /// 完整流程：登记、探索、求解
    pub fn optimize(
        &mut self,
        tree: &Arc<PlanNode>,
        required: &TraitSet,
    ) -> OptimizeResult<VolcanoOutcome> {
        let required = canonical_required(required, tree.schema())?;
        let root = self.set_root(tree)?;
        self.explore()?;
        let winner = self.find_best_plan(root, &required)?;
        let mut warnings = Vec::new();
        if let Some(warning) = self.state.take_warning() {
            warnings.push(warning);
        }
        info!(
            "代价搜索结束: {} 个等价集，{} 个成员，{} 轮探索，最优代价 {}",
            self.memo.set_count(),
            self.memo.member_count(),
            self.state.passes,
            winner.cost
        );
        Ok(VolcanoOutcome {
            plan: winner.plan,
            cost: winner.cost,
            root: self.memo.find(root),
            warnings,
            memo_nodes: self.memo.member_count(),
            memo_sets: self.memo.set_count(),
        })
    }

    /// 登记输入树，返回根等价集
    pub fn set_root(&mut self, tree: &Arc<PlanNode>) -> OptimizeResult<GroupId> {
        self.ctx.seed_after(tree.max_id());
        let (root, _) = self.register(tree, None)?;
        self.root = Some(root);
        Ok(root)
    }

    /// 把一棵树登记进 memo
    ///
    /// `target` 给出时，树根与该等价集等价；如果树根已经属于另一个等价集，两者合并。
    /// 返回树根所在的等价集以及 memo 是否发生变化。
    pub fn register(
        &mut self,
        node: &Arc<PlanNode>,
        target: Option<GroupId>,
    ) -> OptimizeResult<(GroupId, bool)> {
        if let PlanNodeKind::GroupRef(group_ref) = node.kind() {
            let group = self.memo.find(GroupId(group_ref.group()));
            return Ok(self.join_target(group, target, false));
        }

        let mut changed = false;
        let mut inputs = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let (group, child_changed) = self.register(child, None)?;
            changed |= child_changed;
            inputs.push(group);
        }

        if let Some(existing) = self.memo.lookup(node.kind(), &inputs) {
            let group = self.memo.group_of(existing);
            return Ok(self.join_target(group, target, changed));
        }

        let group = match target {
            Some(target) => self.memo.find(target),
            None => {
                let rows = {
                    let estimates = self.input_estimates(&inputs);
                    self.calculator.estimate_rows(node.kind(), &estimates)
                };
                self.memo.create_set(node.schema().clone(), rows)
            }
        };
        self.memo.add_member(
            group,
            MemoNode {
                id: node.id(),
                kind: node.kind().clone(),
                inputs,
            },
        );
        Ok((group, true))
    }

    fn join_target(
        &mut self,
        group: GroupId,
        target: Option<GroupId>,
        changed: bool,
    ) -> (GroupId, bool) {
        match target {
            Some(target) if self.memo.find(target) != group => {
                debug!("合并等价集 {} 与 {}", self.memo.find(target), group);
                (self.memo.merge(target, group), true)
            }
            _ => (group, changed),
        }
    }

    /// 对所有逻辑成员反复触发规则，直到没有新的成员
    pub fn explore(&mut self) -> OptimizeResult<()> {
        let rules: Vec<Arc<dyn RewriteRule>> = self.rules.rules().to_vec();
        loop {
            let mut changed = false;
            let mut index = 0;
            while index < self.memo.member_count() {
                let member = MemberId(index);
                index += 1;
                if self.memo.member(member).is_physical() {
                    continue;
                }
                for rule in &rules {
                    if self.state.budget_exceeded() && rule.kind() != RuleKind::Implementation {
                        continue;
                    }
                    changed |= self.fire(rule, member)?;
                    self.check_budget();
                }
            }
            self.state.passes += 1;
            if !changed || self.state.budget_exceeded() {
                break;
            }
        }
        debug!("memo 内容:\n{}", self.memo.dump());
        Ok(())
    }

    fn check_budget(&mut self) {
        if self.state.budget_exceeded() {
            return;
        }
        let limit = if self.memo.member_count() > self.limits.max_memo_nodes {
            Some(format!("{} 个 memo 成员", self.limits.max_memo_nodes))
        } else {
            match self.limits.timeout {
                Some(timeout) if self.state.elapsed() > timeout => {
                    Some(format!("{} ms", timeout.as_millis()))
                }
                _ => None,
            }
        };
        if let Some(limit) = limit {
            warn!("代价搜索超出预算 {}，停止探索变换规则", limit);
            self.state.exceed(OptimizeError::BudgetExceeded {
                planner: "VolcanoPlanner".to_string(),
                limit,
            });
        }
    }

    /// 在一个成员的全部绑定上触发规则
    fn fire(&mut self, rule: &Arc<dyn RewriteRule>, member: MemberId) -> OptimizeResult<bool> {
        let pattern = rule.pattern();
        let mut changed = false;
        for binding in self.bindings(member, &pattern)? {
            let key = (member, rule.name(), binding.digest());
            if !self.state.mark_fired(key) {
                continue;
            }
            let matched = RuleMatch::new(binding.clone(), &pattern);
            let result = rule
                .apply(&mut self.ctx, &matched)
                .map_err(|e| OptimizeError::rule_application(rule.name(), e.to_string()))?;
            let result = match result {
                Some(result) => result,
                None => continue,
            };
            for new_node in &result.new_nodes {
                if !new_node.schema().same_row_type(binding.schema()) {
                    return Err(OptimizeError::rule_application(
                        rule.name(),
                        format!(
                            "输出模式由 {} 变为 {}",
                            binding.schema(),
                            new_node.schema()
                        ),
                    ));
                }
                let group = self.memo.group_of(member);
                let (_, registered) = self.register(new_node, Some(group))?;
                if registered {
                    debug!(
                        "规则 {} 在等价集 {} 中加入 {}",
                        rule.name(),
                        self.memo.find(group),
                        new_node.kind().digest()
                    );
                }
                changed |= registered;
            }
        }
        Ok(changed)
    }

    /// 模式在成员上的全部绑定
    ///
    /// 模式约束的子节点展开为子等价集中匹配的逻辑成员，其余子节点用 `GroupRef` 代替
    fn bindings(&self, member: MemberId, pattern: &Pattern) -> OptimizeResult<Vec<Arc<PlanNode>>> {
        let node = self.memo.member(member);
        if !pattern.matches_name(node.kind.name()) {
            return Ok(Vec::new());
        }
        let mut options: Vec<Vec<Arc<PlanNode>>> = Vec::with_capacity(node.inputs.len());
        for (i, input) in node.inputs.iter().enumerate() {
            match pattern.dependencies.get(i) {
                Some(dep) if !dep.is_any() => {
                    let mut alternatives = Vec::new();
                    for child in self.memo.members_of(*input) {
                        if self.memo.member(child).is_physical() {
                            continue;
                        }
                        alternatives.extend(self.bindings(child, dep)?);
                    }
                    if alternatives.is_empty() {
                        return Ok(Vec::new());
                    }
                    options.push(alternatives);
                }
                _ => options.push(vec![self.group_ref(*input)?]),
            }
        }

        let mut combinations: Vec<Vec<Arc<PlanNode>>> = vec![Vec::new()];
        for alternatives in options {
            let mut next = Vec::with_capacity(combinations.len() * alternatives.len());
            for prefix in &combinations {
                for alternative in &alternatives {
                    let mut children = prefix.clone();
                    children.push(alternative.clone());
                    next.push(children);
                }
            }
            combinations = next;
        }
        combinations
            .into_iter()
            .map(|children| Ok(Arc::new(PlanNode::new(node.id, node.kind.clone(), children)?)))
            .collect()
    }

    fn group_ref(&self, group: GroupId) -> OptimizeResult<Arc<PlanNode>> {
        let group = self.memo.find(group);
        let set = self.memo.set(group);
        let kind = PlanNodeKind::GroupRef(GroupRefNode::new(
            group.0,
            set.schema.clone(),
            set.row_count,
        ));
        Ok(Arc::new(PlanNode::new(NodeId(0), kind, vec![])?))
    }

    fn input_estimates(&self, inputs: &[GroupId]) -> Vec<InputEstimate<'_>> {
        inputs
            .iter()
            .map(|g| {
                let set = self.memo.set(*g);
                InputEstimate {
                    rows: set.row_count,
                    schema: &set.schema,
                }
            })
            .collect()
    }

    /// 求根等价集在所需特征下的最优物理计划，无解时返回 `NoPlanFound`
    pub fn find_best_plan(&mut self, group: GroupId, required: &TraitSet) -> OptimizeResult<Winner> {
        match self.find_best(group, required)? {
            Some(winner) => Ok(winner),
            None => Err(OptimizeError::NoPlanFound {
                set: self.memo.find(group).0,
                required: required.to_string(),
            }),
        }
    }

    fn find_best(&mut self, group: GroupId, required: &TraitSet) -> OptimizeResult<Option<Winner>> {
        let group = self.memo.find(group);
        match self.memo.set(group).status(required) {
            OptimizationStatus::Optimized(winner) => return Ok(winner),
            OptimizationStatus::InProgress => return Ok(None),
            OptimizationStatus::Unoptimized => {}
        }
        self.memo
            .set_mut(group)
            .set_status(required.clone(), OptimizationStatus::InProgress);

        let mut best: Option<Winner> = None;
        for member_id in self.memo.members_of(group) {
            let member = self.memo.member(member_id).clone();
            if !member.is_physical() {
                continue;
            }
            if let Some(candidate) = self.implement_member(group, &member, required)? {
                if best.as_ref().map_or(true, |b| candidate.cost.is_lt(&b.cost)) {
                    best = Some(candidate);
                }
            }
        }
        if let Some(enforced) = self.enforce(group, required)? {
            if best.as_ref().map_or(true, |b| enforced.cost.is_lt(&b.cost)) {
                best = Some(enforced);
            }
        }

        if let Some(winner) = &best {
            debug!(
                "等价集 {} 在 {} 下选择 {}，代价 {}",
                group,
                required,
                winner.plan.kind().digest(),
                winner.cost
            );
        }
        self.memo
            .set_mut(group)
            .set_status(required.clone(), OptimizationStatus::Optimized(best.clone()));
        Ok(best)
    }

    /// 以某个物理成员为根构造计划，子计划取子等价集在成员要求下的最优方案
    fn implement_member(
        &mut self,
        group: GroupId,
        member: &MemoNode,
        required: &TraitSet,
    ) -> OptimizeResult<Option<Winner>> {
        let child_requirements = self.child_requirements(group, member, required)?;
        let mut cost = self.own_cost(group, member);
        let mut children = Vec::with_capacity(member.inputs.len());
        for (input, child_required) in member.inputs.iter().zip(child_requirements.iter()) {
            match self.find_best(*input, child_required)? {
                Some(child) => {
                    cost += child.cost;
                    children.push(child.plan);
                }
                None => return Ok(None),
            }
        }
        let plan = Arc::new(PlanNode::new(member.id, member.kind.clone(), children)?);
        if !plan.traits().satisfies(required) {
            return Ok(None);
        }
        Ok(Some(Winner { plan, cost }))
    }

    /// 所需特征无法由成员直接满足时插入强制节点：排序用 ExternalSort，分布用 Exchange
    fn enforce(&mut self, group: GroupId, required: &TraitSet) -> OptimizeResult<Option<Winner>> {
        if !required_resolves(required, &self.memo.set(group).schema) {
            return Ok(None);
        }
        let kind = if !required.collation.is_empty() {
            PlanNodeKind::ExternalSort(SortNode::new(required.collation.clone()))
        } else if required.distribution != Distribution::Any {
            PlanNodeKind::Exchange(ExchangeNode::new(required.distribution.clone()))
        } else {
            return Ok(None);
        };
        let relaxed = match &kind {
            PlanNodeKind::ExternalSort(_) => required.clone().with_collation(Collation::empty()),
            _ => TraitSet::physical(),
        };
        let input = match self.find_best(group, &relaxed)? {
            Some(input) => input,
            None => return Ok(None),
        };
        let set = self.memo.set(group);
        let rows = set.row_count;
        let own = self.calculator.operator_cost(
            &kind,
            rows,
            &[InputEstimate {
                rows,
                schema: &set.schema,
            }],
        );
        let plan = Arc::new(PlanNode::new(
            self.ctx.allocate_node_id(),
            kind,
            vec![input.plan],
        )?);
        if !plan.traits().satisfies(required) {
            return Ok(None);
        }
        Ok(Some(Winner {
            plan,
            cost: input.cost + own,
        }))
    }

    fn own_cost(&self, group: GroupId, member: &MemoNode) -> Cost {
        let rows = self.memo.set(group).row_count;
        let inputs = self.input_estimates(&member.inputs);
        self.calculator.operator_cost(&member.kind, rows, &inputs)
    }

    /// 成员对每个子节点提出的特征要求
    fn child_requirements(
        &self,
        group: GroupId,
        member: &MemoNode,
        required: &TraitSet,
    ) -> OptimizeResult<Vec<TraitSet>> {
        let any = TraitSet::physical();
        let input_schema = |i: usize| &self.memo.set(member.inputs[i]).schema;
        let requirements = match &member.kind {
            PlanNodeKind::FilterExec(_) => vec![any
                .with_collation(required.collation.clone())
                .with_distribution(required.distribution.clone())],
            PlanNodeKind::ProjectExec(project) => {
                let output = &self.memo.set(group).schema;
                let input = input_schema(0);
                vec![project_requirement(project, output, input, required)]
            }
            PlanNodeKind::MergeJoin(join) => {
                let (left, right) = (input_schema(0), input_schema(1));
                let info = join.analyze_condition(left, right);
                let names = |schema: &Schema, idx: Vec<usize>| -> Vec<String> {
                    idx.into_iter()
                        .filter_map(|i| schema.field(i).map(|f| f.name.clone()))
                        .collect()
                };
                let left_keys = names(left, info.keys.iter().map(|k| k.left).collect());
                let right_keys = names(right, info.keys.iter().map(|k| k.right).collect());
                vec![
                    any.clone().with_collation(Collation::ascending(&left_keys)),
                    any.with_collation(Collation::ascending(&right_keys)),
                ]
            }
            PlanNodeKind::NestedLoopJoin(join) => {
                // 只有全部排序列都来自左侧时，左侧的顺序才能原样保留到输出
                let left = match resolve_collation(&required.collation, input_schema(0)) {
                    Ok(collation) if !join.join_type().generates_nulls_on_left() => {
                        any.clone().with_collation(collation)
                    }
                    _ => any.clone(),
                };
                vec![left, any]
            }
            PlanNodeKind::PresortedSort(sort) => {
                let collation = resolve_collation(sort.collation(), input_schema(0))?;
                vec![any
                    .with_collation(collation)
                    .with_distribution(required.distribution.clone())]
            }
            PlanNodeKind::ExternalSort(_) => {
                vec![any.with_distribution(required.distribution.clone())]
            }
            PlanNodeKind::SortAggregate(agg) => {
                let collation =
                    resolve_collation(&Collation::ascending(agg.group_keys()), input_schema(0))?;
                vec![any.with_collation(collation)]
            }
            _ => vec![any; member.inputs.len()],
        };
        Ok(requirements)
    }
}

/// 投影之上的排序与分布要求换算为输入列；只有直接的列引用可以换算
fn project_requirement(
    project: &ProjectNode,
    output: &Schema,
    input: &Schema,
    required: &TraitSet,
) -> TraitSet {
    let to_input = |column: &str| -> Option<String> {
        let idx = output.resolve(column)?;
        let source = project.items().get(idx)?.expr.as_column()?;
        let input_idx = input.resolve(source)?;
        input.field(input_idx).map(|f| f.name.clone())
    };
    let mapped: Option<Vec<_>> = required
        .collation
        .fields()
        .iter()
        .map(|fc| {
            to_input(fc.column.as_str()).map(|column| FieldCollation {
                column,
                direction: fc.direction,
            })
        })
        .collect();
    let distribution = match &required.distribution {
        Distribution::Hash(keys) => keys
            .iter()
            .map(|k| to_input(k.as_str()))
            .collect::<Option<Vec<_>>>()
            .map(Distribution::Hash)
            .unwrap_or(Distribution::Any),
        other => other.clone(),
    };
    TraitSet::physical()
        .with_collation(Collation::new(mapped.unwrap_or_default()))
        .with_distribution(distribution)
}

/// 所需特征引用的列是否都在模式中
fn required_resolves(required: &TraitSet, schema: &Schema) -> bool {
    let collation_ok = resolve_collation(&required.collation, schema).is_ok();
    let distribution_ok = match &required.distribution {
        Distribution::Hash(keys) => keys.iter().all(|k| schema.index_of(k).is_ok()),
        _ => true,
    };
    collation_ok && distribution_ok
}

/// 所需特征中的列名换成根模式中的完整字段名，约定固定为物理
fn canonical_required(required: &TraitSet, schema: &Schema) -> OptimizeResult<TraitSet> {
    let collation = resolve_collation(&required.collation, schema)?;
    let distribution = match &required.distribution {
        Distribution::Hash(keys) => {
            let mut names = Vec::with_capacity(keys.len());
            for key in keys {
                names.push(schema.field_by_name(key)?.name.clone());
            }
            Distribution::Hash(names)
        }
        other => other.clone(),
    };
    Ok(TraitSet {
        convention: Convention::Physical,
        collation,
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression};
    use crate::query::optimizer::cost::CostModelConfig;
    use crate::query::optimizer::stats::{InMemoryCatalog, TableStatistics};
    use crate::query::planner::plan::{JoinType, PlanBuilder};
    use crate::query::planner::rewrite::{
        FilterIntoJoinRule, ImplementFilterRule, ImplementJoinRule, ImplementProjectRule,
        ImplementScanRule, ImplementSortRule, JoinCommuteRule,
    };

    fn calculator() -> CostCalculator {
        let catalog = InMemoryCatalog::new()
            .with_table(TableStatistics::new("a", 60).with_distinct("k", 60))
            .with_table(TableStatistics::new("b", 20).with_distinct("k", 20));
        CostCalculator::new(Arc::new(catalog), CostModelConfig::default())
    }

    fn physical_rules() -> RuleSet {
        RuleSet::new("physical")
            .with_rule(Arc::new(ImplementScanRule::new()))
            .with_rule(Arc::new(ImplementFilterRule::new()))
            .with_rule(Arc::new(ImplementJoinRule::new()))
            .with_rule(Arc::new(ImplementSortRule::new()))
    }

    fn join_tree() -> Arc<PlanNode> {
        let mut b = PlanBuilder::new();
        let a = b.scan("a", &[("k", DataType::Int)]).unwrap();
        let c = b.scan("b", &[("k", DataType::Int)]).unwrap();
        b.join(
            a,
            c,
            JoinType::Inner,
            Expression::eq(Expression::column("a.k"), Expression::column("b.k")),
        )
        .unwrap()
    }

    #[test]
    fn test_register_deduplicates() {
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let tree = join_tree();
        let root = planner.set_root(&tree).unwrap();
        assert_eq!(planner.memo().set_count(), 3);
        let (again, changed) = planner.register(&tree, None).unwrap();
        assert_eq!(again, root);
        assert!(!changed);
        assert_eq!(planner.memo().set(root).row_count, 20.0);
    }

    #[test]
    fn test_picks_hash_join() {
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let outcome = planner.optimize(&join_tree(), &TraitSet::physical()).unwrap();
        assert_eq!(outcome.plan.name(), "HashJoin");
        assert!(outcome.plan.is_physical_tree());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_collation_enforced() {
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let required = TraitSet::physical().with_collation(Collation::ascending(&["k"]));
        // 根模式中 `k` 有歧义
        assert!(planner.optimize(&join_tree(), &required).is_err());

        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let required = TraitSet::physical().with_collation(Collation::ascending(&["a.k"]));
        let outcome = planner.optimize(&join_tree(), &required).unwrap();
        assert!(outcome.plan.traits().collation.satisfies(&Collation::ascending(&["a.k"])));
    }

    #[test]
    fn test_no_plan_without_implementations() {
        let rules = RuleSet::new("logical").with_rule(Arc::new(FilterIntoJoinRule::new()));
        let mut planner = VolcanoPlanner::new(rules, calculator(), VolcanoLimits::default());
        let err = planner
            .optimize(&join_tree(), &TraitSet::physical())
            .unwrap_err();
        assert!(matches!(err, OptimizeError::NoPlanFound { set: 2, .. }));
    }

    #[test]
    fn test_commute_cycle_terminates() {
        let rules = physical_rules().with_rule(Arc::new(JoinCommuteRule::new()));
        let mut planner = VolcanoPlanner::new(rules, calculator(), VolcanoLimits::default());
        let outcome = planner.optimize(&join_tree(), &TraitSet::physical()).unwrap();
        assert!(outcome.plan.is_physical_tree());
        assert!(outcome.memo_sets >= 4);
    }

    #[test]
    fn test_memo_budget_keeps_plan() {
        let rules = physical_rules().with_rule(Arc::new(JoinCommuteRule::new()));
        let limits = VolcanoLimits {
            max_memo_nodes: 4,
            timeout: None,
        };
        let mut planner = VolcanoPlanner::new(rules, calculator(), limits);
        let outcome = planner.optimize(&join_tree(), &TraitSet::physical()).unwrap();
        assert!(outcome.plan.is_physical_tree());
        assert!(matches!(
            outcome.warnings.first(),
            Some(OptimizeError::BudgetExceeded { .. })
        ));
    }
    #[test]
    fn test_right_side_collation() {
        let rules = physical_rules()
            .with_rule(Arc::new(ImplementProjectRule::new()))
            .with_rule(Arc::new(JoinCommuteRule::new()));
        let required = TraitSet::physical().with_collation(Collation::ascending(&["b.k"]));
        let mut planner = VolcanoPlanner::new(rules, calculator(), VolcanoLimits::default());
        let outcome = planner.optimize(&join_tree(), &required).unwrap();

        assert!(outcome.plan.is_physical_tree());
        assert!(outcome.plan.traits().satisfies(&required));
    }

    #[test]
    fn test_hash_distribution_with_collation() {
        let required = TraitSet::physical()
            .with_collation(Collation::ascending(&["a.k"]))
            .with_distribution(Distribution::Hash(vec!["a.k".to_string()]));
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let outcome = planner.optimize(&join_tree(), &required).unwrap();

        assert_eq!(outcome.plan.name(), "ExternalSort", "计划:\n{}", outcome.plan.explain());
        assert_eq!(outcome.plan.children()[0].name(), "Exchange");
        assert!(outcome.plan.traits().satisfies(&required));
    }

    #[test]
    fn test_unresolvable_requirement_is_pruned() {
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), VolcanoLimits::default());
        let tree = join_tree();
        let root = planner.set_root(&tree).unwrap();
        planner.explore().unwrap();
        let scan_a = GroupId(0);
        assert_ne!(planner.memo().find(scan_a), planner.memo().find(root));

        // 左表上要求右表的列：没有可行计划，但不是错误
        let required = TraitSet::physical().with_collation(Collation::ascending(&["b.k"]));
        assert!(planner.find_best(scan_a, &required).unwrap().is_none());
        let required = TraitSet::physical().with_distribution(Distribution::Hash(vec!["b.k".to_string()]));
        assert!(planner.find_best(scan_a, &required).unwrap().is_none());
    }

    #[test]
    fn test_timeout_keeps_plan() {
        let limits = VolcanoLimits {
            max_memo_nodes: 10_000,
            timeout: Some(Duration::ZERO),
        };
        let mut planner = VolcanoPlanner::new(physical_rules(), calculator(), limits);
        let outcome = planner.optimize(&join_tree(), &TraitSet::physical()).unwrap();

        assert!(outcome.plan.is_physical_tree());
        assert!(matches!(
            outcome.warnings.first(),
            Some(OptimizeError::BudgetExceeded { limit, .. }) if limit == "0 ms"
        ));
    }
}
