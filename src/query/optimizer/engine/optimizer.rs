//! 优化器门面
//! 先用启发式规则集做重写，再把结果交给代价搜索，返回代价最小的物理计划

use std::sync::Arc;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::config::{Config, OptimizerConfig};
use crate::core::error::{OptimizeError, OptimizeStage, OptimizerError};
use crate::query::optimizer::core::Cost;
use crate::query::optimizer::cost::CostCalculator;
use crate::query::optimizer::engine::volcano::{VolcanoLimits, VolcanoPlanner};
use crate::query::optimizer::stats::Catalog;
use crate::query::planner::plan::{PlanNode, TraitSet};
use crate::query::planner::rewrite::{
    FilterIntoJoinRule, HepOutcome, HepPlanner, HepProgram, HepState, ImplementAggregateRule,
    ImplementEmptyRule, ImplementFilterRule, ImplementJoinRule, ImplementProjectRule,
    ImplementScanRule, ImplementSortRule, JoinCommuteRule, PruneEmptyAggregateRule,
    PruneEmptyFilterRule, PruneEmptyJoinLeftRule, PruneEmptyJoinRightRule, PruneEmptyProjectRule,
    PruneEmptySortRule, ReduceFilterExpressionsRule, ReduceJoinExpressionsRule,
    ReduceProjectExpressionsRule, RewriteContext, RuleSet,
};

/// 启发式阶段使用的逻辑规则集，按触发优先级排列
pub fn default_logical_rules(config: &OptimizerConfig) -> RuleSet {
    RuleSet::new("logical")
        .with_rule(Arc::new(FilterIntoJoinRule::new()))
        .with_rule(Arc::new(ReduceFilterExpressionsRule::new()))
        .with_rule(Arc::new(ReduceProjectExpressionsRule::new()))
        .with_rule(Arc::new(ReduceJoinExpressionsRule::new()))
        .with_rule(Arc::new(PruneEmptyFilterRule::new()))
        .with_rule(Arc::new(PruneEmptyProjectRule::new()))
        .with_rule(Arc::new(PruneEmptySortRule::new()))
        .with_rule(Arc::new(PruneEmptyAggregateRule::new()))
        .with_rule(Arc::new(PruneEmptyJoinLeftRule::new()))
        .with_rule(Arc::new(PruneEmptyJoinRightRule::new()))
        .without(&config.disabled_rules)
}

/// 代价搜索使用的完整规则集：逻辑规则、连接交换与全部实现规则
pub fn default_physical_rules(config: &OptimizerConfig) -> RuleSet {
    let mut rules = RuleSet::new("physical");
    rules.extend(&default_logical_rules(config));
    if config.enable_join_commute {
        rules.add_rule(Arc::new(JoinCommuteRule::new()));
    }
    rules
        .with_rule(Arc::new(ImplementScanRule::new()))
        .with_rule(Arc::new(ImplementFilterRule::new()))
        .with_rule(Arc::new(ImplementProjectRule::new()))
        .with_rule(Arc::new(ImplementEmptyRule::new()))
        .with_rule(Arc::new(ImplementJoinRule::new()))
        .with_rule(Arc::new(ImplementSortRule::new()))
        .with_rule(Arc::new(ImplementAggregateRule::new()))
        .without(&config.disabled_rules)
}

/// 优化结果
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// 代价最小的物理计划
    pub plan: Arc<PlanNode>,
    pub cost: Cost,
    /// 启发式阶段的输出
    pub rewritten: Arc<PlanNode>,
    pub hep_state: HepState,
    /// 预算耗尽等非致命告警
    pub warnings: Vec<OptimizeError>,
}

/// 优化器门面
///
/// 每次调用都创建独立的规划器，实例本身不保存任何搜索状态
#[derive(Debug, Clone)]
pub struct OptimizerEngine {
    catalog: Arc<dyn Catalog>,
    config: Config,
}

impl OptimizerEngine {
    pub fn new(catalog: Arc<dyn Catalog>, config: Config) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// 只运行启发式重写
    pub fn rewrite_only(&self, tree: &Arc<PlanNode>) -> Result<HepOutcome, OptimizerError> {
        let program = HepProgram::new(
            default_logical_rules(&self.config.optimizer),
            self.config.optimizer.hep_max_iterations,
        );
        let mut planner = HepPlanner::new(program);
        let mut ctx = RewriteContext::new().with_catalog(self.catalog.clone());
        planner
            .optimize(tree, &mut ctx)
            .map_err(|e| OptimizerError::new(OptimizeStage::Rewrite, e))
    }

    /// 启发式重写后做代价搜索，返回满足 `required` 的最优物理计划
    pub fn optimize(
        &self,
        tree: &Arc<PlanNode>,
        required: &TraitSet,
    ) -> Result<OptimizedPlan, OptimizerError> {
        let started = Instant::now();
        let hep = self.rewrite_only(tree)?;
        let mut warnings = Vec::new();
        if let Some(warning) = hep.budget_warning(self.config.optimizer.hep_max_iterations) {
            warnings.push(warning);
        }

        let calculator = CostCalculator::new(self.catalog.clone(), self.config.cost);
        let limits = VolcanoLimits {
            max_memo_nodes: self.config.optimizer.volcano_max_memo_nodes,
            timeout: self.config.optimizer.volcano_timeout(),
        };
        let mut volcano =
            VolcanoPlanner::new(default_physical_rules(&self.config.optimizer), calculator, limits);
        let outcome = volcano
            .optimize(&hep.plan, required)
            .map_err(|e| OptimizerError::new(OptimizeStage::Search, e))?;
        warnings.extend(outcome.warnings);

        info!(
            "优化完成: 耗时 {:?}，代价 {}，告警 {} 条",
            started.elapsed(),
            outcome.cost,
            warnings.len()
        );
        Ok(OptimizedPlan {
            plan: outcome.plan,
            cost: outcome.cost,
            rewritten: hep.plan,
            hep_state: hep.state,
            warnings,
        })
    }

    /// 并行优化互不相关的多棵树，每棵树使用自己的 memo
    pub fn optimize_all(
        &self,
        trees: &[Arc<PlanNode>],
        required: &TraitSet,
    ) -> Vec<Result<OptimizedPlan, OptimizerError>> {
        trees
            .par_iter()
            .map(|tree| self.optimize(tree, required))
            .collect()
    }
}
