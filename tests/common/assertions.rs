//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use relopt::core::error::OptimizeError;
use relopt::query::planner::plan::PlanNode;

/// 断言两棵树结构相同（忽略节点ID）
pub fn assert_same_tree(actual: &PlanNode, expected: &PlanNode) {
    assert_eq!(
        actual.digest(),
        expected.digest(),
        "计划树不一致:\n实际:\n{}\n期望:\n{}",
        actual.explain(),
        expected.explain()
    );
}

/// 断言计划完全由物理节点组成
pub fn assert_physical(plan: &PlanNode) {
    assert!(
        plan.is_physical_tree(),
        "计划中仍有逻辑节点:\n{}",
        plan.explain()
    );
}

/// 断言告警中包含指定规划器的预算耗尽
pub fn assert_budget_warning(warnings: &[OptimizeError], planner: &str) {
    assert!(
        warnings.iter().any(|w| matches!(
            w,
            OptimizeError::BudgetExceeded { planner: p, .. } if p == planner
        )),
        "告警中应包含 {} 的预算耗尽, 实际是 {:?}",
        planner,
        warnings
    );
}
