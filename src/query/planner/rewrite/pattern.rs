//! 模式匹配定义
//!
//! 模式是对节点种类名称与子节点位置的结构化谓词。
//! 第 i 个依赖模式匹配第 i 个子节点；没有给出的子节点不做约束。

use crate::query::planner::plan::PlanNode;

/// 模式结构体
///
/// 用于匹配计划树的特定结构。
/// 包含当前节点的匹配条件和子节点的模式。
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    /// 当前节点的匹配条件，None 匹配任何节点
    pub node: Option<MatchNode>,
    /// 子节点的模式列表，按位置对应
    pub dependencies: Vec<Pattern>,
}

impl Pattern {
    /// 创建空模式（匹配任何节点）
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定节点创建模式
    pub fn with_node(node: MatchNode) -> Self {
        Self {
            node: Some(node),
            dependencies: Vec::new(),
        }
    }

    /// 使用节点名称创建模式
    pub fn new_with_name(name: &'static str) -> Self {
        Self::with_node(MatchNode::Single(name))
    }

    /// 使用多个可能的节点名称创建模式
    pub fn multi(node_names: Vec<&'static str>) -> Self {
        Self::with_node(MatchNode::Multi(node_names))
    }

    /// 添加子节点模式
    pub fn with_dependency(mut self, dependency: Pattern) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// 使用节点名称添加子节点模式
    pub fn with_dependency_name(mut self, name: &'static str) -> Self {
        self.dependencies.push(Self::new_with_name(name));
        self
    }

    /// 只检查当前节点名称
    pub fn matches_name(&self, name: &str) -> bool {
        self.node.as_ref().map(|n| n.matches(name)).unwrap_or(true)
    }

    /// 检查模式是否匹配给定的计划子树
    pub fn matches(&self, plan_node: &PlanNode) -> bool {
        if !self.matches_name(plan_node.name()) {
            return false;
        }
        self.dependencies
            .iter()
            .enumerate()
            .all(|(i, dep)| match plan_node.child(i) {
                Some(child) => dep.matches(child),
                None => false,
            })
    }

    /// 模式是否约束了当前节点
    pub fn is_any(&self) -> bool {
        self.node.is_none() && self.dependencies.is_empty()
    }

    // ==================== 便捷构造方法 ====================

    /// 创建匹配 Project 节点的模式
    pub fn with_project_matcher() -> Self {
        Self::new_with_name("Project")
    }

    /// 创建匹配 Filter 节点的模式
    pub fn with_filter_matcher() -> Self {
        Self::new_with_name("Filter")
    }

    /// 创建匹配 Sort 节点的模式
    pub fn with_sort_matcher() -> Self {
        Self::new_with_name("Sort")
    }

    /// 创建匹配 Aggregate 节点的模式
    pub fn with_aggregate_matcher() -> Self {
        Self::new_with_name("Aggregate")
    }

    /// 创建匹配逻辑 Join 节点的模式
    pub fn with_join_matcher() -> Self {
        Self::new_with_name("Join")
    }

    /// 创建匹配空结果节点的模式
    pub fn with_empty_matcher() -> Self {
        Self::new_with_name("Empty")
    }
}

/// 节点匹配枚举
///
/// 定义如何匹配单个计划节点
#[derive(Debug, Clone)]
pub enum MatchNode {
    /// 匹配单个特定名称的节点
    Single(&'static str),
    /// 匹配多个可能名称中的任意一个
    Multi(Vec<&'static str>),
    /// 匹配任何节点
    Any,
}

impl MatchNode {
    /// 检查节点名称是否匹配
    pub fn matches(&self, node_name: &str) -> bool {
        match self {
            MatchNode::Single(name) => *name == node_name,
            MatchNode::Multi(names) => names.contains(&node_name),
            MatchNode::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression};
    use crate::query::planner::plan::{JoinType, PlanBuilder};

    #[test]
    fn test_positional_matching() {
        let mut b = PlanBuilder::new();
        let a = b.scan("a", &[("x", DataType::Int)]).unwrap();
        let c = b.scan("c", &[("y", DataType::Int)]).unwrap();
        let join = b
            .join(a, c, JoinType::Inner, Expression::eq(Expression::column("x"), Expression::column("y")))
            .unwrap();
        let filter = b
            .filter(join.clone(), Expression::gt(Expression::column("x"), Expression::int(1)))
            .unwrap();

        let pattern = Pattern::with_filter_matcher().with_dependency(Pattern::with_join_matcher());
        assert!(pattern.matches(&filter));
        assert!(!pattern.matches(&join));

        let right_scan = Pattern::with_join_matcher()
            .with_dependency(Pattern::new())
            .with_dependency_name("Scan");
        assert!(right_scan.matches(&join));
        let right_empty = Pattern::with_join_matcher()
            .with_dependency(Pattern::new())
            .with_dependency(Pattern::with_empty_matcher());
        assert!(!right_empty.matches(&join));
    }

    #[test]
    fn test_multi_matcher() {
        let m = MatchNode::Multi(vec!["HashJoin", "MergeJoin"]);
        assert!(m.matches("MergeJoin"));
        assert!(!m.matches("Join"));
        assert!(MatchNode::Any.matches("Scan"));
        assert!(Pattern::new().is_any());
    }
}
