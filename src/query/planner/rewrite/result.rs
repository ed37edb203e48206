//! 重写结果定义
//!
//! 定义重写规则的返回结果类型

use std::sync::Arc;

use crate::core::error::PlanError;
use crate::query::planner::plan::PlanNode;
use crate::query::planner::rewrite::pattern::Pattern;

/// 重写错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RewriteError {
    #[error("无效的计划节点: {0}")]
    InvalidNode(String),

    #[error("重写失败: {0}")]
    RewriteFailed(String),

    #[error("构造节点失败: {0}")]
    Plan(#[from] PlanError),
}

impl RewriteError {
    pub fn invalid_node(msg: impl Into<String>) -> Self {
        Self::InvalidNode(msg.into())
    }

    pub fn rewrite_failed(msg: impl Into<String>) -> Self {
        Self::RewriteFailed(msg.into())
    }
}

/// 重写结果类型
pub type RewriteResult<T> = std::result::Result<T, RewriteError>;

/// 转换结果
///
/// 规则提出的替换节点；代价搜索会把每个节点都登记为等价方案，
/// 启发式重写只取第一个
#[derive(Debug, Default, Clone)]
pub struct TransformResult {
    pub new_nodes: Vec<Arc<PlanNode>>,
}

impl TransformResult {
    /// 创建新的转换结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 只有一个替换节点的结果
    pub fn replace(node: Arc<PlanNode>) -> Self {
        Self {
            new_nodes: vec![node],
        }
    }

    /// 添加新的计划节点
    pub fn add_new_node(&mut self, node: Arc<PlanNode>) {
        self.new_nodes.push(node);
    }

    /// 检查是否有新节点
    pub fn has_new_nodes(&self) -> bool {
        !self.new_nodes.is_empty()
    }

    /// 获取第一个新节点（如果存在）
    pub fn first_new_node(&self) -> Option<&Arc<PlanNode>> {
        self.new_nodes.first()
    }
}

/// 匹配结果
///
/// 模式在具体节点上的一次绑定，按模式的前序记录被绑定的节点
#[derive(Debug, Clone)]
pub struct RuleMatch {
    root: Arc<PlanNode>,
    nodes: Vec<Arc<PlanNode>>,
}

impl RuleMatch {
    pub fn new(root: Arc<PlanNode>, pattern: &Pattern) -> Self {
        let mut nodes = Vec::new();
        collect_bound(&root, pattern, &mut nodes);
        Self { root, nodes }
    }

    /// 匹配的根节点
    pub fn root(&self) -> &Arc<PlanNode> {
        &self.root
    }

    /// 按模式前序排列的已绑定节点，第 0 个是根
    pub fn nodes(&self) -> &[Arc<PlanNode>] {
        &self.nodes
    }

    /// 根节点的第 i 个子节点
    pub fn input(&self, index: usize) -> RewriteResult<&Arc<PlanNode>> {
        self.root.child(index).ok_or_else(|| {
            RewriteError::invalid_node(format!(
                "{} 没有第 {} 个子节点",
                self.root.name(),
                index
            ))
        })
    }
}

fn collect_bound(node: &Arc<PlanNode>, pattern: &Pattern, out: &mut Vec<Arc<PlanNode>>) {
    out.push(node.clone());
    for (i, dep) in pattern.dependencies.iter().enumerate() {
        if dep.node.is_none() {
            continue;
        }
        if let Some(child) = node.child(i) {
            collect_bound(child, dep, out);
        }
    }
}
