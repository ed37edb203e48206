//! 重写上下文定义
//!
//! 规则通过上下文分配节点ID、创建新节点并访问目录

use std::sync::Arc;

use crate::query::optimizer::stats::Catalog;
use crate::query::planner::plan::{NodeId, NodeIdGenerator, PlanNode, PlanNodeKind};
use crate::query::planner::rewrite::result::RewriteResult;

/// 重写上下文
#[derive(Debug, Clone, Default)]
pub struct RewriteContext {
    /// 节点ID生成器
    ids: NodeIdGenerator,
    /// 目录，物理实现规则用它读取表的物理顺序
    catalog: Option<Arc<dyn Catalog>>,
}

impl RewriteContext {
    /// 创建新的重写上下文
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 从给定ID之后继续分配
    pub fn seed_after(&mut self, max: NodeId) {
        self.ids = NodeIdGenerator::starting_after(max);
    }

    /// 分配新的节点ID
    pub fn allocate_node_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    pub fn catalog(&self) -> Option<&Arc<dyn Catalog>> {
        self.catalog.as_ref()
    }

    /// 用新ID创建节点
    pub fn create_node(
        &mut self,
        kind: PlanNodeKind,
        children: Vec<Arc<PlanNode>>,
    ) -> RewriteResult<Arc<PlanNode>> {
        let id = self.allocate_node_id();
        Ok(Arc::new(PlanNode::new(id, kind, children)?))
    }
}
