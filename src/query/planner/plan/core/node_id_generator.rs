//! 节点ID生成器
//!
//! 每次优化运行持有自己的生成器，相同输入在不同运行中得到相同的ID序列

use serde::{Deserialize, Serialize};
use std::fmt;

/// 计划节点ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 节点ID生成器
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    next: u64,
}

impl NodeIdGenerator {
    /// 从 1 开始分配，0 保留
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// 从给定ID之后开始分配，用于在已有计划上继续生成节点
    pub fn starting_after(max: NodeId) -> Self {
        Self { next: max.0 + 1 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// 已分配的最大ID
    pub fn last_id(&self) -> NodeId {
        NodeId(self.next.saturating_sub(1))
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let mut ids = NodeIdGenerator::new();
        assert_eq!(ids.next_id(), NodeId(1));
        assert_eq!(ids.next_id(), NodeId(2));
        assert_eq!(ids.last_id(), NodeId(2));
    }

    #[test]
    fn test_independent_generators() {
        let mut a = NodeIdGenerator::starting_after(NodeId(10));
        let mut b = NodeIdGenerator::starting_after(NodeId(10));
        assert_eq!(a.next_id(), NodeId(11));
        assert_eq!(b.next_id(), NodeId(11));
    }
}
