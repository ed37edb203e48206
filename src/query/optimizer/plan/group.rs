//! 等价集定义
//!
//! 等价集（EquivalenceSet）是代价搜索的核心数据结构之一：
//! - 包含多个产生相同结果的成员节点（MemoNode），成员之间只在形状或物理特征上不同
//! - 成员的子节点用等价集下标引用，不直接持有子节点
//! - 按所需特征记录最优方案及其优化状态

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::schema::Schema;
use crate::query::optimizer::core::Cost;
use crate::query::planner::plan::{NodeId, PlanNode, PlanNodeKind, TraitSet};

/// 等价集下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// memo 成员下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub usize);

/// memo 中的成员节点
#[derive(Debug, Clone)]
pub struct MemoNode {
    pub id: NodeId,
    pub kind: PlanNodeKind,
    pub inputs: Vec<GroupId>,
}

impl MemoNode {
    pub fn is_physical(&self) -> bool {
        self.kind.is_physical()
    }
}

/// (等价集, 所需特征) 的优化状态
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationStatus {
    Unoptimized,
    /// 正在求解；搜索中再次遇到视为无穷代价
    InProgress,
    /// 已求解，结果在本次运行中不再改变；`None` 表示无解
    Optimized(Option<Winner>),
}

/// 某个所需特征下的最优方案
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub plan: Arc<PlanNode>,
    pub cost: Cost,
}

/// 等价集
#[derive(Debug, Clone)]
pub struct EquivalenceSet {
    pub id: GroupId,
    pub members: Vec<MemberId>,
    pub schema: Schema,
    /// 行数估计取自第一个登记的成员
    pub row_count: f64,
    winners: HashMap<TraitSet, OptimizationStatus>,
}

impl EquivalenceSet {
    pub fn new(id: GroupId, schema: Schema, row_count: f64) -> Self {
        Self {
            id,
            members: Vec::new(),
            schema,
            row_count,
            winners: HashMap::new(),
        }
    }

    pub fn add_member(&mut self, member: MemberId) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }

    pub fn status(&self, required: &TraitSet) -> OptimizationStatus {
        self.winners
            .get(required)
            .cloned()
            .unwrap_or(OptimizationStatus::Unoptimized)
    }

    pub fn set_status(&mut self, required: TraitSet, status: OptimizationStatus) {
        self.winners.insert(required, status);
    }

    /// 合并等价集后最优方案需要重新计算
    pub fn clear_winners(&mut self) {
        self.winners.clear();
    }

    pub fn optimized_count(&self) -> usize {
        self.winners
            .values()
            .filter(|s| matches!(s, OptimizationStatus::Optimized(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_unoptimized() {
        let mut set = EquivalenceSet::new(GroupId(0), Schema::empty(), 10.0);
        let required = TraitSet::physical();
        assert_eq!(set.status(&required), OptimizationStatus::Unoptimized);
        set.set_status(required.clone(), OptimizationStatus::InProgress);
        assert_eq!(set.status(&required), OptimizationStatus::InProgress);
        set.set_status(required.clone(), OptimizationStatus::Optimized(None));
        assert_eq!(set.optimized_count(), 1);
        set.clear_winners();
        assert_eq!(set.status(&required), OptimizationStatus::Unoptimized);

        set.add_member(MemberId(3));
        set.add_member(MemberId(3));
        assert_eq!(set.members.len(), 1);
        assert_eq!(GroupId(4).to_string(), "#4");
    }
}
