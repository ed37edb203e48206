//! Memo：等价集的 arena
//!
//! 等价集按下标存放，成员的子节点是等价集下标，因此 memo 可以包含环而不产生引用环。
//! 合并等价集使用并查集：被合并的一方指向保留的一方，所有下标在使用前先规范化。
//! 成员摘要由节点种类、属性与规范化后的子等价集组成，结构相同的成员只登记一次。

use std::collections::HashMap;
use std::fmt::Write;

use crate::core::schema::Schema;
use crate::query::optimizer::plan::group::{EquivalenceSet, GroupId, MemberId, MemoNode};
use crate::query::planner::plan::PlanNodeKind;

#[derive(Debug, Clone, Default)]
pub struct Memo {
    sets: Vec<EquivalenceSet>,
    parents: Vec<usize>,
    nodes: Vec<MemoNode>,
    owners: Vec<GroupId>,
    digests: HashMap<String, MemberId>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 规范化等价集下标
    pub fn find(&self, group: GroupId) -> GroupId {
        let mut current = group.0;
        while let Some(&parent) = self.parents.get(current) {
            if parent == current {
                break;
            }
            current = parent;
        }
        GroupId(current)
    }

    pub fn set(&self, group: GroupId) -> &EquivalenceSet {
        &self.sets[self.find(group).0]
    }

    pub fn set_mut(&mut self, group: GroupId) -> &mut EquivalenceSet {
        let id = self.find(group);
        &mut self.sets[id.0]
    }

    pub fn member(&self, member: MemberId) -> &MemoNode {
        &self.nodes[member.0]
    }

    /// 成员所在的等价集（已规范化）
    pub fn group_of(&self, member: MemberId) -> GroupId {
        self.find(self.owners[member.0])
    }

    pub fn members_of(&self, group: GroupId) -> Vec<MemberId> {
        self.set(group).members.clone()
    }

    /// 成员总数
    pub fn member_count(&self) -> usize {
        self.nodes.len()
    }

    /// 未被合并的等价集数量
    pub fn set_count(&self) -> usize {
        (0..self.sets.len())
            .filter(|i| self.find(GroupId(*i)).0 == *i)
            .count()
    }

    /// 成员摘要
    pub fn digest(&self, kind: &PlanNodeKind, inputs: &[GroupId]) -> String {
        let inputs: Vec<String> = inputs.iter().map(|g| self.find(*g).to_string()).collect();
        format!("{}[{}]", kind.digest(), inputs.join(", "))
    }

    /// 查找结构相同的已有成员
    pub fn lookup(&self, kind: &PlanNodeKind, inputs: &[GroupId]) -> Option<MemberId> {
        self.digests.get(&self.digest(kind, inputs)).copied()
    }

    pub fn create_set(&mut self, schema: Schema, row_count: f64) -> GroupId {
        let id = GroupId(self.sets.len());
        self.sets.push(EquivalenceSet::new(id, schema, row_count));
        self.parents.push(id.0);
        id
    }

    /// 登记新成员；调用方需先用 `lookup` 确认没有结构相同的成员
    pub fn add_member(&mut self, group: GroupId, node: MemoNode) -> MemberId {
        let group = self.find(group);
        let id = MemberId(self.nodes.len());
        let digest = self.digest(&node.kind, &node.inputs);
        self.nodes.push(node);
        self.owners.push(group);
        self.digests.insert(digest, id);
        self.sets[group.0].add_member(id);
        id
    }

    /// 合并两个等价集，返回保留的下标
    ///
    /// 合并后子节点下标发生变化的成员可能与其他成员结构相同，这会继续触发合并。
    pub fn merge(&mut self, a: GroupId, b: GroupId) -> GroupId {
        let kept = self.union(a, b);
        self.rehash();
        self.find(kept)
    }

    fn union(&mut self, a: GroupId, b: GroupId) -> GroupId {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return a;
        }
        let (kept, absorbed) = if a < b { (a, b) } else { (b, a) };
        self.parents[absorbed.0] = kept.0;
        let moved = std::mem::take(&mut self.sets[absorbed.0].members);
        for member in moved {
            self.sets[kept.0].add_member(member);
        }
        self.sets[kept.0].clear_winners();
        kept
    }

    fn rehash(&mut self) {
        loop {
            self.digests.clear();
            let mut pending = None;
            let mut duplicates = Vec::new();
            for index in 0..self.nodes.len() {
                let member = MemberId(index);
                let digest = self.digest(&self.nodes[index].kind, &self.nodes[index].inputs);
                match self.digests.get(&digest) {
                    Some(&existing) => {
                        let (g1, g2) = (self.group_of(existing), self.group_of(member));
                        if g1 != g2 {
                            pending = Some((g1, g2));
                            break;
                        }
                        duplicates.push((g2, member));
                    }
                    None => {
                        self.digests.insert(digest, member);
                    }
                }
            }
            match pending {
                Some((g1, g2)) => {
                    self.union(g1, g2);
                }
                None => {
                    for (group, member) in duplicates {
                        self.sets[group.0].members.retain(|m| *m != member);
                    }
                    break;
                }
            }
        }
    }

    /// 文本形式的 memo 内容，用于调试日志
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for i in 0..self.sets.len() {
            if self.find(GroupId(i)).0 != i {
                continue;
            }
            let set = &self.sets[i];
            let _ = writeln!(out, "Set {} rows={:.1} {}", set.id, set.row_count, set.schema);
            for member in &set.members {
                let node = &self.nodes[member.0];
                let _ = writeln!(out, "  {}", self.digest(&node.kind, &node.inputs));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Field;
    use crate::core::types::{DataType, Expression};
    use crate::query::planner::plan::{ColumnDef, FilterNode, NodeId, ScanNode};

    fn scan_kind(table: &str) -> PlanNodeKind {
        PlanNodeKind::Scan(ScanNode::new(table, vec![ColumnDef::new("a", DataType::Int, true)]))
    }

    fn schema(table: &str) -> Schema {
        Schema::new(vec![Field::new(format!("{}.a", table), DataType::Int, true)])
    }

    #[test]
    fn test_lookup_by_structure() {
        let mut memo = Memo::new();
        let g = memo.create_set(schema("t"), 10.0);
        let m = memo.add_member(
            g,
            MemoNode {
                id: NodeId(1),
                kind: scan_kind("t"),
                inputs: vec![],
            },
        );
        assert_eq!(memo.lookup(&scan_kind("t"), &[]), Some(m));
        assert_eq!(memo.lookup(&scan_kind("u"), &[]), None);
        assert_eq!(memo.group_of(m), g);
    }

    #[test]
    fn test_merge_cascades() {
        let mut memo = Memo::new();
        let filter = PlanNodeKind::Filter(FilterNode::new(Expression::gt(
            Expression::column("a"),
            Expression::int(1),
        )));
        let g0 = memo.create_set(schema("t"), 10.0);
        let g1 = memo.create_set(schema("t"), 10.0);
        let f0 = memo.create_set(schema("t"), 5.0);
        let f1 = memo.create_set(schema("t"), 5.0);
        memo.add_member(g0, MemoNode { id: NodeId(1), kind: scan_kind("t"), inputs: vec![] });
        memo.add_member(g1, MemoNode { id: NodeId(2), kind: scan_kind("x"), inputs: vec![] });
        memo.add_member(f0, MemoNode { id: NodeId(3), kind: filter.clone(), inputs: vec![g0] });
        memo.add_member(f1, MemoNode { id: NodeId(4), kind: filter, inputs: vec![g1] });
        assert_eq!(memo.set_count(), 4);

        // 两个输入等价后，两个过滤节点也等价
        let kept = memo.merge(g1, g0);
        assert_eq!(kept, g0);
        assert_eq!(memo.find(f1), f0);
        assert_eq!(memo.set_count(), 2);
        assert_eq!(memo.members_of(f0).len(), 1);
        assert_eq!(memo.set(f0).row_count, 5.0);
        assert!(memo.dump().contains("Set #0"));
    }
}
