//! 计划节点
//!
//! `PlanNode` 是不可变的表达式树节点。构造时根据种类和子节点推导输出模式与特征，
//! 之后不再改变；修改子节点只能通过 `with_children` 得到新节点，原节点保持不变。

use std::sync::Arc;

use super::plan_node_enum::PlanNodeKind;
use super::sort_node::resolve_collation;
use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::Schema;
use crate::query::planner::plan::core::node_id_generator::NodeId;
use crate::query::planner::plan::core::trait_set::{
    Collation, Distribution, FieldCollation, TraitSet,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    id: NodeId,
    kind: PlanNodeKind,
    children: Vec<Arc<PlanNode>>,
    schema: Schema,
    traits: TraitSet,
}

impl PlanNode {
    /// 创建节点，子节点数量或模式不合法时返回 `SchemaMismatch`
    pub fn new(id: NodeId, kind: PlanNodeKind, children: Vec<Arc<PlanNode>>) -> PlanResult<Self> {
        if children.len() != kind.arity() {
            return Err(PlanError::schema_mismatch(format!(
                "{} 需要 {} 个子节点，实际为 {}",
                kind.name(),
                kind.arity(),
                children.len()
            )));
        }
        let schema = derive_schema(&kind, &children)?;
        let traits = derive_traits(&kind, &children, &schema)?;
        Ok(Self {
            id,
            kind,
            children,
            schema,
            traits,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &PlanNodeKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn children(&self) -> &[Arc<PlanNode>] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Arc<PlanNode>> {
        self.children.get(index)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    /// 用新的子节点构造副本，保留ID与属性
    pub fn with_children(&self, children: Vec<Arc<PlanNode>>) -> PlanResult<PlanNode> {
        PlanNode::new(self.id, self.kind.clone(), children)
    }

    /// 忽略节点ID的结构摘要，两棵树摘要相同即结构相同
    pub fn digest(&self) -> String {
        if self.children.is_empty() {
            return self.kind.digest();
        }
        let children: Vec<String> = self.children.iter().map(|c| c.digest()).collect();
        format!("{}[{}]", self.kind.digest(), children.join(", "))
    }

    /// 树中最大的节点ID
    pub fn max_id(&self) -> NodeId {
        self.children
            .iter()
            .map(|c| c.max_id())
            .fold(self.id, |acc, id| acc.max(id))
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// 整棵树是否都是物理节点
    pub fn is_physical_tree(&self) -> bool {
        self.kind.is_physical() && self.children.iter().all(|c| c.is_physical_tree())
    }

    /// 前序遍历收集所有节点
    pub fn preorder(self: &Arc<Self>) -> Vec<Arc<PlanNode>> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            for child in node.children.iter().rev() {
                stack.push(child.clone());
            }
            out.push(node);
        }
        out
    }
}

fn derive_schema(kind: &PlanNodeKind, children: &[Arc<PlanNode>]) -> PlanResult<Schema> {
    let input = |i: usize| children[i].schema();
    match kind {
        PlanNodeKind::Scan(n) | PlanNodeKind::TableScan(n) => n.output_schema(),
        PlanNodeKind::Filter(n) | PlanNodeKind::FilterExec(n) => n.output_schema(input(0)),
        PlanNodeKind::Project(n) | PlanNodeKind::ProjectExec(n) => n.output_schema(input(0)),
        PlanNodeKind::Join(n)
        | PlanNodeKind::HashJoin(n)
        | PlanNodeKind::MergeJoin(n)
        | PlanNodeKind::NestedLoopJoin(n) => n.output_schema(input(0), input(1)),
        PlanNodeKind::Sort(n) | PlanNodeKind::ExternalSort(n) | PlanNodeKind::PresortedSort(n) => {
            n.resolved_collation(input(0))?;
            Ok(input(0).clone())
        }
        PlanNodeKind::Aggregate(n)
        | PlanNodeKind::HashAggregate(n)
        | PlanNodeKind::SortAggregate(n) => n.output_schema(input(0)),
        PlanNodeKind::Empty(n) | PlanNodeKind::EmptyValues(n) => Ok(n.schema().clone()),
        PlanNodeKind::Exchange(n) => n.output_schema(input(0)),
        PlanNodeKind::GroupRef(n) => Ok(n.schema().clone()),
    }
}

/// 物理节点交付的特征
fn derive_traits(
    kind: &PlanNodeKind,
    children: &[Arc<PlanNode>],
    schema: &Schema,
) -> PlanResult<TraitSet> {
    if !kind.is_physical() {
        return Ok(TraitSet::logical());
    }
    let child_traits = |i: usize| children[i].traits();
    let single = |collation: Collation| {
        TraitSet::physical()
            .with_collation(collation)
            .with_distribution(Distribution::Single)
    };
    let traits = match kind {
        PlanNodeKind::TableScan(n) => single(n.qualified_collation()),
        PlanNodeKind::FilterExec(_) => {
            let input = child_traits(0);
            TraitSet::physical()
                .with_collation(input.collation.clone())
                .with_distribution(input.distribution.clone())
        }
        PlanNodeKind::ProjectExec(n) => {
            let input = child_traits(0);
            let mapping = n.column_mapping(children[0].schema());
            let output_name = |column: &str| {
                let idx = children[0].schema().resolve(column)?;
                mapping
                    .iter()
                    .find(|(i, _)| *i == idx)
                    .map(|(_, alias)| alias.clone())
            };
            let collation = input
                .collation
                .fields()
                .iter()
                .map_while(|fc| {
                    output_name(&fc.column).map(|column| FieldCollation {
                        column,
                        direction: fc.direction,
                    })
                })
                .collect();
            let distribution = match &input.distribution {
                Distribution::Hash(keys) => keys
                    .iter()
                    .map(|k| output_name(k))
                    .collect::<Option<Vec<_>>>()
                    .map(Distribution::Hash)
                    .unwrap_or(Distribution::Any),
                other => other.clone(),
            };
            TraitSet::physical()
                .with_collation(Collation::new(collation))
                .with_distribution(distribution)
        }
        PlanNodeKind::HashJoin(_) => single(Collation::empty()),
        PlanNodeKind::MergeJoin(n) => {
            let info = n.analyze_condition(children[0].schema(), children[1].schema());
            let keys: Vec<String> = info
                .keys
                .iter()
                .filter_map(|k| children[0].schema().field(k.left).map(|f| f.name.clone()))
                .collect();
            single(Collation::ascending(&keys))
        }
        PlanNodeKind::NestedLoopJoin(n) => {
            if n.join_type().generates_nulls_on_left() {
                single(Collation::empty())
            } else {
                single(child_traits(0).collation.clone())
            }
        }
        PlanNodeKind::ExternalSort(n) | PlanNodeKind::PresortedSort(n) => TraitSet::physical()
            .with_collation(n.resolved_collation(schema)?)
            .with_distribution(child_traits(0).distribution.clone()),
        PlanNodeKind::HashAggregate(_) => single(Collation::empty()),
        PlanNodeKind::SortAggregate(n) => {
            let keys = resolve_collation(
                &Collation::ascending(n.group_keys()),
                children[0].schema(),
            )?;
            single(keys)
        }
        PlanNodeKind::Exchange(n) => TraitSet::physical().with_distribution(n.distribution().clone()),
        PlanNodeKind::EmptyValues(_) => single(Collation::empty()),
        _ => TraitSet::logical(),
    };
    Ok(traits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression, ProjectItem};
    use crate::query::planner::plan::core::nodes::filter_node::FilterNode;
    use crate::query::planner::plan::core::nodes::join_node::{JoinNode, JoinType};
    use crate::query::planner::plan::core::nodes::project_node::ProjectNode;
    use crate::query::planner::plan::core::nodes::scan_node::{ColumnDef, ScanNode};
    use crate::query::planner::plan::core::nodes::sort_node::SortNode;
    use crate::query::planner::plan::core::trait_set::Convention;

    fn scan(id: u64, table: &str, physical: bool) -> Arc<PlanNode> {
        let attrs = ScanNode::new(
            table,
            vec![
                ColumnDef::new("id", DataType::Int, false),
                ColumnDef::new("v", DataType::Int, true),
            ],
        )
        .with_collation(Collation::ascending(&["id"]));
        let kind = if physical {
            PlanNodeKind::TableScan(attrs)
        } else {
            PlanNodeKind::Scan(attrs)
        };
        Arc::new(PlanNode::new(NodeId(id), kind, vec![]).unwrap())
    }

    #[test]
    fn test_arity_checked() {
        let s = scan(1, "a", false);
        let bad = PlanNode::new(
            NodeId(2),
            PlanNodeKind::Filter(FilterNode::new(Expression::bool(true))),
            vec![s.clone(), s],
        );
        assert!(matches!(bad, Err(PlanError::SchemaMismatch(_))));
    }

    #[test]
    fn test_with_children_preserves_identity() {
        let a = scan(1, "a", false);
        let b = scan(2, "b", false);
        let filter = PlanNode::new(
            NodeId(3),
            PlanNodeKind::Filter(FilterNode::new(Expression::gt(
                Expression::column("v"),
                Expression::int(1),
            ))),
            vec![a],
        )
        .unwrap();
        let replaced = filter.with_children(vec![b]).unwrap();
        assert_eq!(replaced.id(), filter.id());
        assert_eq!(replaced.kind(), filter.kind());
        assert_eq!(replaced.schema().names(), vec!["b.id", "b.v"]);
        assert_eq!(filter.schema().names(), vec!["a.id", "a.v"]);
    }

    #[test]
    fn test_merge_join_delivers_key_order() {
        let join = PlanNode::new(
            NodeId(3),
            PlanNodeKind::MergeJoin(JoinNode::new(
                JoinType::Inner,
                Expression::eq(Expression::column("a.id"), Expression::column("b.id")),
            )),
            vec![scan(1, "a", true), scan(2, "b", true)],
        )
        .unwrap();
        assert_eq!(join.traits().convention, Convention::Physical);
        assert_eq!(join.traits().collation, Collation::ascending(&["a.id"]));
    }

    #[test]
    fn test_project_maps_collation() {
        let project = PlanNode::new(
            NodeId(2),
            PlanNodeKind::ProjectExec(ProjectNode::new(vec![
                ProjectItem::new(Expression::column("v"), "value"),
                ProjectItem::new(Expression::column("a.id"), "key"),
            ])),
            vec![scan(1, "a", true)],
        )
        .unwrap();
        assert_eq!(project.traits().collation, Collation::ascending(&["key"]));
    }

    #[test]
    fn test_sort_traits_and_digest() {
        let sort = PlanNode::new(
            NodeId(2),
            PlanNodeKind::ExternalSort(SortNode::new(Collation::ascending(&["v"]))),
            vec![scan(1, "a", true)],
        )
        .unwrap();
        assert_eq!(sort.traits().collation, Collation::ascending(&["a.v"]));
        assert_eq!(sort.traits().distribution, Distribution::Single);
        assert!(sort.digest().starts_with("ExternalSort(collation=[v ASC])[TableScan("));
        assert_eq!(sort.max_id(), NodeId(2));
        assert_eq!(sort.node_count(), 2);
    }
}
