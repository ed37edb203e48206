//! 计划构造器
//!
//! 面向上游转换器的构造接口，按构造顺序分配节点ID

use std::sync::Arc;

use super::node_id_generator::NodeIdGenerator;
use super::nodes::{
    AggregateNode, ColumnDef, EmptyNode, FilterNode, JoinNode, JoinType, PlanNode, PlanNodeKind,
    ProjectNode, ScanNode, SortNode,
};
use super::trait_set::Collation;
use crate::core::error::PlanResult;
use crate::core::schema::Schema;
use crate::core::types::{AggregateCall, DataType, Expression, ProjectItem};

/// 逻辑计划构造器
///
/// ```rust
/// use relopt::core::types::{DataType, Expression};
/// use relopt::query::planner::plan::{JoinType, PlanBuilder};
///
/// let mut builder = PlanBuilder::new();
/// let users = builder.scan("users", &[("id", DataType::Int), ("age", DataType::Int)]).unwrap();
/// let adults = builder
///     .filter(users, Expression::gt(Expression::column("age"), Expression::int(18)))
///     .unwrap();
/// assert_eq!(adults.explain().lines().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct PlanBuilder {
    ids: NodeIdGenerator,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            ids: NodeIdGenerator::new(),
        }
    }

    /// 按种类与子节点创建节点
    pub fn node(
        &mut self,
        kind: PlanNodeKind,
        children: Vec<Arc<PlanNode>>,
    ) -> PlanResult<Arc<PlanNode>> {
        let id = self.ids.next_id();
        Ok(Arc::new(PlanNode::new(id, kind, children)?))
    }

    /// 扫描表，列都视为可空
    pub fn scan(&mut self, table: &str, columns: &[(&str, DataType)]) -> PlanResult<Arc<PlanNode>> {
        let defs = columns
            .iter()
            .map(|(name, data_type)| ColumnDef::new(*name, *data_type, true))
            .collect();
        self.scan_with(ScanNode::new(table, defs))
    }

    /// 带别名的表扫描
    pub fn scan_as(
        &mut self,
        table: &str,
        alias: &str,
        columns: &[(&str, DataType)],
    ) -> PlanResult<Arc<PlanNode>> {
        let defs = columns
            .iter()
            .map(|(name, data_type)| ColumnDef::new(*name, *data_type, true))
            .collect();
        self.scan_with(ScanNode::new(table, defs).with_alias(alias))
    }

    pub fn scan_with(&mut self, scan: ScanNode) -> PlanResult<Arc<PlanNode>> {
        self.node(PlanNodeKind::Scan(scan), vec![])
    }

    pub fn filter(&mut self, input: Arc<PlanNode>, condition: Expression) -> PlanResult<Arc<PlanNode>> {
        self.node(PlanNodeKind::Filter(FilterNode::new(condition)), vec![input])
    }

    pub fn project(
        &mut self,
        input: Arc<PlanNode>,
        items: Vec<(Expression, &str)>,
    ) -> PlanResult<Arc<PlanNode>> {
        let items = items
            .into_iter()
            .map(|(expr, alias)| ProjectItem::new(expr, alias))
            .collect();
        self.node(PlanNodeKind::Project(ProjectNode::new(items)), vec![input])
    }

    pub fn join(
        &mut self,
        left: Arc<PlanNode>,
        right: Arc<PlanNode>,
        join_type: JoinType,
        condition: Expression,
    ) -> PlanResult<Arc<PlanNode>> {
        self.node(
            PlanNodeKind::Join(JoinNode::new(join_type, condition)),
            vec![left, right],
        )
    }

    pub fn sort(&mut self, input: Arc<PlanNode>, collation: Collation) -> PlanResult<Arc<PlanNode>> {
        self.node(PlanNodeKind::Sort(SortNode::new(collation)), vec![input])
    }

    pub fn aggregate(
        &mut self,
        input: Arc<PlanNode>,
        group_keys: &[&str],
        calls: Vec<AggregateCall>,
    ) -> PlanResult<Arc<PlanNode>> {
        let keys = group_keys.iter().map(|k| k.to_string()).collect();
        self.node(
            PlanNodeKind::Aggregate(AggregateNode::new(keys, calls)),
            vec![input],
        )
    }

    pub fn empty(&mut self, schema: Schema) -> PlanResult<Arc<PlanNode>> {
        self.node(PlanNodeKind::Empty(EmptyNode::new(schema)), vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PlanError;
    use crate::query::planner::plan::core::node_id_generator::NodeId;

    #[test]
    fn test_builder_assigns_sequential_ids() {
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int), ("age", DataType::Int)]).unwrap();
        let jobs = b.scan("jobs", &[("id", DataType::Int)]).unwrap();
        let join = b
            .join(
                users,
                jobs,
                JoinType::Inner,
                Expression::eq(Expression::column("users.id"), Expression::column("jobs.id")),
            )
            .unwrap();
        assert_eq!(join.id(), NodeId(3));
        assert_eq!(join.max_id(), NodeId(3));
        assert_eq!(join.schema().names(), vec!["users.id", "users.age", "jobs.id"]);
    }

    #[test]
    fn test_builder_rejects_unknown_column() {
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int)]).unwrap();
        let err = b
            .filter(users, Expression::gt(Expression::column("salary"), Expression::int(1)))
            .unwrap_err();
        assert!(matches!(err, PlanError::SchemaMismatch(_)));
    }

    #[test]
    fn test_explain_text_and_json() {
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int)]).unwrap();
        let sorted = b.sort(users, Collation::ascending(&["id"])).unwrap();
        assert_eq!(
            sorted.explain(),
            "Sort(collation=[id ASC])\n  Scan(table=users)\n"
        );
        let json = sorted.explain_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Sort");
        assert_eq!(value["children"][0]["output"][0], "users.id");
    }
}
