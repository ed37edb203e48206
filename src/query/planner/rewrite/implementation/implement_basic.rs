//! 扫描、过滤、投影与空结果的物理实现

use crate::query::planner::plan::{Collation, ScanNode};
use crate::query::planner::rewrite::context::RewriteContext;
use crate::query::planner::rewrite::macros::define_implementation_rule;

define_implementation_rule! {
    /// Scan -> TableScan
    ///
    /// 扫描节点没有声明顺序时采用目录中登记的表顺序
    name: ImplementScanRule,
    logical: "Scan",
    implement: |ctx, node| match node.kind() {
        PlanNodeKind::Scan(scan) => vec![PlanNodeKind::TableScan(with_catalog_order(ctx, scan))],
        _ => vec![],
    }
}

define_implementation_rule! {
    /// Filter -> FilterExec
    name: ImplementFilterRule,
    logical: "Filter",
    implement: |_ctx, node| match node.kind() {
        PlanNodeKind::Filter(filter) => vec![PlanNodeKind::FilterExec(filter.clone())],
        _ => vec![],
    }
}

define_implementation_rule! {
    /// Project -> ProjectExec
    name: ImplementProjectRule,
    logical: "Project",
    implement: |_ctx, node| match node.kind() {
        PlanNodeKind::Project(project) => vec![PlanNodeKind::ProjectExec(project.clone())],
        _ => vec![],
    }
}

define_implementation_rule! {
    /// Empty -> EmptyValues
    name: ImplementEmptyRule,
    logical: "Empty",
    implement: |_ctx, node| match node.kind() {
        PlanNodeKind::Empty(empty) => vec![PlanNodeKind::EmptyValues(empty.clone())],
        _ => vec![],
    }
}

/// 目录顺序中只保留扫描列里存在的前缀
fn with_catalog_order(ctx: &RewriteContext, scan: &ScanNode) -> ScanNode {
    if !scan.collation().is_empty() {
        return scan.clone();
    }
    let declared = match ctx.catalog() {
        Some(catalog) => catalog.collation(scan.table()),
        None => return scan.clone(),
    };
    let fields: Vec<_> = declared
        .fields()
        .iter()
        .take_while(|fc| scan.columns().iter().any(|c| c.name == fc.column))
        .cloned()
        .collect();
    if fields.is_empty() {
        return scan.clone();
    }
    scan.clone().with_collation(Collation::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::types::{DataType, Expression};
    use crate::query::optimizer::stats::{InMemoryCatalog, TableStatistics};
    use crate::query::planner::plan::{Convention, PlanBuilder};
    use crate::query::planner::rewrite::rule::{RewriteRule, RuleKind};

    #[test]
    fn test_scan_takes_catalog_order() {
        let catalog = InMemoryCatalog::new().with_table(
            TableStatistics::new("orders", 5).with_collation(Collation::ascending(&["id"])),
        );
        let mut ctx = RewriteContext::new().with_catalog(Arc::new(catalog));
        let mut b = PlanBuilder::new();
        let scan = b
            .scan("orders", &[("id", DataType::Int), ("units", DataType::Int)])
            .unwrap();
        ctx.seed_after(scan.max_id());

        let rule = ImplementScanRule::new();
        assert_eq!(rule.kind(), RuleKind::Implementation);
        let matched = rule.matches(&scan, &ctx).remove(0);
        let result = rule.apply(&mut ctx, &matched).unwrap().unwrap();
        let physical = result.first_new_node().unwrap();
        assert_eq!(physical.name(), "TableScan");
        assert_eq!(physical.traits().convention, Convention::Physical);
        assert_eq!(physical.traits().collation, Collation::ascending(&["orders.id"]));
        assert!(physical.schema().same_row_type(scan.schema()));
    }

    #[test]
    fn test_filter_keeps_children() {
        let mut b = PlanBuilder::new();
        let scan = b.scan("t", &[("a", DataType::Int)]).unwrap();
        let filter = b
            .filter(
                scan.clone(),
                Expression::gt(Expression::column("a"), Expression::int(0)),
            )
            .unwrap();
        let mut ctx = RewriteContext::new();
        ctx.seed_after(filter.max_id());
        let rule = ImplementFilterRule::new();
        let matched = rule.matches(&filter, &ctx).remove(0);
        let result = rule.apply(&mut ctx, &matched).unwrap().unwrap();
        let exec = result.first_new_node().unwrap();
        assert_eq!(exec.name(), "FilterExec");
        assert!(Arc::ptr_eq(exec.child(0).unwrap(), &scan));
        assert_eq!(exec.id().0, 3);
    }
}
