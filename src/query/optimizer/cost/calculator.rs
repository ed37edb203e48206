//! 代价计算器
//!
//! 行数估计与算子代价。两者都只依赖节点种类、自身属性和输入的估计值，
//! 因此既可以在完整计划树上递归使用，也可以在 memo 中按等价集逐个使用。

use std::sync::Arc;

use super::config::CostModelConfig;
use super::selectivity::SelectivityEstimator;
use crate::core::schema::Schema;
use crate::query::optimizer::core::Cost;
use crate::query::optimizer::stats::Catalog;
use crate::query::planner::plan::{JoinType, PlanNode, PlanNodeKind};

/// 输入的估计信息
#[derive(Debug, Clone, Copy)]
pub struct InputEstimate<'a> {
    pub rows: f64,
    pub schema: &'a Schema,
}

/// 代价计算器
#[derive(Debug, Clone)]
pub struct CostCalculator {
    catalog: Arc<dyn Catalog>,
    config: CostModelConfig,
    selectivity: SelectivityEstimator,
}

impl CostCalculator {
    pub fn new(catalog: Arc<dyn Catalog>, config: CostModelConfig) -> Self {
        Self {
            catalog,
            config,
            selectivity: SelectivityEstimator::new(config),
        }
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// 计划树的输出行数估计
    pub fn estimate_row_count(&self, node: &PlanNode) -> f64 {
        let rows: Vec<f64> = node
            .children()
            .iter()
            .map(|c| self.estimate_row_count(c))
            .collect();
        let inputs: Vec<InputEstimate> = node
            .children()
            .iter()
            .zip(rows.iter())
            .map(|(c, r)| InputEstimate {
                rows: *r,
                schema: c.schema(),
            })
            .collect();
        self.estimate_rows(node.kind(), &inputs)
    }

    /// 计划树的累计代价：自身代价加上所有子树代价
    ///
    /// 逻辑节点按默认实现计价：Join 为嵌套循环，Sort 为外部排序，Aggregate 为哈希聚合
    pub fn estimate_cost(&self, node: &PlanNode) -> Cost {
        let mut total = Cost::zero();
        let mut inputs = Vec::with_capacity(node.children().len());
        for child in node.children() {
            total += self.estimate_cost(child);
            inputs.push(InputEstimate {
                rows: self.estimate_row_count(child),
                schema: child.schema(),
            });
        }
        let rows = self.estimate_rows(node.kind(), &inputs);
        total + self.operator_cost(node.kind(), rows, &inputs)
    }

    /// 单个算子的输出行数估计
    pub fn estimate_rows(&self, kind: &PlanNodeKind, inputs: &[InputEstimate]) -> f64 {
        let input_rows = |i: usize| inputs.get(i).map(|e| e.rows).unwrap_or(0.0);
        let rows = match kind {
            PlanNodeKind::Scan(n) | PlanNodeKind::TableScan(n) => self.table_rows(n.table()),
            PlanNodeKind::Filter(n) | PlanNodeKind::FilterExec(n) => {
                input_rows(0) * self.selectivity.estimate(n.condition())
            }
            PlanNodeKind::Project(_)
            | PlanNodeKind::ProjectExec(_)
            | PlanNodeKind::Sort(_)
            | PlanNodeKind::ExternalSort(_)
            | PlanNodeKind::PresortedSort(_)
            | PlanNodeKind::Exchange(_) => input_rows(0),
            PlanNodeKind::Join(n)
            | PlanNodeKind::HashJoin(n)
            | PlanNodeKind::MergeJoin(n)
            | PlanNodeKind::NestedLoopJoin(n) => {
                let (left, right) = (inputs[0], inputs[1]);
                let info = n.analyze_condition(left.schema, right.schema);
                let mut selectivity = 1.0;
                for key in &info.keys {
                    let ndv_left = self.distinct_values(left.schema, key.left, left.rows);
                    let ndv_right = self.distinct_values(right.schema, key.right, right.rows);
                    selectivity *= 1.0 / ndv_left.max(ndv_right).max(1.0);
                }
                for residual in &info.residual {
                    selectivity *= self.selectivity.estimate(residual);
                }
                let inner = left.rows * right.rows * selectivity;
                match n.join_type() {
                    JoinType::Inner => inner,
                    JoinType::Left => inner.max(left.rows),
                    JoinType::Right => inner.max(right.rows),
                    JoinType::Full => inner.max(left.rows).max(right.rows),
                }
            }
            PlanNodeKind::Aggregate(n)
            | PlanNodeKind::HashAggregate(n)
            | PlanNodeKind::SortAggregate(n) => {
                let input = inputs[0];
                if n.group_keys().is_empty() {
                    1.0
                } else {
                    let groups: f64 = n
                        .group_keys()
                        .iter()
                        .filter_map(|k| input.schema.resolve(k))
                        .map(|idx| self.distinct_values(input.schema, idx, input.rows))
                        .product();
                    groups.min(input.rows)
                }
            }
            PlanNodeKind::Empty(_) | PlanNodeKind::EmptyValues(_) => 0.0,
            PlanNodeKind::GroupRef(n) => n.row_count(),
        };
        sanitize(rows)
    }

    /// 单个算子自身的代价，不含子节点
    pub fn operator_cost(&self, kind: &PlanNodeKind, output_rows: f64, inputs: &[InputEstimate]) -> Cost {
        let c = &self.config;
        let input_rows = |i: usize| inputs.get(i).map(|e| e.rows).unwrap_or(0.0);
        let cpu = match kind {
            PlanNodeKind::Scan(_) | PlanNodeKind::TableScan(_) => output_rows * c.scan_row_cost,
            PlanNodeKind::Filter(_) | PlanNodeKind::FilterExec(_) => input_rows(0) * c.filter_row_cost,
            PlanNodeKind::Project(_) | PlanNodeKind::ProjectExec(_) => {
                input_rows(0) * c.project_row_cost
            }
            PlanNodeKind::HashJoin(_) => {
                input_rows(1) * c.hash_build_row_cost
                    + input_rows(0) * c.hash_probe_row_cost
                    + output_rows * c.output_row_cost
            }
            PlanNodeKind::MergeJoin(_) => {
                (input_rows(0) + input_rows(1)) * c.merge_row_cost + output_rows * c.output_row_cost
            }
            PlanNodeKind::Join(_) | PlanNodeKind::NestedLoopJoin(_) => {
                input_rows(0) * input_rows(1) * c.nested_loop_row_cost
                    + output_rows * c.output_row_cost
            }
            PlanNodeKind::Sort(_) | PlanNodeKind::ExternalSort(_) => {
                let n = input_rows(0);
                n * n.log2().max(1.0) * c.sort_comparison_cost
            }
            PlanNodeKind::PresortedSort(_) => input_rows(0) * c.presorted_row_cost,
            PlanNodeKind::Aggregate(_) | PlanNodeKind::HashAggregate(_) => {
                input_rows(0) * c.hash_build_row_cost + output_rows * c.output_row_cost
            }
            PlanNodeKind::SortAggregate(_) => {
                input_rows(0) * c.aggregate_row_cost + output_rows * c.output_row_cost
            }
            PlanNodeKind::Exchange(_) => input_rows(0) * c.exchange_row_cost,
            PlanNodeKind::Empty(_) | PlanNodeKind::EmptyValues(_) => c.empty_values_cost,
            PlanNodeKind::GroupRef(_) => 0.0,
        };
        Cost::new(sanitize(output_rows), sanitize(cpu))
    }

    fn table_rows(&self, table: &str) -> f64 {
        self.catalog
            .row_count(table)
            .map(|r| r as f64)
            .unwrap_or(self.config.default_row_count)
    }

    /// 字段的不同值数量；目录中没有记录时退化为输入行数
    pub fn distinct_values(&self, schema: &Schema, index: usize, rows: f64) -> f64 {
        let upper = rows.max(1.0);
        schema
            .field(index)
            .and_then(|f| f.origin.as_ref())
            .and_then(|o| self.catalog.distinct_values(&o.table, &o.column))
            .map(|n| (n as f64).min(upper))
            .unwrap_or(upper)
    }
}

/// 估计值必须有限且非负
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else if value.is_infinite() && value > 0.0 {
        f64::MAX
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AggregateCall, DataType, Expression};
    use crate::query::optimizer::stats::{InMemoryCatalog, TableStatistics};
    use crate::query::planner::plan::PlanBuilder;

    fn calculator() -> CostCalculator {
        let catalog = InMemoryCatalog::new()
            .with_table(TableStatistics::new("users", 1000).with_distinct("id", 1000).with_distinct("age", 50))
            .with_table(TableStatistics::new("jobs", 200).with_distinct("id", 200));
        CostCalculator::new(Arc::new(catalog), CostModelConfig::default())
    }

    #[test]
    fn test_scan_and_filter_rows() {
        let calc = calculator();
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int), ("age", DataType::Int)]).unwrap();
        assert_eq!(calc.estimate_row_count(&users), 1000.0);
        let filter = b
            .filter(users, Expression::eq(Expression::column("age"), Expression::int(3)))
            .unwrap();
        assert!((calc.estimate_row_count(&filter) - 150.0).abs() < 1e-9);

        let unknown = b.scan("nowhere", &[("x", DataType::Int)]).unwrap();
        assert_eq!(calc.estimate_row_count(&unknown), 100.0);
    }

    #[test]
    fn test_join_rows_use_distinct_values() {
        let calc = calculator();
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int)]).unwrap();
        let jobs = b.scan("jobs", &[("id", DataType::Int)]).unwrap();
        let join = b
            .join(
                users,
                jobs,
                JoinType::Inner,
                Expression::eq(Expression::column("users.id"), Expression::column("jobs.id")),
            )
            .unwrap();
        // 1000 * 200 / max(1000, 200)
        assert!((calc.estimate_row_count(&join) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_rows_capped() {
        let calc = calculator();
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int), ("age", DataType::Int)]).unwrap();
        let by_age = b
            .aggregate(users.clone(), &["age"], vec![AggregateCall::count_star("cnt")])
            .unwrap();
        assert_eq!(calc.estimate_row_count(&by_age), 50.0);
        let total = b.aggregate(users, &[], vec![AggregateCall::count_star("cnt")]).unwrap();
        assert_eq!(calc.estimate_row_count(&total), 1.0);
    }

    #[test]
    fn test_cost_monotonic() {
        let calc = calculator();
        let mut b = PlanBuilder::new();
        let users = b.scan("users", &[("id", DataType::Int), ("age", DataType::Int)]).unwrap();
        let filter = b
            .filter(users.clone(), Expression::gt(Expression::column("age"), Expression::int(30)))
            .unwrap();
        let sorted = b
            .sort(filter.clone(), crate::query::planner::plan::Collation::ascending(&["age"]))
            .unwrap();
        let scan_cost = calc.estimate_cost(&users);
        let filter_cost = calc.estimate_cost(&filter);
        let sort_cost = calc.estimate_cost(&sorted);
        assert!(scan_cost.cpu > 0.0);
        assert!(filter_cost >= scan_cost);
        assert!(sort_cost >= filter_cost);
    }
}
