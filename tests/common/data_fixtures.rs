//! 测试数据构造模块
//!
//! 目录与各个场景使用的逻辑计划树

use std::sync::Arc;

use relopt::core::types::{DataType, Expression};
use relopt::query::optimizer::{InMemoryCatalog, TableStatistics};
use relopt::query::planner::plan::{Collation, JoinType, PlanBuilder, PlanNode};

/// users、jobs、orders 与 t 四张表
pub fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_table(
            TableStatistics::new("users", 100)
                .with_distinct("id", 100)
                .with_distinct("age", 60),
        )
        .with_table(TableStatistics::new("jobs", 100).with_distinct("id", 100))
        .with_table(TableStatistics::new("orders", 1000))
        .with_table(TableStatistics::new("t", 100))
}

/// Filter(price > 0 AND qty > 0) over Scan(orders)
pub fn orders_filter() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let orders = b
        .scan("orders", &[("price", DataType::Double), ("qty", DataType::Int)])
        .unwrap();
    b.filter(
        orders,
        Expression::and(
            Expression::gt(Expression::column("price"), Expression::int(0)),
            Expression::gt(Expression::column("qty"), Expression::int(0)),
        ),
    )
    .unwrap()
}

/// Filter(30 + 1 < u.age) over Join(users u, jobs j, u.id = j.id)
pub fn users_jobs_filter() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let users = b
        .scan_as("users", "u", &[("id", DataType::Int), ("age", DataType::Int)])
        .unwrap();
    let jobs = b
        .scan_as("jobs", "j", &[("id", DataType::Int), ("company", DataType::Varchar)])
        .unwrap();
    let join = b
        .join(
            users,
            jobs,
            JoinType::Inner,
            Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
        )
        .unwrap();
    b.filter(
        join,
        Expression::lt(
            Expression::add(Expression::int(30), Expression::int(1)),
            Expression::column("u.age"),
        ),
    )
    .unwrap()
}

/// 完整的 users/jobs 查询：投影、两侧过滤与按 user_id 排序
pub fn users_jobs_query() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let users = b
        .scan_as(
            "users",
            "u",
            &[("id", DataType::Int), ("name", DataType::Varchar), ("age", DataType::Int)],
        )
        .unwrap();
    let jobs = b
        .scan_as("jobs", "j", &[("id", DataType::Int), ("company", DataType::Varchar)])
        .unwrap();
    let join = b
        .join(
            users,
            jobs,
            JoinType::Inner,
            Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
        )
        .unwrap();
    let filter = b
        .filter(
            join,
            Expression::and(
                Expression::gt(
                    Expression::column("u.age"),
                    Expression::add(Expression::int(30), Expression::int(1)),
                ),
                Expression::gt(Expression::column("j.id"), Expression::int(10)),
            ),
        )
        .unwrap();
    let project = b
        .project(
            filter,
            vec![
                (Expression::add(Expression::int(10), Expression::int(20)), "EXPR$0"),
                (Expression::column("u.id"), "user_id"),
                (Expression::column("u.name"), "user_name"),
                (Expression::column("j.company"), "user_company"),
                (Expression::column("u.age"), "user_age"),
            ],
        )
        .unwrap();
    b.sort(project, Collation::ascending(&["user_id"])).unwrap()
}

/// Filter(FALSE) over Scan(t)
pub fn always_false_filter() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let t = b.scan("t", &[("a", DataType::Int)]).unwrap();
    b.filter(t, Expression::bool(false)).unwrap()
}

/// 两张按 k 有序存放的表 a、b，键在各自表内唯一
pub fn sorted_pair_catalog(a_rows: u64, b_rows: u64) -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_table(
            TableStatistics::new("a", a_rows)
                .with_distinct("k", a_rows)
                .with_collation(Collation::ascending(&["k"])),
        )
        .with_table(
            TableStatistics::new("b", b_rows)
                .with_distinct("k", b_rows)
                .with_collation(Collation::ascending(&["k"])),
        )
}

/// Join(a, b, a.k = b.k)
pub fn pair_join() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let left = b.scan("a", &[("k", DataType::Int), ("x", DataType::Int)]).unwrap();
    let right = b.scan("b", &[("k", DataType::Int), ("y", DataType::Int)]).unwrap();
    b.join(
        left,
        right,
        JoinType::Inner,
        Expression::eq(Expression::column("a.k"), Expression::column("b.k")),
    )
    .unwrap()
}

/// a、c、d 三张表，行数各不相同
pub fn three_table_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_table(TableStatistics::new("a", 60).with_distinct("k", 60))
        .with_table(TableStatistics::new("c", 20).with_distinct("k", 20))
        .with_table(TableStatistics::new("d", 40).with_distinct("k", 40))
}

/// Join(Join(a, c, a.k = c.k), d, c.k = d.k)
pub fn three_way_join() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let a = b.scan("a", &[("k", DataType::Int), ("x", DataType::Int)]).unwrap();
    let c = b.scan("c", &[("k", DataType::Int)]).unwrap();
    let d = b.scan("d", &[("k", DataType::Int), ("z", DataType::Int)]).unwrap();
    let inner = b
        .join(
            a,
            c,
            JoinType::Inner,
            Expression::eq(Expression::column("a.k"), Expression::column("c.k")),
        )
        .unwrap();
    b.join(
        inner,
        d,
        JoinType::Inner,
        Expression::eq(Expression::column("c.k"), Expression::column("d.k")),
    )
    .unwrap()
}

/// Sort(Project(Filter(FALSE) over Scan(t)))
pub fn sorted_false_projection() -> Arc<PlanNode> {
    let mut b = PlanBuilder::new();
    let t = b.scan("t", &[("a", DataType::Int)]).unwrap();
    let filter = b.filter(t, Expression::bool(false)).unwrap();
    let project = b
        .project(filter, vec![(Expression::column("t.a"), "a_out")])
        .unwrap();
    b.sort(project, Collation::ascending(&["a_out"])).unwrap()
}
