use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use relopt::config::Config;
use relopt::core::types::{DataType, Expression};
use relopt::query::optimizer::{
    default_physical_rules, CostCalculator, InMemoryCatalog, OptimizerEngine, TableStatistics,
    VolcanoLimits, VolcanoPlanner,
};
use relopt::query::planner::plan::{
    Collation, ColumnDef, JoinType, PlanBuilder, PlanNode, PlanNodeDescription, ScanNode, TraitSet,
};
use relopt::utils::logging;

#[derive(Parser)]
#[clap(
    version = "0.1.0",
    author = "Relopt Contributors",
    about = "Optimize a demo query plan and print it before and after"
)]
struct Cli {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<String>,

    /// Which planner to run
    #[clap(short, long, value_enum, default_value = "full")]
    planner: PlannerKind,

    /// Output format
    #[clap(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Demo query to optimize
    #[clap(short, long, value_enum, default_value = "users-jobs")]
    query: DemoQuery,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlannerKind {
    Hep,
    Volcano,
    Full,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoQuery {
    UsersJobs,
    OrdersListing,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("failed to load config {}", path))?,
        None => Config::default(),
    };
    logging::init(&config.log).context("failed to start logging")?;

    let result = run(&cli, config);
    logging::shutdown();
    result
}

fn run(cli: &Cli, config: Config) -> Result<()> {
    let catalog = Arc::new(demo_catalog());
    let (tree, required) = match cli.query {
        DemoQuery::UsersJobs => users_jobs()?,
        DemoQuery::OrdersListing => orders_listing()?,
    };

    let (plan, cost, warnings) = match cli.planner {
        PlannerKind::Hep => {
            let engine = OptimizerEngine::new(catalog, config);
            let outcome = engine.rewrite_only(&tree)?;
            (outcome.plan, None, Vec::new())
        }
        PlannerKind::Volcano => {
            let calculator = CostCalculator::new(catalog, config.cost);
            let limits = VolcanoLimits {
                max_memo_nodes: config.optimizer.volcano_max_memo_nodes,
                timeout: config.optimizer.volcano_timeout(),
            };
            let mut planner =
                VolcanoPlanner::new(default_physical_rules(&config.optimizer), calculator, limits);
            let outcome = planner.optimize(&tree, &required)?;
            (outcome.plan, Some(outcome.cost), outcome.warnings)
        }
        PlannerKind::Full => {
            let engine = OptimizerEngine::new(catalog, config);
            let optimized = engine.optimize(&tree, &required)?;
            (optimized.plan, Some(optimized.cost), optimized.warnings)
        }
    };

    match cli.format {
        OutputFormat::Text => {
            println!("-- before --");
            print!("{}", tree.explain());
            println!("-- after --");
            print!("{}", plan.explain());
            if let Some(cost) = cost {
                println!("-- cost: {}", cost);
            }
            for warning in &warnings {
                println!("-- warning: {}", warning);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "before": PlanNodeDescription::from_node(&tree),
                "after": PlanNodeDescription::from_node(&plan),
                "cost": cost,
                "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn demo_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_table(
            TableStatistics::new("users", 100)
                .with_distinct("id", 100)
                .with_distinct("age", 60),
        )
        .with_table(TableStatistics::new("jobs", 100).with_distinct("id", 100))
        .with_table(
            TableStatistics::new("ORDER_DETAILS", 5)
                .with_distinct("CK_TIME", 5)
                .with_collation(Collation::ascending(&["CK_TIME"])),
        )
        .with_table(TableStatistics::new("LISTING_DETAILS", 100).with_distinct("LIST_ID", 100))
}

/// select 10+20, u.id as user_id, u.name as user_name, j.company as user_company,
/// u.age as user_age from users u join jobs j on u.id = j.id
/// where u.age > 30+1 and j.id > 10 order by user_id
fn users_jobs() -> Result<(Arc<PlanNode>, TraitSet)> {
    let mut b = PlanBuilder::new();
    let users = b.scan_as(
        "users",
        "u",
        &[("id", DataType::Int), ("name", DataType::Varchar), ("age", DataType::Int)],
    )?;
    let jobs = b.scan_as("jobs", "j", &[("id", DataType::Int), ("company", DataType::Varchar)])?;
    let join = b.join(
        users,
        jobs,
        JoinType::Inner,
        Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
    )?;
    let filter = b.filter(
        join,
        Expression::and(
            Expression::gt(
                Expression::column("u.age"),
                Expression::add(Expression::int(30), Expression::int(1)),
            ),
            Expression::gt(Expression::column("j.id"), Expression::int(10)),
        ),
    )?;
    let project = b.project(
        filter,
        vec![
            (Expression::add(Expression::int(10), Expression::int(20)), "EXPR$0"),
            (Expression::column("u.id"), "user_id"),
            (Expression::column("u.name"), "user_name"),
            (Expression::column("j.company"), "user_company"),
            (Expression::column("u.age"), "user_age"),
        ],
    )?;
    let sort = b.sort(project, Collation::ascending(&["user_id"]))?;
    let required = TraitSet::physical().with_collation(Collation::ascending(&["user_id"]));
    Ok((sort, required))
}

/// SELECT STREAM A.ITEM_ID, A.ITEM_PRICE, A.BUYER_NAME, B.SELLER_NAME
/// FROM ORDER_DETAILS AS A INNER JOIN LISTING_DETAILS AS B ON A.ITEM_ID = B.LIST_ID
/// WHERE A.ITEM_PRICE > 0 AND B.AVAIL_QUANTITY > 0
fn orders_listing() -> Result<(Arc<PlanNode>, TraitSet)> {
    let mut b = PlanBuilder::new();
    let orders = b.scan_with(
        ScanNode::new(
            "ORDER_DETAILS",
            vec![
                ColumnDef::new("CK_TIME", DataType::Date, false),
                ColumnDef::new("ITEM_ID", DataType::BigInt, true),
                ColumnDef::new("ITEM_PRICE", DataType::Double, true),
                ColumnDef::new("BUYER_NAME", DataType::Varchar, true),
                ColumnDef::new("QUANTITY", DataType::Int, true),
            ],
        )
        .with_alias("A"),
    )?;
    let listing = b.scan_with(
        ScanNode::new(
            "LISTING_DETAILS",
            vec![
                ColumnDef::new("LIST_ID", DataType::BigInt, true),
                ColumnDef::new("ITEM_PRICE", DataType::Double, true),
                ColumnDef::new("SELLER_NAME", DataType::Varchar, true),
                ColumnDef::new("AVAIL_QUANTITY", DataType::Int, true),
            ],
        )
        .with_alias("B"),
    )?;
    let join = b.join(
        orders,
        listing,
        JoinType::Inner,
        Expression::eq(Expression::column("A.ITEM_ID"), Expression::column("B.LIST_ID")),
    )?;
    let filter = b.filter(
        join,
        Expression::and(
            Expression::gt(Expression::column("A.ITEM_PRICE"), Expression::int(0)),
            Expression::gt(Expression::column("B.AVAIL_QUANTITY"), Expression::int(0)),
        ),
    )?;
    let project = b.project(
        filter,
        vec![
            (Expression::column("A.ITEM_ID"), "ITEM_ID"),
            (Expression::column("A.ITEM_PRICE"), "ITEM_PRICE"),
            (Expression::column("A.BUYER_NAME"), "BUYER_NAME"),
            (Expression::column("B.SELLER_NAME"), "SELLER_NAME"),
        ],
    )?;
    Ok((project, TraitSet::physical()))
}
