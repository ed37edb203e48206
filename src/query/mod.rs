// Query module for the relational optimizer
//
// This module provides the planning pipeline:
// - Building logical plans and rewriting them with ordered rules
// - Searching the physical plan space with a cost model

pub mod optimizer;
pub mod planner;

pub use optimizer::{OptimizedPlan, OptimizerEngine};
pub use planner::{PlanBuilder, PlanNode};
