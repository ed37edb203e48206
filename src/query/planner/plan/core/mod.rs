pub mod builder;
pub mod explain;
pub mod node_id_generator;
pub mod nodes;
pub mod trait_set;

pub use builder::PlanBuilder;
pub use explain::{Pair, PlanNodeDescription};
pub use node_id_generator::{NodeId, NodeIdGenerator};
pub use nodes::*;
pub use trait_set::{Collation, Convention, Distribution, FieldCollation, SortDirection, TraitSet};
