//! 代价搜索使用的 memo 结构

pub mod group;
pub mod memo;

pub use group::{EquivalenceSet, GroupId, MemberId, MemoNode, OptimizationStatus, Winner};
pub use memo::Memo;
