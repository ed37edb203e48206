//! 谓词下推规则

pub mod push_filter_into_join;

pub use push_filter_into_join::FilterIntoJoinRule;
