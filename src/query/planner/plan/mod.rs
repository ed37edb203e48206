//! 计划表示：表达式节点、特征与构造器

pub mod core;

pub use self::core::*;
