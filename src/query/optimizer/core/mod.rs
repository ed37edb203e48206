//! 核心类型模块

pub mod cost;

pub use cost::Cost;
