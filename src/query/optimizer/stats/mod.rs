//! 统计信息模块
//!
//! - `catalog` - 目录接口
//! - `table` - 单表统计信息
//! - `manager` - 内存目录实现

pub mod catalog;
pub mod manager;
pub mod table;

pub use catalog::Catalog;
pub use manager::InMemoryCatalog;
pub use table::TableStatistics;
