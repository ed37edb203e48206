//! 内存目录
//!
//! 线程安全的统计信息表，测试与命令行示例都用它充当目录

use parking_lot::RwLock;
use std::collections::HashMap;

use super::catalog::Catalog;
use super::table::TableStatistics;
use crate::query::planner::plan::Collation;

/// 内存目录
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    tables: RwLock<HashMap<String, TableStatistics>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一张表，构造器风格
    pub fn with_table(self, stats: TableStatistics) -> Self {
        self.update_table_stats(stats);
        self
    }

    /// 更新表统计信息
    pub fn update_table_stats(&self, stats: TableStatistics) {
        self.tables.write().insert(stats.table_name.clone(), stats);
    }

    /// 获取表统计信息
    pub fn get_table_stats(&self, table: &str) -> Option<TableStatistics> {
        self.tables.read().get(table).cloned()
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }
}

impl Catalog for InMemoryCatalog {
    fn row_count(&self, table: &str) -> Option<u64> {
        self.tables.read().get(table).map(|s| s.row_count)
    }

    fn distinct_values(&self, table: &str, column: &str) -> Option<u64> {
        self.tables
            .read()
            .get(table)
            .and_then(|s| s.distinct_values.get(column).copied())
    }

    fn collation(&self, table: &str) -> Collation {
        self.tables
            .read()
            .get(table)
            .map(|s| s.collation.clone())
            .unwrap_or_default()
    }
}
