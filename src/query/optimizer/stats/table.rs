//! 表统计信息

use std::collections::BTreeMap;

use crate::query::planner::plan::Collation;

/// 单表统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct TableStatistics {
    pub table_name: String,
    pub row_count: u64,
    /// 列名到不同值数量
    pub distinct_values: BTreeMap<String, u64>,
    pub collation: Collation,
}

impl TableStatistics {
    pub fn new(table_name: impl Into<String>, row_count: u64) -> Self {
        Self {
            table_name: table_name.into(),
            row_count,
            distinct_values: BTreeMap::new(),
            collation: Collation::empty(),
        }
    }

    pub fn with_distinct(mut self, column: impl Into<String>, count: u64) -> Self {
        self.distinct_values.insert(column.into(), count);
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }
}
