//! 目录能力
//!
//! 代价模型通过该接口读取表的行数、列基数以及数据的物理顺序

use std::fmt;

use crate::query::planner::plan::Collation;

/// 统计信息来源
pub trait Catalog: Send + Sync + fmt::Debug {
    /// 表的行数，未知返回 None
    fn row_count(&self, table: &str) -> Option<u64>;

    /// 列的不同值数量，未知返回 None
    fn distinct_values(&self, table: &str, column: &str) -> Option<u64>;

    /// 表数据的物理顺序，列名不带限定前缀
    fn collation(&self, _table: &str) -> Collation {
        Collation::empty()
    }
}
