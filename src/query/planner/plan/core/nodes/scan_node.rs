//! 表扫描节点
//!
//! 逻辑 `Scan` 与物理 `TableScan` 共用同一组属性

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::{Field, Schema};
use crate::core::types::DataType;
use crate::query::planner::plan::core::explain::Pair;
use crate::query::planner::plan::core::trait_set::{Collation, FieldCollation};

/// 表的列定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// 扫描属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanNode {
    table: String,
    alias: Option<String>,
    columns: Vec<ColumnDef>,
    /// 表数据的物理顺序，列名不带限定前缀
    collation: Collation,
}

impl ScanNode {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            columns,
            collation: Collation::empty(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// 字段名的限定前缀：别名优先，其次表名
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn collation(&self) -> &Collation {
        &self.collation
    }

    pub fn output_schema(&self) -> PlanResult<Schema> {
        if self.columns.is_empty() {
            return Err(PlanError::schema_mismatch(format!(
                "表 {} 没有任何列",
                self.table
            )));
        }
        let qualifier = self.qualifier();
        let schema = Schema::new(
            self.columns
                .iter()
                .map(|c| {
                    Field::new(format!("{}.{}", qualifier, c.name), c.data_type, c.nullable)
                        .with_origin(&self.table, &c.name)
                })
                .collect(),
        );
        schema.check_unique_names()?;
        Ok(schema)
    }

    /// 带限定前缀的物理顺序；遇到不存在的列就截断
    pub fn qualified_collation(&self) -> Collation {
        let qualifier = self.qualifier();
        let fields = self
            .collation
            .fields()
            .iter()
            .take_while(|fc| self.columns.iter().any(|c| c.name == fc.column))
            .map(|fc| FieldCollation {
                column: format!("{}.{}", qualifier, fc.column),
                direction: fc.direction,
            })
            .collect();
        Collation::new(fields)
    }

    pub fn describe(&self) -> Vec<Pair> {
        let mut pairs = vec![Pair::new("table", &self.table)];
        if let Some(alias) = &self.alias {
            pairs.push(Pair::new("alias", alias));
        }
        if !self.collation.is_empty() {
            pairs.push(Pair::new("order", self.collation.to_string()));
        }
        pairs
    }
}
