//! 排序节点
//!
//! 逻辑 `Sort` 与物理 `ExternalSort`、`PresortedSort` 共用

use serde::{Deserialize, Serialize};

use crate::core::error::PlanResult;
use crate::core::schema::Schema;
use crate::query::planner::plan::core::explain::Pair;
use crate::query::planner::plan::core::trait_set::{Collation, FieldCollation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortNode {
    collation: Collation,
}

impl SortNode {
    pub fn new(collation: Collation) -> Self {
        Self { collation }
    }

    pub fn collation(&self) -> &Collation {
        &self.collation
    }

    /// 把排序列解析为输入模式中的字段名
    pub fn resolved_collation(&self, input: &Schema) -> PlanResult<Collation> {
        resolve_collation(&self.collation, input)
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![Pair::new("collation", self.collation.to_string())]
    }
}

/// 把排序列名规范化为模式中的完整字段名
pub fn resolve_collation(collation: &Collation, schema: &Schema) -> PlanResult<Collation> {
    let mut fields = Vec::with_capacity(collation.fields().len());
    for fc in collation.fields() {
        let field = schema.field_by_name(&fc.column)?;
        fields.push(FieldCollation {
            column: field.name.clone(),
            direction: fc.direction,
        });
    }
    Ok(Collation::new(fields))
}
