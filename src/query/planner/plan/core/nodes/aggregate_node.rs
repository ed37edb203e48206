//! 聚合节点

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::{Field, Schema};
use crate::core::types::{AggregateCall, AggregateFunction, DataType};
use crate::query::planner::plan::core::explain::Pair;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    group_keys: Vec<String>,
    calls: Vec<AggregateCall>,
}

impl AggregateNode {
    pub fn new(group_keys: Vec<String>, calls: Vec<AggregateCall>) -> Self {
        Self { group_keys, calls }
    }

    pub fn group_keys(&self) -> &[String] {
        &self.group_keys
    }

    pub fn calls(&self) -> &[AggregateCall] {
        &self.calls
    }

    /// 分组键字段在前，聚合结果在后
    pub fn output_schema(&self, input: &Schema) -> PlanResult<Schema> {
        let mut fields = Vec::with_capacity(self.group_keys.len() + self.calls.len());
        for key in &self.group_keys {
            fields.push(input.field_by_name(key)?.clone());
        }
        for call in &self.calls {
            let input_type = match &call.input {
                Some(column) => Some(input.field_by_name(column)?.data_type),
                None => None,
            };
            let data_type = match (call.func, input_type) {
                (AggregateFunction::Count, _) => DataType::BigInt,
                (_, None) => {
                    return Err(PlanError::schema_mismatch(format!(
                        "聚合 {} 缺少输入列",
                        call
                    )))
                }
                (func, Some(t)) if func.requires_numeric() && !t.is_numeric() => {
                    return Err(PlanError::schema_mismatch(format!(
                        "聚合 {} 需要数值输入，实际为 {}",
                        call, t
                    )))
                }
                (AggregateFunction::Avg, Some(_)) => DataType::Double,
                (AggregateFunction::Sum, Some(DataType::Double)) => DataType::Double,
                (AggregateFunction::Sum, Some(_)) => DataType::BigInt,
                (_, Some(t)) => t,
            };
            let nullable = call.func != AggregateFunction::Count;
            fields.push(Field::new(&call.alias, data_type, nullable));
        }
        let schema = Schema::new(fields);
        schema.check_unique_names()?;
        Ok(schema)
    }

    pub fn describe(&self) -> Vec<Pair> {
        let calls: Vec<String> = self.calls.iter().map(|c| c.to_string()).collect();
        vec![
            Pair::new("group", format!("[{}]", self.group_keys.join(", "))),
            Pair::new("calls", format!("[{}]", calls.join(", "))),
        ]
    }
}
