//! 过滤节点
//!
//! 根据谓词过滤输入行，输出模式与输入相同

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::Schema;
use crate::core::types::{DataType, Expression};
use crate::query::planner::plan::core::explain::Pair;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    condition: Expression,
}

impl FilterNode {
    pub fn new(condition: Expression) -> Self {
        Self { condition }
    }

    /// 获取过滤条件
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn output_schema(&self, input: &Schema) -> PlanResult<Schema> {
        match self.condition.data_type(input)? {
            DataType::Boolean | DataType::Null => Ok(input.clone()),
            other => Err(PlanError::schema_mismatch(format!(
                "过滤条件 {} 的类型为 {}，需要布尔类型",
                self.condition, other
            ))),
        }
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![Pair::new("condition", self.condition.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Field;

    #[test]
    fn test_filter_requires_boolean() {
        let input = Schema::new(vec![Field::new("t.a", DataType::Int, false)]);
        let ok = FilterNode::new(Expression::gt(Expression::column("a"), Expression::int(1)));
        assert_eq!(ok.output_schema(&input).unwrap(), input);
        let bad = FilterNode::new(Expression::column("a"));
        assert!(bad.output_schema(&input).is_err());
    }
}
