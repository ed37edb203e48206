//! 连接节点
//!
//! 逻辑 `Join` 以及三种物理连接共用的属性。输出模式为左侧字段在前、右侧字段在后。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::Schema;
use crate::core::types::expression::split_conjunction;
use crate::core::types::{BinaryOperator, DataType, Expression};
use crate::query::planner::plan::core::explain::Pair;

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    /// 交换左右输入后的连接类型
    pub fn swap(&self) -> JoinType {
        match self {
            JoinType::Left => JoinType::Right,
            JoinType::Right => JoinType::Left,
            other => *other,
        }
    }

    /// 左侧行是否可能被补空
    pub fn generates_nulls_on_left(&self) -> bool {
        matches!(self, JoinType::Right | JoinType::Full)
    }

    /// 右侧行是否可能被补空
    pub fn generates_nulls_on_right(&self) -> bool {
        matches!(self, JoinType::Left | JoinType::Full)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Full => write!(f, "FULL"),
        }
    }
}

/// 等值连接键：左右两侧各自模式中的字段下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquiKey {
    pub left: usize,
    pub right: usize,
}

/// 连接条件分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinConditionInfo {
    pub keys: Vec<EquiKey>,
    pub residual: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    join_type: JoinType,
    condition: Expression,
}

impl JoinNode {
    pub fn new(join_type: JoinType, condition: Expression) -> Self {
        Self {
            join_type,
            condition,
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn output_schema(&self, left: &Schema, right: &Schema) -> PlanResult<Schema> {
        let left = if self.join_type.generates_nulls_on_left() {
            left.clone().into_nullable()
        } else {
            left.clone()
        };
        let right = if self.join_type.generates_nulls_on_right() {
            right.clone().into_nullable()
        } else {
            right.clone()
        };
        let joined = left.join(&right)?;
        match self.condition.data_type(&joined)? {
            DataType::Boolean | DataType::Null => Ok(joined),
            other => Err(PlanError::schema_mismatch(format!(
                "连接条件 {} 的类型为 {}，需要布尔类型",
                self.condition, other
            ))),
        }
    }

    /// 拆出 `左列 = 右列` 形式的等值键，其余合取项作为残余条件
    pub fn analyze_condition(&self, left: &Schema, right: &Schema) -> JoinConditionInfo {
        let mut keys = Vec::new();
        let mut residual = Vec::new();
        for conjunct in split_conjunction(&self.condition) {
            match equi_key(&conjunct, left, right) {
                Some(key) => keys.push(key),
                None if conjunct.is_true() => {}
                None => residual.push(conjunct),
            }
        }
        JoinConditionInfo { keys, residual }
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![
            Pair::new("type", self.join_type.to_string()),
            Pair::new("condition", self.condition.to_string()),
        ]
    }
}

fn equi_key(conjunct: &Expression, left: &Schema, right: &Schema) -> Option<EquiKey> {
    if let Expression::Binary {
        left: a,
        op: BinaryOperator::Equal,
        right: b,
    } = conjunct
    {
        let (a, b) = (a.as_column()?, b.as_column()?);
        if let (Some(l), Some(r)) = (left.resolve(a), right.resolve(b)) {
            return Some(EquiKey { left: l, right: r });
        }
        if let (Some(l), Some(r)) = (left.resolve(b), right.resolve(a)) {
            return Some(EquiKey { left: l, right: r });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Field;

    fn sides() -> (Schema, Schema) {
        (
            Schema::new(vec![
                Field::new("u.id", DataType::Int, false),
                Field::new("u.age", DataType::Int, true),
            ]),
            Schema::new(vec![
                Field::new("j.id", DataType::Int, false),
                Field::new("j.company", DataType::Varchar, true),
            ]),
        )
    }

    #[test]
    fn test_join_schema_and_nullability() {
        let (left, right) = sides();
        let join = JoinNode::new(
            JoinType::Left,
            Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
        );
        let schema = join.output_schema(&left, &right).unwrap();
        assert_eq!(schema.names(), vec!["u.id", "u.age", "j.id", "j.company"]);
        assert!(!schema.fields()[0].nullable);
        assert!(schema.fields()[2].nullable);
    }

    #[test]
    fn test_analyze_condition() {
        let (left, right) = sides();
        let join = JoinNode::new(
            JoinType::Inner,
            Expression::and(
                Expression::eq(Expression::column("j.id"), Expression::column("u.id")),
                Expression::gt(Expression::column("u.age"), Expression::int(3)),
            ),
        );
        let info = join.analyze_condition(&left, &right);
        assert_eq!(info.keys, vec![EquiKey { left: 0, right: 0 }]);
        assert_eq!(info.residual.len(), 1);
    }

    #[test]
    fn test_swap() {
        assert_eq!(JoinType::Left.swap(), JoinType::Right);
        assert_eq!(JoinType::Inner.swap(), JoinType::Inner);
    }
}
