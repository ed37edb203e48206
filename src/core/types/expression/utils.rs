//! 表达式工具函数
//!
//! 提供表达式分析的工具函数：合取拆分、列引用收集以及类型推导

use super::def::Expression;
use crate::core::error::{PlanError, PlanResult};
use crate::core::schema::Schema;
use crate::core::types::operators::{BinaryOperator, UnaryOperator};
use crate::core::types::DataType;
use crate::core::value::Value;

/// 将 AND 连接的谓词拆分为合取项列表
pub fn split_conjunction(expr: &Expression) -> Vec<Expression> {
    let mut out = Vec::new();
    collect_conjuncts(expr, &mut out);
    out
}

fn collect_conjuncts(expr: &Expression, out: &mut Vec<Expression>) {
    match expr {
        Expression::Binary {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            collect_conjuncts(left, out);
            collect_conjuncts(right, out);
        }
        other => out.push(other.clone()),
    }
}

/// 用 AND 把合取项重新组合为左深树，空列表返回 None
pub fn conjunction(conjuncts: Vec<Expression>) -> Option<Expression> {
    conjuncts.into_iter().reduce(Expression::and)
}

impl Expression {
    /// 按出现顺序收集引用到的列名（去重）
    pub fn referenced_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, columns: &mut Vec<String>) {
        match self {
            Expression::Column(name) => {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
            Expression::Literal(_) => {}
            Expression::Binary { left, right, .. } => {
                left.collect_columns(columns);
                right.collect_columns(columns);
            }
            Expression::Unary { operand, .. } => operand.collect_columns(columns),
        }
    }

    /// 不引用任何列的表达式
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Column(_) => false,
            Expression::Literal(_) => true,
            Expression::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expression::Unary { operand, .. } => operand.is_constant(),
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Expression::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expression::Literal(Value::Bool(true)))
    }

    /// FALSE 或 NULL 字面量，作为谓词时不会放行任何行
    pub fn is_false_or_null(&self) -> bool {
        matches!(
            self,
            Expression::Literal(Value::Bool(false)) | Expression::Literal(Value::Null)
        )
    }

    pub fn as_column(&self) -> Option<&str> {
        match self {
            Expression::Column(name) => Some(name),
            _ => None,
        }
    }

    /// 在给定输入模式上推导表达式类型，列无法解析或类型不兼容时报错
    pub fn data_type(&self, schema: &Schema) -> PlanResult<DataType> {
        match self {
            Expression::Column(name) => Ok(schema.field_by_name(name)?.data_type),
            Expression::Literal(value) => Ok(value.data_type()),
            Expression::Binary { left, op, right } => {
                let lt = left.data_type(schema)?;
                let rt = right.data_type(schema)?;
                if op.is_arithmetic() {
                    lt.widen(rt).ok_or_else(|| {
                        PlanError::schema_mismatch(format!(
                            "算术运算 {} 的操作数类型不兼容: {} 与 {}",
                            self, lt, rt
                        ))
                    })
                } else if op.is_comparison() {
                    if lt.is_comparable_with(&rt) {
                        Ok(DataType::Boolean)
                    } else {
                        Err(PlanError::schema_mismatch(format!(
                            "比较运算 {} 的操作数类型不兼容: {} 与 {}",
                            self, lt, rt
                        )))
                    }
                } else {
                    check_boolean(self, lt)?;
                    check_boolean(self, rt)?;
                    Ok(DataType::Boolean)
                }
            }
            Expression::Unary { op, operand } => {
                let t = operand.data_type(schema)?;
                match op {
                    UnaryOperator::Minus if t.is_numeric() || t == DataType::Null => Ok(t),
                    UnaryOperator::Minus => Err(PlanError::schema_mismatch(format!(
                        "取负运算 {} 需要数值类型，实际为 {}",
                        self, t
                    ))),
                    UnaryOperator::Not => {
                        check_boolean(self, t)?;
                        Ok(DataType::Boolean)
                    }
                    UnaryOperator::IsNull | UnaryOperator::IsNotNull => Ok(DataType::Boolean),
                }
            }
        }
    }
}

fn check_boolean(expr: &Expression, data_type: DataType) -> PlanResult<()> {
    match data_type {
        DataType::Boolean | DataType::Null => Ok(()),
        other => Err(PlanError::schema_mismatch(format!(
            "逻辑运算 {} 需要布尔类型，实际为 {}",
            expr, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Field;

    fn users() -> Schema {
        Schema::new(vec![
            Field::new("users.id", DataType::Int, false),
            Field::new("users.name", DataType::Varchar, true),
            Field::new("users.age", DataType::Int, true),
        ])
    }

    #[test]
    fn test_split_and_combine() {
        let a = Expression::gt(Expression::column("age"), Expression::int(30));
        let b = Expression::gt(Expression::column("id"), Expression::int(10));
        let c = Expression::is_null(Expression::column("name"));
        let expr = Expression::and(Expression::and(a.clone(), b.clone()), c.clone());
        let parts = split_conjunction(&expr);
        assert_eq!(parts, vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(conjunction(parts), Some(expr));
        assert_eq!(conjunction(vec![]), None);
    }

    #[test]
    fn test_referenced_columns() {
        let expr = Expression::and(
            Expression::eq(Expression::column("u.id"), Expression::column("j.id")),
            Expression::gt(Expression::column("u.id"), Expression::int(1)),
        );
        assert_eq!(expr.referenced_columns(), vec!["u.id", "j.id"]);
        assert!(!expr.is_constant());
        assert!(Expression::add(Expression::int(1), Expression::int(2)).is_constant());
    }

    #[test]
    fn test_data_type() {
        let schema = users();
        let expr = Expression::gt(
            Expression::column("age"),
            Expression::add(Expression::int(30), Expression::int(1)),
        );
        assert_eq!(expr.data_type(&schema).unwrap(), DataType::Boolean);

        let sum = Expression::add(Expression::column("users.age"), Expression::literal(1.5));
        assert_eq!(sum.data_type(&schema).unwrap(), DataType::Double);

        let bad = Expression::add(Expression::column("name"), Expression::int(1));
        assert!(bad.data_type(&schema).is_err());

        let missing = Expression::column("salary");
        assert!(missing.data_type(&schema).is_err());
    }
}
