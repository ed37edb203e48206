//! 常量折叠
//!
//! 只折叠结果类型与原表达式一致的情况：溢出、除零以及涉及 NULL 的运算保持原样

use std::cmp::Ordering;

use super::def::Expression;
use crate::core::types::operators::{BinaryOperator, UnaryOperator};
use crate::core::value::Value;

impl Expression {
    /// 自底向上折叠常量子表达式，并化简与 TRUE/FALSE 的逻辑运算
    pub fn fold(&self) -> Expression {
        match self {
            Expression::Column(_) | Expression::Literal(_) => self.clone(),
            Expression::Unary { op, operand } => {
                let operand = operand.fold();
                match operand.as_literal().and_then(|v| fold_unary(*op, v)) {
                    Some(value) => Expression::Literal(value),
                    None => Expression::unary(*op, operand),
                }
            }
            Expression::Binary { left, op, right } => {
                let left = left.fold();
                let right = right.fold();
                if let Some(simplified) = simplify_logical(*op, &left, &right) {
                    return simplified;
                }
                let folded = match (left.as_literal(), right.as_literal()) {
                    (Some(l), Some(r)) => fold_binary(*op, l, r),
                    _ => None,
                };
                match folded {
                    Some(value) => Expression::Literal(value),
                    None => Expression::binary(left, *op, right),
                }
            }
        }
    }
}

fn fold_unary(op: UnaryOperator, value: &Value) -> Option<Value> {
    match (op, value) {
        (UnaryOperator::IsNull, v) => Some(Value::Bool(v.is_null())),
        (UnaryOperator::IsNotNull, v) => Some(Value::Bool(!v.is_null())),
        (UnaryOperator::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
        (UnaryOperator::Minus, Value::Int(i)) => i.checked_neg().map(Value::Int),
        (UnaryOperator::Minus, Value::Float(f)) => Some(Value::Float(-f)),
        _ => None,
    }
}

/// `x AND TRUE`、`x OR FALSE` 之类的化简，只要求一侧是字面量
fn simplify_logical(op: BinaryOperator, left: &Expression, right: &Expression) -> Option<Expression> {
    let is_false = |e: &Expression| matches!(e, Expression::Literal(Value::Bool(false)));
    match op {
        BinaryOperator::And => {
            if is_false(left) || is_false(right) {
                Some(Expression::bool(false))
            } else if left.is_true() {
                Some(right.clone())
            } else if right.is_true() {
                Some(left.clone())
            } else {
                None
            }
        }
        BinaryOperator::Or => {
            if left.is_true() || right.is_true() {
                Some(Expression::bool(true))
            } else if is_false(left) {
                Some(right.clone())
            } else if is_false(right) {
                Some(left.clone())
            } else {
                None
            }
        }
        _ => None,
    }
}

fn fold_binary(op: BinaryOperator, left: &Value, right: &Value) -> Option<Value> {
    if left.is_null() || right.is_null() {
        return None;
    }
    if op.is_arithmetic() {
        return fold_arithmetic(op, left, right);
    }
    if op.is_comparison() {
        let ordering = compare(left, right)?;
        let result = match op {
            BinaryOperator::Equal => ordering == Ordering::Equal,
            BinaryOperator::NotEqual => ordering != Ordering::Equal,
            BinaryOperator::LessThan => ordering == Ordering::Less,
            BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
            BinaryOperator::GreaterThan => ordering == Ordering::Greater,
            BinaryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            _ => return None,
        };
        return Some(Value::Bool(result));
    }
    None
}

fn fold_arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOperator::Add => a.checked_add(*b),
                BinaryOperator::Subtract => a.checked_sub(*b),
                BinaryOperator::Multiply => a.checked_mul(*b),
                BinaryOperator::Divide => a.checked_div(*b),
                BinaryOperator::Modulo => a.checked_rem(*b),
                _ => None,
            };
            result.map(Value::Int)
        }
        _ => {
            let (a, b) = (left.as_f64()?, right.as_f64()?);
            let result = match op {
                BinaryOperator::Add => a + b,
                BinaryOperator::Subtract => a - b,
                BinaryOperator::Multiply => a * b,
                BinaryOperator::Divide if b != 0.0 => a / b,
                BinaryOperator::Modulo if b != 0.0 => a % b,
                _ => return None,
            };
            result.is_finite().then_some(Value::Float(result))
        }
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}
