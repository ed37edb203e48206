//! 选择性估计器模块
//!
//! 按谓词形状估算选择性：AND 相乘，OR 按容斥原理，NOT 取补

use crate::core::types::{BinaryOperator, Expression, UnaryOperator};
use crate::core::value::Value;

use super::config::CostModelConfig;

/// 选择性估计器
#[derive(Debug, Clone, Copy)]
pub struct SelectivityEstimator {
    config: CostModelConfig,
}

impl SelectivityEstimator {
    pub fn new(config: CostModelConfig) -> Self {
        Self { config }
    }

    /// 估计谓词选择性，结果在 [0, 1] 内
    pub fn estimate(&self, predicate: &Expression) -> f64 {
        self.estimate_inner(predicate).clamp(0.0, 1.0)
    }

    fn estimate_inner(&self, predicate: &Expression) -> f64 {
        match predicate {
            Expression::Literal(Value::Bool(true)) => 1.0,
            Expression::Literal(Value::Bool(false)) | Expression::Literal(Value::Null) => 0.0,
            Expression::Binary { left, op, right } => match op {
                BinaryOperator::And => self.estimate(left) * self.estimate(right),
                BinaryOperator::Or => {
                    let a = self.estimate(left);
                    let b = self.estimate(right);
                    a + b - a * b
                }
                BinaryOperator::Equal => self.config.equality_selectivity,
                BinaryOperator::NotEqual => self.config.not_equal_selectivity,
                BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual => self.config.range_selectivity,
                _ => self.config.default_selectivity,
            },
            Expression::Unary { op, operand } => match op {
                UnaryOperator::Not => 1.0 - self.estimate(operand),
                UnaryOperator::IsNull => self.config.is_null_selectivity,
                UnaryOperator::IsNotNull => self.config.is_not_null_selectivity,
                UnaryOperator::Minus => self.config.default_selectivity,
            },
            _ => self.config.default_selectivity,
        }
    }
}

impl Default for SelectivityEstimator {
    fn default() -> Self {
        Self::new(CostModelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Expression {
        Expression::column(name)
    }

    #[test]
    fn test_basic_selectivity() {
        let est = SelectivityEstimator::default();
        assert_eq!(est.estimate(&Expression::eq(col("a"), Expression::int(1))), 0.15);
        assert_eq!(est.estimate(&Expression::gt(col("a"), Expression::int(1))), 0.5);
        assert_eq!(est.estimate(&Expression::is_null(col("a"))), 0.1);
        assert_eq!(est.estimate(&Expression::bool(true)), 1.0);
        assert_eq!(est.estimate(&col("flag")), 0.25);
    }

    #[test]
    fn test_combined_selectivity() {
        let est = SelectivityEstimator::default();
        let a = Expression::gt(col("a"), Expression::int(1));
        let b = Expression::eq(col("b"), Expression::int(2));
        let and = est.estimate(&Expression::and(a.clone(), b.clone()));
        assert!((and - 0.075).abs() < 1e-9);
        let or = est.estimate(&Expression::or(a.clone(), b));
        assert!((or - 0.575).abs() < 1e-9);
        assert_eq!(est.estimate(&Expression::not(a)), 0.5);
    }

    #[test]
    fn test_tighter_predicate_is_more_selective() {
        let est = SelectivityEstimator::default();
        let loose = Expression::gt(col("a"), Expression::int(1));
        let tight = Expression::and(loose.clone(), Expression::ne(col("b"), Expression::int(0)));
        assert!(est.estimate(&tight) <= est.estimate(&loose));
    }
}
