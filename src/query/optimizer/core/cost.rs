//! 代价模型核心类型

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// 计划代价
///
/// `rows` 为处理的行数估计，`cpu` 为 CPU 代价。比较时先比 `cpu`，相等再比 `rows`。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    pub rows: f64,
    pub cpu: f64,
}

impl Cost {
    pub fn new(rows: f64, cpu: f64) -> Self {
        Self { rows, cpu }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn infinite() -> Self {
        Self {
            rows: f64::INFINITY,
            cpu: f64::INFINITY,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.cpu.is_infinite() || self.rows.is_infinite()
    }

    pub fn total(&self) -> f64 {
        self.cpu
    }

    /// 全序比较，NaN 视为最大
    pub fn total_cmp(&self, other: &Cost) -> Ordering {
        self.cpu
            .total_cmp(&other.cpu)
            .then_with(|| self.rows.total_cmp(&other.rows))
    }

    pub fn is_lt(&self, other: &Cost) -> bool {
        self.total_cmp(other) == Ordering::Less
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.total_cmp(other))
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, other: Cost) -> Cost {
        Cost {
            rows: self.rows + other.rows,
            cpu: self.cpu + other.cpu,
        }
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Cost) {
        self.rows += other.rows;
        self.cpu += other.cpu;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::zero(), |acc, c| acc + c)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:.1} rows, {:.1} cpu}}", self.rows, self.cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_ordering() {
        let cheap = Cost::new(100.0, 10.0);
        let expensive = Cost::new(1.0, 20.0);
        assert!(cheap < expensive);
        assert!(Cost::new(1.0, 10.0).is_lt(&cheap));
        assert!(expensive < Cost::infinite());
    }

    #[test]
    fn test_cost_sum() {
        let total: Cost = vec![Cost::new(1.0, 2.0), Cost::new(3.0, 4.0)].into_iter().sum();
        assert_eq!(total, Cost::new(4.0, 6.0));
        assert_eq!(total.to_string(), "{4.0 rows, 6.0 cpu}");
    }
}
