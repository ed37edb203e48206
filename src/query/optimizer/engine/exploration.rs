//! 探索状态管理
//! 定义 ExplorationState 结构体，用于追踪代价搜索中规则的触发情况与预算

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::core::error::OptimizeError;
use crate::query::optimizer::plan::MemberId;

/// 规则在某个成员上的一次绑定
pub type FiredKey = (MemberId, &'static str, String);

#[derive(Debug)]
pub struct ExplorationState {
    fired: HashSet<FiredKey>,
    pub passes: usize,
    pub firings: usize,
    started: Instant,
    budget: Option<OptimizeError>,
}

impl Default for ExplorationState {
    fn default() -> Self {
        Self {
            fired: HashSet::new(),
            passes: 0,
            firings: 0,
            started: Instant::now(),
            budget: None,
        }
    }
}

impl ExplorationState {
    /// 记录一次绑定，已经触发过时返回 false
    pub fn mark_fired(&mut self, key: FiredKey) -> bool {
        let inserted = self.fired.insert(key);
        if inserted {
            self.firings += 1;
        }
        inserted
    }

    pub fn was_fired(&self, key: &FiredKey) -> bool {
        self.fired.contains(key)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget_exceeded(&self) -> bool {
        self.budget.is_some()
    }

    /// 只记录第一次超出的预算
    pub fn exceed(&mut self, warning: OptimizeError) {
        if self.budget.is_none() {
            self.budget = Some(warning);
        }
    }

    pub fn take_warning(&mut self) -> Option<OptimizeError> {
        self.budget.take()
    }
}
