use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::query::optimizer::cost::CostModelConfig;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub optimizer: OptimizerConfig,
    pub cost: CostModelConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "relopt".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// 优化器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 启发式重写的迭代上限
    pub hep_max_iterations: usize,
    /// 代价搜索的 memo 成员上限
    pub volcano_max_memo_nodes: usize,
    /// 代价搜索的时间上限（毫秒），0 表示不限
    pub volcano_timeout_ms: u64,
    pub enable_join_commute: bool,
    /// 从两个规则集中移除的规则名
    pub disabled_rules: Vec<String>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            hep_max_iterations: 1000,
            volcano_max_memo_nodes: 10_000,
            volcano_timeout_ms: 0,
            enable_join_commute: true,
            disabled_rules: Vec::new(),
        }
    }
}

impl OptimizerConfig {
    pub fn volcano_timeout(&self) -> Option<Duration> {
        if self.volcano_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.volcano_timeout_ms))
        }
    }

    pub fn is_disabled(&self, rule: &str) -> bool {
        self.disabled_rules.iter().any(|r| r == rule)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.optimizer.hep_max_iterations == 0 {
            return Err("hep_max_iterations 必须大于 0".to_string());
        }
        if self.optimizer.volcano_max_memo_nodes == 0 {
            return Err("volcano_max_memo_nodes 必须大于 0".to_string());
        }
        self.cost.validate()
    }
}
