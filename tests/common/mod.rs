//! 集成测试共享工具模块
//!
//! 提供目录、计划树与优化器的构造函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

use std::sync::Arc;

use relopt::config::Config;
use relopt::query::optimizer::{InMemoryCatalog, OptimizerEngine};

/// 用给定目录与配置创建优化器
pub fn engine_with(catalog: InMemoryCatalog, config: Config) -> OptimizerEngine {
    OptimizerEngine::new(Arc::new(catalog), config)
}

/// 使用默认配置与演示目录的优化器
pub fn default_engine() -> OptimizerEngine {
    engine_with(data_fixtures::demo_catalog(), Config::default())
}

/// 关闭连接交换的配置，哈希连接与归并连接只按输入大小取舍
pub fn config_without_commute() -> Config {
    let mut config = Config::default();
    config.optimizer.enable_join_commute = false;
    config
}
