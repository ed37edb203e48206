//! 代价模型配置模块
//!
//! 每个算子按处理的行数计算代价，以下常数都是“每行”的代价系数。
//!
//! ## 使用示例
//!
//! ```rust
//! use relopt::query::optimizer::cost::CostModelConfig;
//!
//! // 使用默认配置
//! let config = CostModelConfig::default();
//!
//! // 自定义配置
//! let custom_config = CostModelConfig {
//!     hash_build_row_cost: 3.0,
//!     ..Default::default()
//! };
//! assert!(custom_config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

/// 代价模型配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModelConfig {
    /// 目录中没有记录的表的行数。默认值 100
    pub default_row_count: f64,

    /// 表扫描每行代价。默认值 1.0
    pub scan_row_cost: f64,

    /// 过滤每行代价。默认值 0.5
    pub filter_row_cost: f64,

    /// 投影每行代价。默认值 0.25
    pub project_row_cost: f64,

    /// 哈希表构建每行代价（连接右侧、哈希聚合输入）。默认值 2.0
    pub hash_build_row_cost: f64,

    /// 哈希探测每行代价（连接左侧）。默认值 1.0
    pub hash_probe_row_cost: f64,

    /// 归并连接两侧每行代价。默认值 1.5
    pub merge_row_cost: f64,

    /// 嵌套循环连接每对行的代价。默认值 1.0
    pub nested_loop_row_cost: f64,

    /// 外部排序每次比较的代价，总代价为 n * log2(n) * 系数。默认值 1.0
    pub sort_comparison_cost: f64,

    /// 已有序输入上的排序每行代价。默认值 0.05
    pub presorted_row_cost: f64,

    /// 有序聚合每行代价。默认值 0.5
    pub aggregate_row_cost: f64,

    /// 数据交换每行代价。默认值 2.0
    pub exchange_row_cost: f64,

    /// 连接与聚合每输出一行的代价。默认值 0.1
    pub output_row_cost: f64,

    /// 空结果节点的固定代价。默认值 0.1
    pub empty_values_cost: f64,

    /// 等值谓词选择性。默认值 0.15
    pub equality_selectivity: f64,

    /// 范围谓词选择性。默认值 0.5
    pub range_selectivity: f64,

    /// 不等谓词选择性。默认值 0.9
    pub not_equal_selectivity: f64,

    /// IS NULL 选择性。默认值 0.1
    pub is_null_selectivity: f64,

    /// IS NOT NULL 选择性。默认值 0.9
    pub is_not_null_selectivity: f64,

    /// 其他谓词的选择性。默认值 0.25
    pub default_selectivity: f64,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            default_row_count: 100.0,
            scan_row_cost: 1.0,
            filter_row_cost: 0.5,
            project_row_cost: 0.25,
            hash_build_row_cost: 2.0,
            hash_probe_row_cost: 1.0,
            merge_row_cost: 1.5,
            nested_loop_row_cost: 1.0,
            sort_comparison_cost: 1.0,
            presorted_row_cost: 0.05,
            aggregate_row_cost: 0.5,
            exchange_row_cost: 2.0,
            output_row_cost: 0.1,
            empty_values_cost: 0.1,
            equality_selectivity: 0.15,
            range_selectivity: 0.5,
            not_equal_selectivity: 0.9,
            is_null_selectivity: 0.1,
            is_not_null_selectivity: 0.9,
            default_selectivity: 0.25,
        }
    }
}

impl CostModelConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 针对内存数据
    ///
    /// 扫描与交换几乎没有 IO，代价主要来自计算
    pub fn for_in_memory() -> Self {
        Self {
            scan_row_cost: 0.1,
            exchange_row_cost: 0.5,
            ..Default::default()
        }
    }

    /// 设置哈希构建代价
    pub fn with_hash_build_row_cost(mut self, cost: f64) -> Self {
        self.hash_build_row_cost = cost;
        self
    }

    /// 设置归并连接代价
    pub fn with_merge_row_cost(mut self, cost: f64) -> Self {
        self.merge_row_cost = cost;
        self
    }

    /// 检查参数合法：代价非负且有限，选择性在 [0, 1] 内，
    /// 并且更严格的谓词选择性不大于更宽松的谓词
    pub fn validate(&self) -> Result<(), String> {
        let costs = [
            ("default_row_count", self.default_row_count),
            ("scan_row_cost", self.scan_row_cost),
            ("filter_row_cost", self.filter_row_cost),
            ("project_row_cost", self.project_row_cost),
            ("hash_build_row_cost", self.hash_build_row_cost),
            ("hash_probe_row_cost", self.hash_probe_row_cost),
            ("merge_row_cost", self.merge_row_cost),
            ("nested_loop_row_cost", self.nested_loop_row_cost),
            ("sort_comparison_cost", self.sort_comparison_cost),
            ("presorted_row_cost", self.presorted_row_cost),
            ("aggregate_row_cost", self.aggregate_row_cost),
            ("exchange_row_cost", self.exchange_row_cost),
            ("output_row_cost", self.output_row_cost),
            ("empty_values_cost", self.empty_values_cost),
        ];
        for (name, value) in costs {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("代价参数 {} 必须是非负有限数，实际为 {}", name, value));
            }
        }
        let selectivities = [
            ("equality_selectivity", self.equality_selectivity),
            ("range_selectivity", self.range_selectivity),
            ("not_equal_selectivity", self.not_equal_selectivity),
            ("is_null_selectivity", self.is_null_selectivity),
            ("is_not_null_selectivity", self.is_not_null_selectivity),
            ("default_selectivity", self.default_selectivity),
        ];
        for (name, value) in selectivities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("选择性 {} 必须在 [0, 1] 内，实际为 {}", name, value));
            }
        }
        if self.equality_selectivity > self.range_selectivity
            || self.range_selectivity > self.not_equal_selectivity
        {
            return Err("选择性需满足 等值 <= 范围 <= 不等".to_string());
        }
        Ok(())
    }
}
