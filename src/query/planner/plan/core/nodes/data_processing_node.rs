//! 辅助节点：空结果、数据交换与等价集引用

use serde::{Deserialize, Serialize};

use crate::core::error::PlanResult;
use crate::core::schema::Schema;
use crate::query::planner::plan::core::explain::Pair;
use crate::query::planner::plan::core::trait_set::Distribution;

/// 不产生任何行的节点，只携带输出模式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyNode {
    schema: Schema,
}

impl EmptyNode {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![Pair::new("schema", self.schema.to_string())]
    }
}

/// 数据重分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeNode {
    distribution: Distribution,
}

impl ExchangeNode {
    pub fn new(distribution: Distribution) -> Self {
        Self { distribution }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// 哈希分布的列必须都能在输入中解析
    pub fn output_schema(&self, input: &Schema) -> PlanResult<Schema> {
        if let Distribution::Hash(keys) = &self.distribution {
            for key in keys {
                input.index_of(key)?;
            }
        }
        Ok(input.clone())
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![Pair::new("distribution", self.distribution.to_string())]
    }
}

/// 指向 memo 中某个等价集的占位叶子
///
/// 只出现在代价搜索交给规则的绑定里，规则可以把它原样放进新节点的子节点中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRefNode {
    group: usize,
    schema: Schema,
    row_count: f64,
}

impl GroupRefNode {
    pub fn new(group: usize, schema: Schema, row_count: f64) -> Self {
        Self {
            group,
            schema,
            row_count,
        }
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> f64 {
        self.row_count
    }

    pub fn describe(&self) -> Vec<Pair> {
        vec![Pair::new("group", format!("#{}", self.group))]
    }
}
