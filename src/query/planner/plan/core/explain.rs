//! 计划解释输出
//!
//! 文本形式每行一个节点 `Kind(attrs)`，子节点缩进两个空格；
//! JSON 形式在此基础上附带节点ID、输出字段与特征。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::nodes::plan_node::PlanNode;

/// 节点描述键值对
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 计划节点描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNodeDescription {
    pub name: String,
    pub id: u64,
    pub description: Vec<Pair>,
    pub output: Vec<String>,
    pub traits: String,
    pub children: Vec<PlanNodeDescription>,
}

impl PlanNodeDescription {
    pub fn from_node(node: &PlanNode) -> Self {
        Self {
            name: node.name().to_string(),
            id: node.id().0,
            description: node.kind().describe(),
            output: node.schema().names().into_iter().map(str::to_string).collect(),
            traits: node.traits().to_string(),
            children: node.children().iter().map(|c| Self::from_node(c)).collect(),
        }
    }
}

impl PlanNode {
    /// 文本形式的计划树
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.kind().digest());
        out.push('\n');
        for child in self.children() {
            child.explain_into(out, depth + 1);
        }
    }

    /// JSON 形式的计划树
    pub fn explain_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&PlanNodeDescription::from_node(self))
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.explain())
    }
}
