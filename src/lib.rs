//! Relopt - 关系查询计划优化器
//!
//! 输入是已经完成类型解析的逻辑计划树，输出是等价且代价更低的物理计划：
//! 先用有序规则集做启发式重写（常量折叠、谓词下推、空结果传播），
//! 再在 memo 中做基于代价的搜索，选出满足所需特征的最优物理实现。

pub mod config;
pub mod core;
pub mod query;
pub mod utils;
