//! 物理特征
//!
//! 每个计划节点都携带一组特征：调用约定、排序与数据分布。
//! 代价搜索按所需特征查找最优计划，不满足时插入排序或交换节点。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 调用约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Convention {
    /// 逻辑节点，不可执行
    Logical,
    /// 物理节点
    Physical,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Logical => write!(f, "LOGICAL"),
            Convention::Physical => write!(f, "PHYSICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// 单列排序
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldCollation {
    pub column: String,
    pub direction: SortDirection,
}

impl FieldCollation {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for FieldCollation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// 有序的排序键列表，空列表表示无序
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Collation(Vec<FieldCollation>);

impl Collation {
    pub fn new(fields: Vec<FieldCollation>) -> Self {
        Self(fields)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// 按给定列升序
    pub fn ascending<S: AsRef<str>>(columns: &[S]) -> Self {
        Self(columns.iter().map(|c| FieldCollation::asc(c.as_ref())).collect())
    }

    pub fn fields(&self) -> &[FieldCollation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 所需排序是当前排序的前缀即满足
    pub fn satisfies(&self, required: &Collation) -> bool {
        required.0.len() <= self.0.len() && self.0.iter().zip(required.0.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// 数据分布
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Distribution {
    /// 不关心分布
    #[default]
    Any,
    /// 全部数据位于单个分区
    Single,
    /// 按给定列哈希分区
    Hash(Vec<String>),
    /// 每个分区都有完整副本
    Broadcast,
}

impl Distribution {
    pub fn satisfies(&self, required: &Distribution) -> bool {
        match required {
            Distribution::Any => true,
            other => self == other,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Any => write!(f, "ANY"),
            Distribution::Single => write!(f, "SINGLE"),
            Distribution::Hash(keys) => write!(f, "HASH({})", keys.join(", ")),
            Distribution::Broadcast => write!(f, "BROADCAST"),
        }
    }
}

/// 特征集合
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitSet {
    pub convention: Convention,
    pub collation: Collation,
    pub distribution: Distribution,
}

impl TraitSet {
    pub fn logical() -> Self {
        Self {
            convention: Convention::Logical,
            collation: Collation::empty(),
            distribution: Distribution::Any,
        }
    }

    pub fn physical() -> Self {
        Self {
            convention: Convention::Physical,
            collation: Collation::empty(),
            distribution: Distribution::Any,
        }
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// 所需约定为逻辑时不限制约定
    pub fn satisfies(&self, required: &TraitSet) -> bool {
        (required.convention == Convention::Logical || self.convention == required.convention)
            && self.collation.satisfies(&required.collation)
            && self.distribution.satisfies(&required.distribution)
    }
}

impl Default for TraitSet {
    fn default() -> Self {
        Self::logical()
    }
}

impl fmt::Display for TraitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}}}",
            self.convention, self.collation, self.distribution
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collation_prefix() {
        let delivered = Collation::ascending(&["users.id", "users.age"]);
        assert!(delivered.satisfies(&Collation::ascending(&["users.id"])));
        assert!(delivered.satisfies(&Collation::empty()));
        assert!(!delivered.satisfies(&Collation::ascending(&["users.age"])));
        assert!(!Collation::empty().satisfies(&Collation::ascending(&["users.id"])));
        let desc = Collation::new(vec![FieldCollation::desc("users.id")]);
        assert!(!delivered.satisfies(&desc));
    }

    #[test]
    fn test_distribution() {
        assert!(Distribution::Single.satisfies(&Distribution::Any));
        assert!(!Distribution::Single.satisfies(&Distribution::Broadcast));
        let hash = Distribution::Hash(vec!["a".to_string()]);
        assert!(hash.satisfies(&hash.clone()));
    }

    #[test]
    fn test_trait_set() {
        let required = TraitSet::physical().with_collation(Collation::ascending(&["x"]));
        let delivered = TraitSet::physical()
            .with_collation(Collation::ascending(&["x", "y"]))
            .with_distribution(Distribution::Single);
        assert!(delivered.satisfies(&required));
        assert!(!TraitSet::logical().satisfies(&TraitSet::physical()));
        assert_eq!(
            required.to_string(),
            "{PHYSICAL, [x ASC], ANY}"
        );
    }
}
