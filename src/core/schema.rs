//! 行类型（模式）
//!
//! 每个计划节点都携带一个有序的字段列表。字段名使用 `限定名.列名` 的形式，
//! 引用时既可以写完整名称，也可以写唯一的后缀，例如 `age` 可以解析到 `users.age`。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::DataType;

/// 字段的来源表与列，用于统计信息查找
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnOrigin {
    pub table: String,
    pub column: String,
}

/// 字段定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub origin: Option<ColumnOrigin>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            origin: None,
        }
    }

    pub fn with_origin(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.origin = Some(ColumnOrigin {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// 引用名是否可以指向该字段：完全相等，或者是 `.` 之后的后缀
    fn answers_to(&self, reference: &str) -> bool {
        if self.name == reference {
            return true;
        }
        self.name.len() > reference.len()
            && self.name.ends_with(reference)
            && self.name.as_bytes()[self.name.len() - reference.len() - 1] == b'.'
    }
}

/// 有序字段列表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// 解析列引用；找不到或有歧义都返回 None
    pub fn resolve(&self, reference: &str) -> Option<usize> {
        self.index_of(reference).ok()
    }

    /// 解析列引用，优先精确匹配，其次唯一后缀匹配
    pub fn index_of(&self, reference: &str) -> PlanResult<usize> {
        if let Some(pos) = self.fields.iter().position(|f| f.name == reference) {
            return Ok(pos);
        }
        let mut candidates = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.answers_to(reference))
            .map(|(i, _)| i);
        match (candidates.next(), candidates.next()) {
            (Some(i), None) => Ok(i),
            (Some(_), Some(_)) => Err(PlanError::schema_mismatch(format!(
                "列引用 {} 有歧义，可选字段: [{}]",
                reference,
                self.names().join(", ")
            ))),
            _ => Err(PlanError::schema_mismatch(format!(
                "列 {} 不存在，可选字段: [{}]",
                reference,
                self.names().join(", ")
            ))),
        }
    }

    pub fn field_by_name(&self, reference: &str) -> PlanResult<&Field> {
        let index = self.index_of(reference)?;
        Ok(&self.fields[index])
    }

    /// 拼接两个模式，左侧字段在前；字段名冲突时报错
    pub fn join(&self, right: &Schema) -> PlanResult<Schema> {
        let mut fields = self.fields.clone();
        for field in &right.fields {
            if fields.iter().any(|f| f.name == field.name) {
                return Err(PlanError::schema_mismatch(format!(
                    "连接两侧存在同名字段 {}",
                    field.name
                )));
            }
            fields.push(field.clone());
        }
        Ok(Schema::new(fields))
    }

    /// 字段名与类型逐一相同
    pub fn same_row_type(&self, other: &Schema) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| a.name == b.name && a.data_type == b.data_type)
    }

    /// 将全部字段标记为可空，用于外连接被补空的一侧
    pub fn into_nullable(mut self) -> Schema {
        for field in &mut self.fields {
            field.nullable = true;
        }
        self
    }

    /// 检查字段名唯一
    pub fn check_unique_names(&self) -> PlanResult<()> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(PlanError::schema_mismatch(format!(
                    "字段名 {} 重复",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.name, field.data_type))
            .collect();
        write!(f, "({})", parts.join(", "))
    }
}
