//! 投影节点

use serde::{Deserialize, Serialize};

use crate::core::error::PlanResult;
use crate::core::schema::{Field, Schema};
use crate::core::types::{Expression, ProjectItem};
use crate::query::planner::plan::core::explain::Pair;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    items: Vec<ProjectItem>,
}

impl ProjectNode {
    pub fn new(items: Vec<ProjectItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ProjectItem] {
        &self.items
    }

    pub fn output_schema(&self, input: &Schema) -> PlanResult<Schema> {
        let mut fields = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let data_type = item.expr.data_type(input)?;
            let field = match &item.expr {
                Expression::Column(name) => {
                    let source = input.field_by_name(name)?;
                    Field {
                        name: item.alias.clone(),
                        data_type,
                        nullable: source.nullable,
                        origin: source.origin.clone(),
                    }
                }
                Expression::Literal(value) => Field::new(&item.alias, data_type, value.is_null()),
                _ => Field::new(&item.alias, data_type, true),
            };
            fields.push(field);
        }
        let schema = Schema::new(fields);
        schema.check_unique_names()?;
        Ok(schema)
    }

    /// 输入字段下标到输出列名的映射，只包含直接的列引用
    pub fn column_mapping(&self, input: &Schema) -> Vec<(usize, String)> {
        self.items
            .iter()
            .filter_map(|item| {
                let name = item.expr.as_column()?;
                input.resolve(name).map(|idx| (idx, item.alias.clone()))
            })
            .collect()
    }

    pub fn describe(&self) -> Vec<Pair> {
        let exprs: Vec<String> = self.items.iter().map(|i| i.to_string()).collect();
        vec![Pair::new("exprs", format!("[{}]", exprs.join(", ")))]
    }
}
