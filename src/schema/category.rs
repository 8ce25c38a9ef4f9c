use super::validation::{present, FieldKind, FieldRule};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update. `description: null` clears the stored description.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl CategoryUpdate {
    pub fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
    }
}

pub const CATEGORY_FIELDS: &[FieldRule] = &[
    FieldRule::new("name", FieldKind::Str).required(),
    FieldRule::new("description", FieldKind::Str).nullable(),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub search_term: Option<String>,
}
