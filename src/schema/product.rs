use super::category::Category;
use super::validation::{present, FieldKind, FieldRule};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A product as returned by the API, with its category inlined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub category_id: i32,
    pub category: Option<Category>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub price: f64,
    pub category_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category_id: Option<i32>,
}

pub const PRODUCT_FIELDS: &[FieldRule] = &[
    FieldRule::new("name", FieldKind::Str).required(),
    FieldRule::new("description", FieldKind::Str).nullable(),
    FieldRule::new("quantity", FieldKind::Int).minimum(0),
    FieldRule::new("price", FieldKind::Float).required().minimum(0),
    FieldRule::new("category_id", FieldKind::Int).required(),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search_term: Option<String>,
    pub category_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantity_defaults_to_one() {
        let input: ProductCreate =
            serde_json::from_value(json!({"name": "Bagel", "price": 1.25, "category_id": 2})).unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.description, None);
    }
}
