//! OpenAPI document served at /openapi.json.

use crate::error::FieldError;
use crate::handlers::{category, product};
use crate::schema::{Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Bakery Inventory API", description = "Categories and products of a bakery's stock"),
    paths(
        category::create,
        category::read,
        category::update,
        category::delete,
        category::list,
        product::create,
        product::read,
        product::update,
        product::delete,
        product::list,
    ),
    components(schemas(
        Category,
        CategoryCreate,
        CategoryUpdate,
        Product,
        ProductCreate,
        ProductUpdate,
        FieldError,
    )),
    tags(
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Products and their stock")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/categories/"));
        assert!(paths.iter().any(|p| p.as_str() == "/categories/{category_id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/products/{product_id}"));
    }
}
