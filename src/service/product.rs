use crate::error::AppError;
use crate::schema::{Page, PageRequest, Product, ProductCreate, ProductFilter, ProductUpdate};
use crate::store::{missing_category, Session};

pub struct ProductService;

impl ProductService {
    /// Insert a product after checking its category exists in the same session.
    pub async fn create(session: &mut dyn Session, input: &ProductCreate) -> Result<Product, AppError> {
        ensure_category(session, input.category_id).await?;
        let product = session.insert_product(input).await?;
        tracing::info!(product_id = product.id, category_id = product.category_id, "product created");
        Ok(product)
    }

    pub async fn get(session: &mut dyn Session, id: i32) -> Result<Option<Product>, AppError> {
        session.find_product(id).await
    }

    pub async fn update(
        session: &mut dyn Session,
        id: i32,
        patch: &ProductUpdate,
    ) -> Result<Option<Product>, AppError> {
        if session.find_product(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(category_id) = patch.category_id {
            ensure_category(session, category_id).await?;
        }
        session.update_product(id, patch).await
    }

    pub async fn delete(session: &mut dyn Session, id: i32) -> Result<Option<Product>, AppError> {
        let deleted = session.delete_product(id).await?;
        if deleted.is_some() {
            tracing::info!(product_id = id, "product deleted");
        }
        Ok(deleted)
    }

    pub async fn list(
        session: &mut dyn Session,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, AppError> {
        let (items, total) = session.list_products(filter, page).await?;
        Ok(Page::new(items, page, total))
    }
}

async fn ensure_category(session: &mut dyn Session, category_id: i32) -> Result<(), AppError> {
    match session.find_category(category_id).await? {
        Some(_) => Ok(()),
        None => Err(missing_category()),
    }
}
