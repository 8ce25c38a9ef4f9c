//! Storage seam. A request obtains one `Session` from the shared `Store`, runs its
//! operations through it, and commits. Dropping a session without committing discards
//! its writes and releases the underlying connection.

mod bootstrap;
pub mod memory;
pub mod postgres;
pub mod tables;

pub use bootstrap::{ensure_database_exists, ensure_tables};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::schema::{
    Category, CategoryCreate, CategoryFilter, CategoryUpdate, PageRequest, Product, ProductCreate,
    ProductFilter, ProductUpdate,
};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Acquire a scoped session. Held for the lifetime of one request.
    async fn session(&self) -> Result<Box<dyn Session>, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Row-level operations. Not-found is `Ok(None)`; listing returns one page of rows plus
/// the total number of rows matching the filter.
#[async_trait]
pub trait Session: Send {
    async fn insert_category(&mut self, input: &CategoryCreate) -> Result<Category, AppError>;
    async fn find_category(&mut self, id: i32) -> Result<Option<Category>, AppError>;
    async fn update_category(&mut self, id: i32, patch: &CategoryUpdate) -> Result<Option<Category>, AppError>;
    async fn delete_category(&mut self, id: i32) -> Result<Option<Category>, AppError>;
    async fn list_categories(
        &mut self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<(Vec<Category>, u64), AppError>;

    async fn insert_product(&mut self, input: &ProductCreate) -> Result<Product, AppError>;
    async fn find_product(&mut self, id: i32) -> Result<Option<Product>, AppError>;
    async fn update_product(&mut self, id: i32, patch: &ProductUpdate) -> Result<Option<Product>, AppError>;
    async fn delete_product(&mut self, id: i32) -> Result<Option<Product>, AppError>;
    async fn list_products(
        &mut self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), AppError>;
    async fn count_products_in_category(&mut self, category_id: i32) -> Result<u64, AppError>;

    /// Make this session's writes durable and release it.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

/// Field error used when a product references a category that does not exist.
pub(crate) fn missing_category() -> AppError {
    AppError::field("category_id", "category does not exist")
}

/// Domain error for deleting a category that products still reference.
pub(crate) fn category_in_use() -> AppError {
    AppError::Conflict("Category Has Products".into())
}
