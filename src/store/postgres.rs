//! PostgreSQL store: every session is one pooled connection inside a transaction.

use super::tables::{CATEGORIES, PRODUCTS, PRODUCT_INCLUDES};
use super::{category_in_use, missing_category, Session, Store};
use crate::error::AppError;
use crate::schema::{
    Category, CategoryCreate, CategoryFilter, CategoryUpdate, PageRequest, Product, ProductCreate,
    ProductFilter, ProductUpdate,
};
use crate::sql::{self, ListFilter, QueryBuf, SqlParam};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, Transaction};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn session(&self) -> Result<Box<dyn Session>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSession { tx }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Dropping an uncommitted session rolls the transaction back and returns the connection to the pool.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[derive(FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    quantity: i32,
    price: f64,
    category_id: i32,
    category: Option<Json<Category>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            price: row.price,
            category_id: row.category_id,
            category: row.category.map(|Json(c)| c),
        }
    }
}

/// Replace a foreign-key violation with a domain error; pass anything else through.
fn on_fk_violation(err: AppError, replacement: fn() -> AppError) -> AppError {
    match &err {
        AppError::Db(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => replacement(),
        _ => err,
    }
}

fn category_sets(patch: &CategoryUpdate) -> Vec<(&'static str, SqlParam)> {
    let mut sets = Vec::new();
    if let Some(name) = &patch.name {
        sets.push(("name", SqlParam::from(name.as_str())));
    }
    if let Some(description) = &patch.description {
        sets.push(("description", SqlParam::from(description.clone())));
    }
    sets
}

fn product_sets(patch: &ProductUpdate) -> Vec<(&'static str, SqlParam)> {
    let mut sets = Vec::new();
    if let Some(name) = &patch.name {
        sets.push(("name", SqlParam::from(name.as_str())));
    }
    if let Some(description) = &patch.description {
        sets.push(("description", SqlParam::from(description.clone())));
    }
    if let Some(quantity) = patch.quantity {
        sets.push(("quantity", SqlParam::from(quantity)));
    }
    if let Some(price) = patch.price {
        sets.push(("price", SqlParam::from(price)));
    }
    if let Some(category_id) = patch.category_id {
        sets.push(("category_id", SqlParam::from(category_id)));
    }
    sets
}

fn product_filter(filter: &ProductFilter) -> ListFilter {
    let mut equals = Vec::new();
    if let Some(category_id) = filter.category_id {
        equals.push(("category_id", SqlParam::from(category_id)));
    }
    ListFilter {
        search: filter.search_term.clone(),
        equals,
    }
}

impl PgSession {
    async fn fetch_optional<T>(&mut self, q: QueryBuf) -> Result<Option<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, T>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_optional(&mut *self.tx).await?)
    }

    async fn fetch_all<T>(&mut self, q: QueryBuf) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, T>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_all(&mut *self.tx).await?)
    }

    /// Run a statement returning at most one `id`.
    async fn fetch_id(&mut self, q: QueryBuf) -> Result<Option<i32>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_scalar::<_, i32>(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.fetch_optional(&mut *self.tx).await?)
    }

    async fn fetch_count(&mut self, q: QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for p in params {
            query = query.bind(p);
        }
        let n = query.fetch_one(&mut *self.tx).await?;
        Ok(n.max(0) as u64)
    }

    async fn execute(&mut self, q: QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        Ok(query.execute(&mut *self.tx).await?.rows_affected())
    }

    async fn inserted_id(&mut self, q: QueryBuf) -> Result<i32, AppError> {
        self.fetch_id(q)
            .await?
            .ok_or_else(|| AppError::Internal("insert returned no id".into()))
    }
}

#[async_trait]
impl Session for PgSession {
    async fn insert_category(&mut self, input: &CategoryCreate) -> Result<Category, AppError> {
        let q = sql::insert(
            &CATEGORIES,
            vec![
                ("name", SqlParam::from(input.name.as_str())),
                ("description", SqlParam::from(input.description.clone())),
            ],
        );
        let id = self.inserted_id(q).await?;
        Ok(Category {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
        })
    }

    async fn find_category(&mut self, id: i32) -> Result<Option<Category>, AppError> {
        self.fetch_optional(sql::select_by_id(&CATEGORIES, &[], id)).await
    }

    async fn update_category(&mut self, id: i32, patch: &CategoryUpdate) -> Result<Option<Category>, AppError> {
        let q = sql::update(&CATEGORIES, id, category_sets(patch));
        match self.fetch_id(q).await? {
            Some(id) => self.find_category(id).await,
            None => Ok(None),
        }
    }

    async fn delete_category(&mut self, id: i32) -> Result<Option<Category>, AppError> {
        let Some(snapshot) = self.find_category(id).await? else {
            return Ok(None);
        };
        self.execute(sql::delete(&CATEGORIES, id))
            .await
            .map_err(|e| on_fk_violation(e, category_in_use))?;
        Ok(Some(snapshot))
    }

    async fn list_categories(
        &mut self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<(Vec<Category>, u64), AppError> {
        let filter = ListFilter {
            search: filter.search_term.clone(),
            equals: Vec::new(),
        };
        let items = self
            .fetch_all(sql::select_page(&CATEGORIES, &filter, page.limit(), page.offset(), &[]))
            .await?;
        let total = self.fetch_count(sql::count(&CATEGORIES, &filter)).await?;
        Ok((items, total))
    }

    async fn insert_product(&mut self, input: &ProductCreate) -> Result<Product, AppError> {
        let q = sql::insert(
            &PRODUCTS,
            vec![
                ("name", SqlParam::from(input.name.as_str())),
                ("description", SqlParam::from(input.description.clone())),
                ("quantity", SqlParam::from(input.quantity)),
                ("price", SqlParam::from(input.price)),
                ("category_id", SqlParam::from(input.category_id)),
            ],
        );
        let id = self
            .inserted_id(q)
            .await
            .map_err(|e| on_fk_violation(e, missing_category))?;
        self.find_product(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("product {} vanished after insert", id)))
    }

    async fn find_product(&mut self, id: i32) -> Result<Option<Product>, AppError> {
        let row: Option<ProductRow> = self
            .fetch_optional(sql::select_by_id(&PRODUCTS, &PRODUCT_INCLUDES, id))
            .await?;
        Ok(row.map(Product::from))
    }

    async fn update_product(&mut self, id: i32, patch: &ProductUpdate) -> Result<Option<Product>, AppError> {
        let q = sql::update(&PRODUCTS, id, product_sets(patch));
        let updated = self
            .fetch_id(q)
            .await
            .map_err(|e| on_fk_violation(e, missing_category))?;
        match updated {
            Some(id) => self.find_product(id).await,
            None => Ok(None),
        }
    }

    async fn delete_product(&mut self, id: i32) -> Result<Option<Product>, AppError> {
        let Some(snapshot) = self.find_product(id).await? else {
            return Ok(None);
        };
        self.execute(sql::delete(&PRODUCTS, id)).await?;
        Ok(Some(snapshot))
    }

    async fn list_products(
        &mut self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), AppError> {
        let filter = product_filter(filter);
        let rows: Vec<ProductRow> = self
            .fetch_all(sql::select_page(
                &PRODUCTS,
                &filter,
                page.limit(),
                page.offset(),
                &PRODUCT_INCLUDES,
            ))
            .await?;
        let total = self.fetch_count(sql::count(&PRODUCTS, &filter)).await?;
        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    async fn count_products_in_category(&mut self, category_id: i32) -> Result<u64, AppError> {
        let filter = ListFilter {
            search: None,
            equals: vec![("category_id", SqlParam::from(category_id))],
        };
        self.fetch_count(sql::count(&PRODUCTS, &filter)).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let session = *self;
        session.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_sets_only_present_fields() {
        let patch = ProductUpdate {
            price: Some(4.5),
            description: Some(None),
            ..Default::default()
        };
        assert_eq!(
            product_sets(&patch),
            vec![("description", SqlParam::Null), ("price", SqlParam::Float(4.5))]
        );
        assert!(category_sets(&CategoryUpdate::default()).is_empty());
    }

    #[test]
    fn product_filter_adds_category_equality() {
        let filter = product_filter(&ProductFilter {
            search_term: Some("bun".into()),
            category_id: Some(3),
        });
        assert_eq!(filter.search.as_deref(), Some("bun"));
        assert_eq!(filter.equals, vec![("category_id", SqlParam::Int(3))]);
    }
}
