//! In-process store mirroring the PostgreSQL semantics: serial ids, id ordering,
//! case-insensitive search, and foreign-key checks. Sessions are serialized; each
//! one works on a staged copy of the tables that `commit` publishes.
//!
//! A session holds the single table lock until it is committed or dropped, so with
//! `BAKERY_STORAGE=memory` the server handles requests one at a time across all routes.

use super::{category_in_use, missing_category, Session, Store};
use crate::error::AppError;
use crate::schema::{
    Category, CategoryCreate, CategoryFilter, CategoryUpdate, PageRequest, Product, ProductCreate,
    ProductFilter, ProductUpdate,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Debug)]
struct ProductRecord {
    id: i32,
    name: String,
    description: Option<String>,
    quantity: i32,
    price: f64,
    category_id: i32,
}

#[derive(Clone, Debug, Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, ProductRecord>,
    last_category_id: i32,
    last_product_id: i32,
}

impl Tables {
    fn hydrate(&self, record: &ProductRecord) -> Product {
        Product {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            quantity: record.quantity,
            price: record.price,
            category_id: record.category_id,
            category: self.categories.get(&record.category_id).cloned(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn session(&self) -> Result<Box<dyn Session>, AppError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemorySession { guard, staged }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MemorySession {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

fn matches_search(term: Option<&str>, name: &str, description: Option<&str>) -> bool {
    let Some(term) = term else {
        return true;
    };
    let term = term.to_lowercase();
    name.to_lowercase().contains(&term)
        || description
            .map(|d| d.to_lowercase().contains(&term))
            .unwrap_or(false)
}

fn page_of<T>(matching: Vec<T>, page: PageRequest) -> (Vec<T>, u64) {
    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (items, total)
}

#[async_trait]
impl Session for MemorySession {
    async fn insert_category(&mut self, input: &CategoryCreate) -> Result<Category, AppError> {
        self.staged.last_category_id += 1;
        let category = Category {
            id: self.staged.last_category_id,
            name: input.name.clone(),
            description: input.description.clone(),
        };
        self.staged.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&mut self, id: i32) -> Result<Option<Category>, AppError> {
        Ok(self.staged.categories.get(&id).cloned())
    }

    async fn update_category(&mut self, id: i32, patch: &CategoryUpdate) -> Result<Option<Category>, AppError> {
        Ok(self.staged.categories.get_mut(&id).map(|category| {
            patch.apply(category);
            category.clone()
        }))
    }

    async fn delete_category(&mut self, id: i32) -> Result<Option<Category>, AppError> {
        if self.staged.products.values().any(|p| p.category_id == id) {
            return Err(category_in_use());
        }
        Ok(self.staged.categories.remove(&id))
    }

    async fn list_categories(
        &mut self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<(Vec<Category>, u64), AppError> {
        let term = filter.search_term.as_deref();
        let matching = self
            .staged
            .categories
            .values()
            .filter(|c| matches_search(term, &c.name, c.description.as_deref()))
            .cloned()
            .collect();
        Ok(page_of(matching, page))
    }

    async fn insert_product(&mut self, input: &ProductCreate) -> Result<Product, AppError> {
        if !self.staged.categories.contains_key(&input.category_id) {
            return Err(missing_category());
        }
        self.staged.last_product_id += 1;
        let record = ProductRecord {
            id: self.staged.last_product_id,
            name: input.name.clone(),
            description: input.description.clone(),
            quantity: input.quantity,
            price: input.price,
            category_id: input.category_id,
        };
        let product = self.staged.hydrate(&record);
        self.staged.products.insert(record.id, record);
        Ok(product)
    }

    async fn find_product(&mut self, id: i32) -> Result<Option<Product>, AppError> {
        Ok(self.staged.products.get(&id).map(|r| self.staged.hydrate(r)))
    }

    async fn update_product(&mut self, id: i32, patch: &ProductUpdate) -> Result<Option<Product>, AppError> {
        if let Some(category_id) = patch.category_id {
            if !self.staged.categories.contains_key(&category_id) {
                return Err(missing_category());
            }
        }
        let Some(record) = self.staged.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(description) = &patch.description {
            record.description = description.clone();
        }
        if let Some(quantity) = patch.quantity {
            record.quantity = quantity;
        }
        if let Some(price) = patch.price {
            record.price = price;
        }
        if let Some(category_id) = patch.category_id {
            record.category_id = category_id;
        }
        let record = record.clone();
        Ok(Some(self.staged.hydrate(&record)))
    }

    async fn delete_product(&mut self, id: i32) -> Result<Option<Product>, AppError> {
        let snapshot = self.staged.products.get(&id).map(|r| self.staged.hydrate(r));
        self.staged.products.remove(&id);
        Ok(snapshot)
    }

    async fn list_products(
        &mut self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), AppError> {
        let term = filter.search_term.as_deref();
        let matching = self
            .staged
            .products
            .values()
            .filter(|p| filter.category_id.map_or(true, |id| p.category_id == id))
            .filter(|p| matches_search(term, &p.name, p.description.as_deref()))
            .map(|p| self.staged.hydrate(p))
            .collect();
        Ok(page_of(matching, page))
    }

    async fn count_products_in_category(&mut self, category_id: i32) -> Result<u64, AppError> {
        Ok(self
            .staged
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemorySession { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str) -> CategoryCreate {
        CategoryCreate {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();
        {
            let mut session = store.session().await.unwrap();
            session.insert_category(&create("Breads")).await.unwrap();
        }
        let mut session = store.session().await.unwrap();
        let (items, total) = session
            .list_categories(&CategoryFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_later_sessions() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let created = session.insert_category(&create("Breads")).await.unwrap();
        session.commit().await.unwrap();

        let mut session = store.session().await.unwrap();
        assert_eq!(session.find_category(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn product_requires_existing_category() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let err = session
            .insert_product(&ProductCreate {
                name: "Scone".into(),
                description: None,
                quantity: 1,
                price: 2.0,
                category_id: 42,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn search_is_case_insensitive_on_either_column() {
        assert!(matches_search(Some("CAKE"), "Cheesecake", None));
        assert!(matches_search(Some("cake"), "Tart", Some("A CAKE-like tart")));
        assert!(!matches_search(Some("cake"), "Tart", None));
        assert!(matches_search(None, "anything", None));
    }
}
