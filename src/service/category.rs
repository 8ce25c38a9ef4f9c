use crate::error::AppError;
use crate::schema::{Category, CategoryCreate, CategoryFilter, CategoryUpdate, Page, PageRequest};
use crate::store::{category_in_use, Session};

pub struct CategoryService;

impl CategoryService {
    pub async fn create(session: &mut dyn Session, input: &CategoryCreate) -> Result<Category, AppError> {
        let category = session.insert_category(input).await?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn get(session: &mut dyn Session, id: i32) -> Result<Option<Category>, AppError> {
        session.find_category(id).await
    }

    /// Overwrite only the fields present in `patch`. `None` when the category does not exist.
    pub async fn update(
        session: &mut dyn Session,
        id: i32,
        patch: &CategoryUpdate,
    ) -> Result<Option<Category>, AppError> {
        session.update_category(id, patch).await
    }

    /// Remove a category and return its last state. Refused while products reference it.
    pub async fn delete(session: &mut dyn Session, id: i32) -> Result<Option<Category>, AppError> {
        if session.find_category(id).await?.is_none() {
            return Ok(None);
        }
        let in_use = session.count_products_in_category(id).await?;
        if in_use > 0 {
            tracing::info!(category_id = id, products = in_use, "refusing to delete category in use");
            return Err(category_in_use());
        }
        let deleted = session.delete_category(id).await?;
        if deleted.is_some() {
            tracing::info!(category_id = id, "category deleted");
        }
        Ok(deleted)
    }

    pub async fn list(
        session: &mut dyn Session,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, AppError> {
        let (items, total) = session.list_categories(filter, page).await?;
        Ok(Page::new(items, page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProductCreate;
    use crate::store::{MemoryStore, Store};

    fn input(name: &str, description: Option<&str>) -> CategoryCreate {
        CategoryCreate {
            name: name.into(),
            description: description.map(String::from),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let created = CategoryService::create(session.as_mut(), &input("Cakes", Some("Layered")))
            .await
            .unwrap();
        let fetched = CategoryService::get(session.as_mut(), created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Cakes");
        assert_eq!(fetched.description.as_deref(), Some("Layered"));
    }

    #[tokio::test]
    async fn partial_update_keeps_omitted_fields() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let created = CategoryService::create(session.as_mut(), &input("Cakes", Some("Layered")))
            .await
            .unwrap();
        let patch = CategoryUpdate {
            name: Some("Gateaux".into()),
            description: None,
        };
        let updated = CategoryService::update(session.as_mut(), created.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Gateaux");
        assert_eq!(updated.description.as_deref(), Some("Layered"));

        let missing = CategoryService::update(session.as_mut(), 999, &patch).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_returns_snapshot_then_not_found() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let created = CategoryService::create(session.as_mut(), &input("Pies", None)).await.unwrap();
        let deleted = CategoryService::delete(session.as_mut(), created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(CategoryService::get(session.as_mut(), created.id).await.unwrap().is_none());
        assert!(CategoryService::delete(session.as_mut(), created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_refused_while_products_reference_category() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let created = CategoryService::create(session.as_mut(), &input("Breads", None)).await.unwrap();
        session
            .insert_product(&ProductCreate {
                name: "Baguette".into(),
                description: None,
                quantity: 4,
                price: 2.5,
                category_id: created.id,
            })
            .await
            .unwrap();
        let err = CategoryService::delete(session.as_mut(), created.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(CategoryService::get(session.as_mut(), created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_searches_name_or_description() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        for (name, description) in [
            ("Cupcakes", None),
            ("Breads", Some("no CAKE here? yes: cake")),
            ("Cookies", Some("crunchy")),
        ] {
            CategoryService::create(session.as_mut(), &input(name, description)).await.unwrap();
        }
        let filter = CategoryFilter {
            search_term: Some("cake".into()),
        };
        let page = CategoryService::list(session.as_mut(), &filter, PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cupcakes", "Breads"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn second_page_of_twelve() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        for i in 0..12 {
            CategoryService::create(session.as_mut(), &input(&format!("c{}", i), None))
                .await
                .unwrap();
        }
        let page = CategoryService::list(session.as_mut(), &CategoryFilter::default(), PageRequest::new(2, 5))
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["c5", "c6", "c7", "c8", "c9"]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_number, 2);
    }

    #[tokio::test]
    async fn search_wildcards_match_literally() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        CategoryService::create(session.as_mut(), &input("Rolls", Some("Soft 100%_rolls")))
            .await
            .unwrap();
        CategoryService::create(session.as_mut(), &input("Buns", Some("100 per tray")))
            .await
            .unwrap();

        let search = |term: &str| CategoryFilter {
            search_term: Some(term.into()),
        };
        let page = CategoryService::list(session.as_mut(), &search("100%_r"), PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rolls"]);

        let page = CategoryService::list(session.as_mut(), &search("1_0"), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }
}
