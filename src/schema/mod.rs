//! Request/response schemas and their field rules.

pub mod category;
pub mod page;
pub mod product;
pub mod validation;

pub use category::{Category, CategoryCreate, CategoryFilter, CategoryUpdate, CATEGORY_FIELDS};
pub use page::{search_term, Page, PageRequest};
pub use product::{Product, ProductCreate, ProductFilter, ProductUpdate, PRODUCT_FIELDS};
pub use validation::{FieldKind, FieldRule, RequestValidator};
