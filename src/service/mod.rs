//! Per-entity services over a request's storage session.

mod category;
mod product;
pub use category::CategoryService;
pub use product::ProductService;
