//! HTTP handlers for category and product CRUD.

pub mod category;
pub mod params;
pub mod product;
