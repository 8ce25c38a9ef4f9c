//! Bakery inventory: REST service for product categories and products over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{Settings, StorageSettings};
pub use error::{AppError, ConfigError, FieldError};
pub use openapi::ApiDoc;
pub use response::{failure, success, Envelope};
pub use routes::{app, catalog_routes, common_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryStore, PgStore, Session, Store};
pub use telemetry::init_tracing;
