//! Table definitions for the SQL builder and the DDL that creates them.

use crate::sql::{Column, Include, Table};

pub static CATEGORIES: Table = Table {
    name: "categories",
    columns: &[
        Column { name: "id", pg_type: "int4" },
        Column { name: "name", pg_type: "text" },
        Column { name: "description", pg_type: "text" },
    ],
    search_columns: &["name", "description"],
};

pub static PRODUCTS: Table = Table {
    name: "products",
    columns: &[
        Column { name: "id", pg_type: "int4" },
        Column { name: "name", pg_type: "text" },
        Column { name: "description", pg_type: "text" },
        Column { name: "quantity", pg_type: "int4" },
        Column { name: "price", pg_type: "float8" },
        Column { name: "category_id", pg_type: "int4" },
    ],
    search_columns: &["name", "description"],
};

/// Products are always read with their category inlined.
pub static PRODUCT_INCLUDES: [Include; 1] = [Include {
    name: "category",
    related: &CATEGORIES,
    our_key: "category_id",
}];

/// Idempotent DDL, in dependency order.
pub const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "categories" (
        "id" SERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "description" TEXT
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "ix_categories_name" ON "categories" ("name")"#,
    r#"
    CREATE TABLE IF NOT EXISTS "products" (
        "id" SERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "description" TEXT,
        "quantity" INTEGER NOT NULL DEFAULT 1 CHECK ("quantity" >= 0),
        "price" DOUBLE PRECISION NOT NULL CHECK ("price" >= 0),
        "category_id" INTEGER NOT NULL REFERENCES "categories" ("id") ON DELETE RESTRICT
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "ix_products_name" ON "products" ("name")"#,
    r#"CREATE INDEX IF NOT EXISTS "ix_products_category_id" ON "products" ("category_id")"#,
];
