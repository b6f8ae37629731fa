//! SQL DDL for initializing the CRM database.
//! Column names match `crm.db` files written by the legacy dashboard.

/// SQLite schema with:
/// - `users.username` PRIMARY KEY (uniqueness enforced on insert)
/// - `users.password` holding the password hash, not the password
/// - `customers.id` INTEGER PRIMARY KEY AUTOINCREMENT (ids never reused)
/// - `phone` / `notes` nullable
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    notes TEXT
);
"#;
