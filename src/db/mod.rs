//! Database module: models, schema and the actor owning the connection.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the statements themselves
//! - `actor.rs`: single-owner actor serializing all statements

pub mod actor;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use actor::{DbHandle, spawn};
pub use models::{Customer, CustomerId, DbUser, NewCustomer};
