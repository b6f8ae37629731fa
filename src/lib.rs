pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;

pub use config::Config;
pub use error::CrmError;
pub use service::{CredentialStore, CustomerStore};
