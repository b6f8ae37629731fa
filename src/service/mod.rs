pub mod credential_store;
pub mod customer_store;
pub mod password;

pub use credential_store::CredentialStore;
pub use customer_store::CustomerStore;
