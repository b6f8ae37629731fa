use axum::{
    Router,
    routing::{get, post},
};

use crate::config::Config;
use crate::db::DbHandle;
use crate::error::CrmError;
use crate::handlers::auth::{login_handler, logout_handler, register_handler, session_handler};
use crate::handlers::customers::{
    add_customer_handler, list_customers_handler, search_customers_handler,
};
use crate::middleware::{SessionSettings, session_layer};
use crate::service::{CredentialStore, CustomerStore};

#[derive(Clone)]
pub struct CrmState {
    pub credentials: CredentialStore,
    pub customers: CustomerStore,
    pub session: SessionSettings,
}

impl CrmState {
    pub fn new(db: DbHandle, cfg: &Config) -> Result<Self, CrmError> {
        let session =
            SessionSettings::new(cfg.auth.insecure_cookie, cfg.auth.session_max_age_hours)?;
        Ok(Self {
            credentials: CredentialStore::new(db.clone(), cfg.auth.password_scheme),
            customers: CustomerStore::new(db),
            session,
        })
    }
}

pub fn crm_router(state: CrmState) -> Router {
    let sessions = session_layer(state.session);
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/session", get(session_handler))
        .route(
            "/customers",
            get(list_customers_handler).post(add_customer_handler),
        )
        .route("/customers/search", get(search_customers_handler))
        .with_state(state)
        .layer(sessions)
}
