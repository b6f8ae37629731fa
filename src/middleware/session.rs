//! Server-side sessions backed by `tower-sessions`.
//!
//! The cookie carries only a random session id; `{logged_in, username}`
//! lives in the store, which expires it after `session_max_age_hours` of
//! inactivity and drops it on logout.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::error::CrmError;

pub const SESSION_COOKIE: &str = "crm_session";

/// Longest accepted `auth.session_max_age_hours` (one year).
pub const MAX_SESSION_AGE_HOURS: u32 = 24 * 366;

const USERNAME_KEY: &str = "username";

/// Cookie and expiry settings for the session layer.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub secure: bool,
    pub max_age: Duration,
}

impl SessionSettings {
    pub fn new(insecure_cookie: bool, max_age_hours: u32) -> Result<Self, CrmError> {
        if max_age_hours == 0 || max_age_hours > MAX_SESSION_AGE_HOURS {
            return Err(CrmError::InvalidConfig(format!(
                "session_max_age_hours must be 1..={MAX_SESSION_AGE_HOURS}, got {max_age_hours}"
            )));
        }
        Ok(Self {
            secure: !insecure_cookie,
            max_age: Duration::hours(i64::from(max_age_hours)),
        })
    }
}

pub fn session_layer(settings: SessionSettings) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_expiry(Expiry::OnInactivity(settings.max_age))
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// What the dashboard knows about the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub logged_in: bool,
    pub username: String,
}

impl SessionState {
    pub async fn load(session: &Session) -> Result<Self, CrmError> {
        Ok(match current_user(session).await? {
            Some(username) => Self {
                logged_in: true,
                username,
            },
            None => Self {
                logged_in: false,
                username: String::new(),
            },
        })
    }
}

pub async fn current_user(session: &Session) -> Result<Option<String>, CrmError> {
    let username: Option<String> = session.get(USERNAME_KEY).await?;
    Ok(username.filter(|u| !u.is_empty()))
}

/// Bind `username` to a fresh session id.
pub async fn start_session(session: &Session, username: &str) -> Result<(), CrmError> {
    session.cycle_id().await?;
    session.insert(USERNAME_KEY, username).await?;
    Ok(())
}

/// Delete the session from the store; its id stops resolving immediately.
pub async fn end_session(session: &Session) -> Result<(), CrmError> {
    session.flush().await?;
    Ok(())
}

/// Extractor for routes that need a logged-in user. Rejects with 401.
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = CrmError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(CrmError::NotLoggedIn)?;
        current_user(&session)
            .await?
            .map(Self)
            .ok_or(CrmError::NotLoggedIn)
    }
}
