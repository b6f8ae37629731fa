use axum::{Form, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::CrmError;
use crate::middleware::SessionState;
use crate::middleware::session::{end_session, start_session};
use crate::server::CrmState;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/register
pub async fn register_handler(
    State(state): State<CrmState>,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, CrmError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(CrmError::MissingField(
            "Please enter both username and password.",
        ));
    }

    if !state
        .credentials
        .register(&form.username, &form.password)
        .await?
    {
        return Err(CrmError::UsernameTaken);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created successfully! Please login." })),
    ))
}

/// POST /auth/login -> binds the user to a fresh session on success.
pub async fn login_handler(
    State(state): State<CrmState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, CrmError> {
    if !state
        .credentials
        .verify(&form.username, &form.password)
        .await?
    {
        warn!(username = %form.username, "login failed");
        return Err(CrmError::InvalidCredentials);
    }

    start_session(&session, &form.username).await?;
    info!(username = %form.username, "login succeeded");
    Ok(Json(json!({
        "message": format!("Welcome {}!", form.username),
        "username": form.username,
    })))
}

/// POST /auth/logout
pub async fn logout_handler(session: Session) -> Result<impl IntoResponse, CrmError> {
    let current = SessionState::load(&session).await?;
    end_session(&session).await?;
    if current.logged_in {
        info!(username = %current.username, "logged out");
    }
    Ok(Json(json!({ "message": "Successfully logged out." })))
}

/// GET /auth/session
pub async fn session_handler(session: Session) -> Result<Json<SessionState>, CrmError> {
    Ok(Json(SessionState::load(&session).await?))
}
