use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CrmError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Username already exists.")]
    UsernameTaken,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Login required")]
    NotLoggedIn,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Ractor error: {0}")]
    ActorError(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for CrmError {
    fn from(e: figment::Error) -> Self {
        CrmError::Config(Box::new(e))
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            CrmError::MissingField(msg) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELD", msg.to_string())
            }
            CrmError::UsernameTaken => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username already exists.".to_string(),
            ),
            CrmError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password.".to_string(),
            ),
            CrmError::NotLoggedIn => (
                StatusCode::UNAUTHORIZED,
                "NOT_LOGGED_IN",
                "Please login to continue.".to_string(),
            ),
            CrmError::DatabaseError(_)
            | CrmError::ActorError(_)
            | CrmError::PasswordHash(_)
            | CrmError::TaskJoin(_)
            | CrmError::Session(_)
            | CrmError::InvalidConfig(_)
            | CrmError::Config(_) => {
                error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
