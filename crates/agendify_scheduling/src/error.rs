// --- File: crates/agendify_scheduling/src/error.rs ---
use agendify_db::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the scheduling operations.
///
/// `NotFound` is also returned for rows that exist in another tenant, so a
/// caller can never probe for cross-tenant ids.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Calendar provider error: {0}")]
    CalendarUnavailable(String),
}

impl SchedulingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SchedulingError::Validation(_) => StatusCode::BAD_REQUEST,
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::Conflict(_) => StatusCode::CONFLICT,
            SchedulingError::Forbidden(_) => StatusCode::FORBIDDEN,
            SchedulingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SchedulingError::CalendarUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Store failures carry internals (urls, sql); log them and send a
        // generic body instead.
        let message = match &self {
            SchedulingError::Database(err) => {
                error!("Database failure: {err}");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
