//! Error handling for the HTTP surface.
//!
//! Handlers return [`AppError`]; the [`IntoResponse`] impl turns every
//! variant into an [`ErrorBody`] with a real status code, so a handler
//! failure is never smuggled inside a 200. Database failures are
//! classified here in one place so handler code never matches on sqlx
//! internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use biograph_core::error::CoreError;

use crate::response::ErrorBody;

/// Handler return type.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain error from `biograph_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database failure from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request rejected before any query was issued.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Status code, stable error code, and client-safe message.
    ///
    /// Internal failures are logged in full here; only a generic message
    /// reaches the body.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                sanitized_internal()
            }
            AppError::Database(err) => classify(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn sanitized_internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a sqlx failure onto the response taxonomy.
///
/// `RowNotFound` answers 404. A foreign-key violation (Postgres 23503,
/// e.g. a comment aimed at an entry id that does not exist) answers 400.
/// Anything else is logged and answered with a sanitized 500.
fn classify(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Referenced row does not exist".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            sanitized_internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_answer_400() {
        let err = AppError::Core(CoreError::Validation("status is wrong".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "status is wrong");
    }

    #[test]
    fn not_found_carries_entity_and_id() {
        let err = AppError::Core(CoreError::NotFound {
            entity: "Entry",
            id: 7,
        });
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
        assert_eq!(message, "Entry with id 7 not found");
    }

    #[test]
    fn row_not_found_answers_404() {
        let (status, code, _) = AppError::Database(sqlx::Error::RowNotFound).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn unknown_database_failures_are_sanitized() {
        let (status, code, message) = AppError::Database(sqlx::Error::PoolTimedOut).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
        assert_eq!(message, "An internal error occurred");
    }
}
