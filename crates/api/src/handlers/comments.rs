//! Handlers for the `/comments` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use biograph_core::comment::validate_comment_body;
use biograph_db::models::comment::CreateComment;
use biograph_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/comments
///
/// List every comment in creation order. The client groups them by entry.
pub async fn list_comments(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let comments = CommentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/comments
///
/// Insert a new comment. The body, commenter name, and commenter id are
/// required; `posted_at` is stored exactly as the client formatted it.
pub async fn create_comment(
    State(state): State<AppState>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_comment_body(&input.body).map_err(AppError::BadRequest)?;
    if input.commenter.trim().is_empty() || input.commenter_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "commenter and commenter_id are required".into(),
        ));
    }

    let comment = CommentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        comment_id = comment.id,
        entry_id = comment.entry_id,
        commenter_id = %comment.commenter_id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
