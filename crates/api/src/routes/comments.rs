//! Route definitions for the comments resource.
//!
//! Mounted at `/comments` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Comment routes.
///
/// ```text
/// GET  /   -> list_comments
/// POST /   -> create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(comments::list_comments).post(comments::create_comment),
    )
}
