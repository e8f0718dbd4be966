pub mod comments;
pub mod entries;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entries                    list (GET), create (POST)
/// /entries/assign             batch assign (PUT)
/// /entries/unassign           batch unassign (PUT)
/// /entries/{id}/status        status change (PUT)
///
/// /comments                   list (GET), create (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/entries", entries::router())
        .nest("/comments", comments::router())
}
