//! Route definitions for the entries resource.
//!
//! Mounted at `/entries` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::entries;
use crate::state::AppState;

/// Entry routes.
///
/// ```text
/// GET  /              -> list_entries
/// POST /              -> create_entry
/// PUT  /assign        -> assign_entries
/// PUT  /unassign      -> unassign_entries
/// PUT  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entries::list_entries).post(entries::create_entry))
        .route("/assign", put(entries::assign_entries))
        .route("/unassign", put(entries::unassign_entries))
        .route("/{id}/status", put(entries::update_status))
}
