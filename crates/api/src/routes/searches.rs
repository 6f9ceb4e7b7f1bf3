//! Route definitions for visual search sessions.
//!
//! ```text
//! /searches                submit (POST, 202), list own sessions (GET)
//! /searches/{id}           session status (GET, owner-scoped)
//! /searches/{id}/results   curated results (GET, owner-scoped)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::visual_search;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(visual_search::list_searches).post(visual_search::submit_search),
        )
        .route("/{id}", get(visual_search::get_search))
        .route("/{id}/results", get(visual_search::get_search_results))
}
