pub mod catalog;
pub mod health;
pub mod searches;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /searches                                        submit (POST), list (GET)
/// /searches/{id}                                   session status (GET)
/// /searches/{id}/results                           curated results (GET)
///
/// /catalog/items                                   bulk upsert (PUT)
/// /catalog/items/{platform}/{external_id}/deactivate   soft delete (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/searches", searches::router())
        .nest("/catalog", catalog::router())
}
