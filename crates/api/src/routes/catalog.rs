//! Route definitions for the catalog ingestion interface.
//!
//! ```text
//! /catalog/items                                       bulk upsert (PUT)
//! /catalog/items/{platform}/{external_id}/deactivate   soft delete (POST)
//! ```

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", put(catalog::upsert_items))
        .route(
            "/items/{platform}/{external_id}/deactivate",
            post(catalog::deactivate_item),
        )
}
