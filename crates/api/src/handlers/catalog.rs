//! Handlers for the catalog ingestion interface.
//!
//! The external ingestion process pushes marketplace listing snapshots
//! through these endpoints; the search pipeline itself never writes to the
//! catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cura_core::error::CoreError;
use cura_db::models::catalog::UpsertCatalogItem;
use cura_db::repositories::CatalogItemRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /api/v1/catalog/items`.
#[derive(Debug, Deserialize)]
pub struct UpsertCatalogBatch {
    pub items: Vec<UpsertCatalogItem>,
}

/// PUT /api/v1/catalog/items
///
/// Bulk upsert keyed on `(platform, external_id)`. Re-ingesting a known
/// listing refreshes its snapshot and reactivates it.
pub async fn upsert_items(
    _user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertCatalogBatch>,
) -> AppResult<impl IntoResponse> {
    if input.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".into()));
    }
    for item in &input.items {
        if item.platform.trim().is_empty() || item.external_id.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "platform and external_id are required on every item".into(),
            )));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(AppError::Core(CoreError::Validation(format!(
                "price must be non-negative, got {} for {}",
                item.price, item.external_id
            ))));
        }
    }

    let saved = CatalogItemRepo::upsert_batch(&state.pool, &input.items).await?;
    tracing::info!(count = saved.len(), "Catalog items upserted");

    Ok(Json(DataResponse { data: saved }))
}

/// POST /api/v1/catalog/items/{platform}/{external_id}/deactivate
///
/// Soft-delete a listing (sold or stale on the source platform).
pub async fn deactivate_item(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path((platform, external_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let deactivated = CatalogItemRepo::deactivate(&state.pool, &platform, &external_id).await?;
    if !deactivated {
        return Err(AppError::NotFound(format!(
            "No catalog item {external_id} on {platform}"
        )));
    }

    tracing::info!(%platform, %external_id, "Catalog item deactivated");
    Ok(StatusCode::NO_CONTENT)
}
