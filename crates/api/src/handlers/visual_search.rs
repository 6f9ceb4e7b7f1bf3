//! Handlers for visual search sessions.
//!
//! Submission is asynchronous: the handler validates, creates the session
//! row, spawns the pipeline run on a background task, and returns 202 with
//! the `pending` session. Clients poll the status endpoints. All endpoints
//! are owner-scoped through [`CurrentUser`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cura_core::attributes::PriceBudget;
use cura_core::crop::CropRect;
use cura_core::error::CoreError;
use cura_core::types::DbId;
use cura_db::models::search_result::SearchResult;
use cura_db::models::visual_search::CreateVisualSearch;
use cura_db::repositories::{SearchResultRepo, VisualSearchRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/searches`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitSearchRequest {
    /// Publicly fetchable URL of the query image.
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: String,
    /// Opaque reference to a stored inspiration image.
    pub source_image_id: Option<String>,
    /// Normalized crop rectangle scoping extraction to one garment.
    pub crop: Option<CropRect>,
    /// Optional hard price window for candidate search.
    pub budget: Option<PriceBudget>,
}

/// Body of `GET /api/v1/searches/{id}/results`.
#[derive(Debug, Serialize)]
pub struct SearchResultsResponse {
    /// Current session status; `completed` and `no_matches` are final.
    pub status: String,
    /// Curated results, best match first. Empty unless `completed`.
    pub results: Vec<SearchResult>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/searches
///
/// Validate, create the session, and kick off the pipeline in the
/// background. Invalid input is rejected before any row is created.
pub async fn submit_search(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitSearchRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    if let Some(crop) = &input.crop {
        crop.validate().map_err(AppError::Core)?;
    }
    if let Some(budget) = &input.budget {
        budget.validate().map_err(AppError::Core)?;
    }

    let session = state
        .pipeline
        .submit(&CreateVisualSearch {
            user_id: user.id,
            image_url: input.image_url,
            source_image_id: input.source_image_id,
            crop: input.crop,
            budget: input.budget,
        })
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    // Fire and forget; clients poll for the outcome. The pipeline records
    // its own failures on the session row.
    let pipeline = Arc::clone(&state.pipeline);
    let search_id = session.id;
    tokio::spawn(async move {
        if let Err(err) = pipeline.run(search_id).await {
            tracing::error!(search_id, error = %err, "Search pipeline run failed");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: session })))
}

/// GET /api/v1/searches
///
/// List the caller's sessions, newest first.
pub async fn list_searches(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sessions = VisualSearchRepo::list_by_user(&state.pool, &user.id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/searches/{id}
///
/// Session status projection. Another user's session reads as 404, not 403,
/// so session ids leak nothing.
pub async fn get_search(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = VisualSearchRepo::find_for_user(&state.pool, id, &user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Search",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// GET /api/v1/searches/{id}/results
///
/// The session's curated results alongside its status, best match first.
pub async fn get_search_results(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = VisualSearchRepo::find_for_user(&state.pool, id, &user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Search",
            id,
        }))?;

    let results = SearchResultRepo::list_by_search(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: SearchResultsResponse {
            status: session.status,
            results,
        },
    }))
}
