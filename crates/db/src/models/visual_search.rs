//! Visual search session models and DTOs.

use cura_core::attributes::{PriceBudget, VisualAttributes};
use cura_core::crop::CropRect;
use cura_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `visual_searches` table: one user-initiated search
/// session tracked through the status state machine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisualSearch {
    pub id: DbId,
    /// Subject identifier resolved by the external identity provider.
    pub user_id: String,
    /// Publicly fetchable URL of the query image.
    pub image_url: String,
    /// Opaque reference to the stored inspiration image, when the search
    /// was started from one.
    pub source_image_id: Option<String>,
    /// Normalized crop rectangle, when extraction was scoped to a region.
    pub crop: Option<Json<CropRect>>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub status: String,
    /// Extracted [`VisualAttributes`], set once analysis succeeds.
    pub analysis_data: Option<Json<VisualAttributes>>,
    /// Failure cause, populated only for `failed` sessions.
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VisualSearch {
    /// The price budget supplied at submission, if any bound was set.
    pub fn budget(&self) -> Option<PriceBudget> {
        if self.budget_min.is_none() && self.budget_max.is_none() {
            return None;
        }
        Some(PriceBudget {
            min: self.budget_min,
            max: self.budget_max,
        })
    }
}

/// DTO for creating a session row (always starts in `pending`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVisualSearch {
    pub user_id: String,
    pub image_url: String,
    pub source_image_id: Option<String>,
    pub crop: Option<CropRect>,
    pub budget: Option<PriceBudget>,
}
