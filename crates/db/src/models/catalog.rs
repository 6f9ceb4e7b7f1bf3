//! Catalog item models and ingestion DTOs.

use cura_core::attributes::VisualAttributes;
use cura_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `catalog_items` table: one marketplace listing snapshot,
/// independent of the listing's live status on the originating platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItem {
    pub id: DbId,
    pub platform: String,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    /// Deep link to the listing on the originating marketplace.
    pub item_url: String,
    pub image_url: Option<String>,
    pub size_label: Option<String>,
    pub condition: Option<String>,
    pub attributes: Json<VisualAttributes>,
    /// Soft-delete flag; inactive items never appear in candidate search.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the bulk ingestion upsert, keyed on `(platform, external_id)`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertCatalogItem {
    pub platform: String,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: Option<String>,
    pub item_url: String,
    pub image_url: Option<String>,
    pub size_label: Option<String>,
    pub condition: Option<String>,
    pub attributes: Option<VisualAttributes>,
}
