//! Search result models.

use cura_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::catalog::CatalogItem;

/// A row from the `search_results` table: a denormalized snapshot of one
/// accepted catalog item, immutable after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchResult {
    pub id: DbId,
    pub search_id: DbId,
    pub platform: String,
    pub item_url: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Similarity score in `[0, 1]` at match time.
    pub similarity_score: f64,
    pub match_explanation: Option<String>,
    pub created_at: Timestamp,
}

/// An accepted match waiting to be persisted for a session.
#[derive(Debug, Clone)]
pub struct NewSearchResult {
    pub platform: String,
    pub item_url: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub similarity_score: f64,
    pub match_explanation: Option<String>,
}

impl NewSearchResult {
    /// Snapshot a catalog item into a result row payload.
    pub fn from_match(item: &CatalogItem, score: f64, explanation: Option<String>) -> Self {
        Self {
            platform: item.platform.clone(),
            item_url: item.item_url.clone(),
            title: item.title.clone(),
            price: item.price,
            currency: item.currency.clone(),
            image_url: item.image_url.clone(),
            description: item.description.clone(),
            similarity_score: score,
            match_explanation: explanation,
        }
    }
}
