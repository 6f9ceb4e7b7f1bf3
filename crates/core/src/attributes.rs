//! Structured visual attributes describing a garment.
//!
//! The same schema is produced by the attribute extractor for a query image
//! and carried on every catalog item, so the scorer compares like with like.
//! Every field is optional; see [`VisualAttributes::is_scorable`] for the
//! minimum an entity needs before it can participate in matching.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search queries
// ---------------------------------------------------------------------------

/// Textual queries derived from the structured attributes.
///
/// Used by the candidate-search fallback pass when structured matching
/// yields too few candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQueries {
    /// Best single query for the item (e.g. "khaki linen wide-leg trousers").
    pub primary: Option<String>,
    /// Broader query to fall back to (e.g. "linen trousers").
    pub fallback: Option<String>,
    /// Individual keywords usable for containment matching.
    pub keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// VisualAttributes
// ---------------------------------------------------------------------------

/// Structured description of a garment, extracted by the vision model and
/// stored as JSONB on catalog items and search sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualAttributes {
    /// Broad classification (e.g. "pants", "dress").
    pub item_type: Option<String>,
    /// Finer classification (e.g. "wide-leg trousers").
    pub category: Option<String>,
    /// Material (e.g. "linen", "denim").
    pub fabric_type: Option<String>,
    /// Texture descriptor (e.g. "slubbed", "brushed").
    pub fabric_texture: Option<String>,
    /// Color names ordered by visual prominence; first entry is dominant.
    pub primary_colors: Vec<String>,
    /// Pattern descriptor (solid, textured, herringbone, ...).
    pub pattern: Option<String>,
    pub silhouette: Option<String>,
    pub sleeve_type: Option<String>,
    pub neckline_collar: Option<String>,
    pub length: Option<String>,
    /// Style era (e.g. "90s", "y2k").
    pub era: Option<String>,
    /// Comma-joinable style tags (e.g. "minimalist, coastal").
    pub aesthetic: Option<String>,
    /// Short free-text notes on distinctive details.
    pub distinctive_features: Vec<String>,
    /// Full natural-language description; scorer fallback input and display.
    pub text_description: Option<String>,
    /// Derived textual queries for the candidate-search fallback pass.
    pub search_queries: SearchQueries,
}

impl VisualAttributes {
    /// An entity is scorable iff it has at least an `item_type` or a
    /// `text_description`. Anything less carries no matchable signal.
    pub fn is_scorable(&self) -> bool {
        non_empty(&self.item_type).is_some() || non_empty(&self.text_description).is_some()
    }

    /// All non-empty textual query terms, lowercased, in priority order
    /// (primary, fallback, then keywords).
    pub fn query_terms(&self) -> Vec<String> {
        let q = &self.search_queries;
        let mut terms: Vec<String> = Vec::new();
        for t in [q.primary.as_deref(), q.fallback.as_deref()]
            .into_iter()
            .flatten()
            .chain(q.keywords.iter().map(String::as_str))
        {
            let t = t.trim();
            if !t.is_empty() {
                terms.push(t.to_lowercase());
            }
        }
        terms
    }
}

// ---------------------------------------------------------------------------
// Price budget
// ---------------------------------------------------------------------------

/// An optional price window supplied with a search request.
///
/// Applied as a hard filter during candidate search; never sent to the
/// vision model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBudget {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBudget {
    /// Whether a price falls inside the budget window (bounds inclusive).
    pub fn contains(&self, price: f64) -> bool {
        if let Some(min) = self.min {
            if price < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if price > max {
                return false;
            }
        }
        true
    }

    /// Validate bounds: non-negative, and `min <= max` when both present.
    pub fn validate(&self) -> Result<(), crate::error::CoreError> {
        use crate::error::CoreError;

        if self.min.is_some_and(|m| m < 0.0) || self.max.is_some_and(|m| m < 0.0) {
            return Err(CoreError::Validation(
                "budget bounds must be non-negative".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "budget min ({min}) must be <= max ({max})"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// Return a string option's trimmed contents, treating empty/whitespace-only
/// values as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Case-normalize a descriptor for comparison.
pub fn norm(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Split a comma-joined multi-tag field into normalized tags.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(norm)
        .filter(|t| !t.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
