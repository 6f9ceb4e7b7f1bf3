//! Candidate selection over active catalog items.
//!
//! Two passes: a structured pass on extracted attributes, then a textual
//! fallback over the query's derived search terms when the structured pass
//! finds fewer than [`MIN_STRUCTURED_CANDIDATES`]. The fallback is a union,
//! not a replacement, so structured hits always survive. The caller has
//! already applied the budget filter in SQL.

use cura_core::attributes::VisualAttributes;
use cura_core::candidate::{
    is_structural_match, text_contains_any, CANDIDATE_LIMIT, MIN_STRUCTURED_CANDIDATES,
};
use cura_db::models::catalog::CatalogItem;

/// Select candidate items for scoring, in stable catalog order, capped at
/// [`CANDIDATE_LIMIT`].
pub fn select_candidates<'a>(
    query: &VisualAttributes,
    items: &'a [CatalogItem],
) -> Vec<&'a CatalogItem> {
    let mut selected: Vec<&CatalogItem> = items
        .iter()
        .filter(|item| is_structural_match(query, &item.attributes.0))
        .collect();

    if selected.len() < MIN_STRUCTURED_CANDIDATES {
        let terms = query.query_terms();
        for item in items {
            if selected.iter().any(|s| s.id == item.id) {
                continue;
            }
            if text_contains_any(&terms, &item.title, item.description.as_deref()) {
                selected.push(item);
            }
        }
    }

    selected.truncate(CANDIDATE_LIMIT);
    selected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
