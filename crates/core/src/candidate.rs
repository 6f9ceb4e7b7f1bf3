//! Candidate-matching predicates and limits for catalog search.
//!
//! The pipeline's candidate selection runs two passes over active catalog
//! rows: a structured pass built from these predicates, and a textual
//! fallback over the query's derived search terms when the structured pass
//! finds too few candidates. Both passes share the hard budget filter.

use crate::attributes::{non_empty, norm, VisualAttributes};

/// Cap on the candidate set handed to the scorer, bounding scoring cost.
pub const CANDIDATE_LIMIT: usize = 100;

/// Below this many structured-pass candidates the textual fallback runs.
pub const MIN_STRUCTURED_CANDIDATES: usize = 3;

// ---------------------------------------------------------------------------
// Structured predicates
// ---------------------------------------------------------------------------

/// Whether the two sides describe the same kind of garment.
///
/// `item_type` and `category` are pooled on each side so "pants" matches a
/// candidate categorized as "pants". Requires a real descriptor on both
/// sides; a candidate with neither never structurally matches.
pub fn types_match(a: &VisualAttributes, b: &VisualAttributes) -> bool {
    let terms = |attrs: &VisualAttributes| -> Vec<String> {
        [&attrs.item_type, &attrs.category]
            .into_iter()
            .filter_map(non_empty)
            .map(norm)
            .collect()
    };
    let a_terms = terms(a);
    let b_terms = terms(b);
    a_terms.iter().any(|t| b_terms.contains(t))
}

/// Whether primary colors are compatible: either side missing color data,
/// or at least one shared color.
pub fn colors_compatible(a: &VisualAttributes, b: &VisualAttributes) -> bool {
    let colors = |attrs: &VisualAttributes| -> Vec<String> {
        attrs
            .primary_colors
            .iter()
            .map(|c| norm(c))
            .filter(|c| !c.is_empty())
            .collect()
    };
    let a_colors = colors(a);
    let b_colors = colors(b);
    if a_colors.is_empty() || b_colors.is_empty() {
        return true;
    }
    a_colors.iter().any(|c| b_colors.contains(c))
}

/// Whether silhouettes are compatible: either side absent, or equal after
/// case normalization.
pub fn silhouette_compatible(a: &VisualAttributes, b: &VisualAttributes) -> bool {
    match (non_empty(&a.silhouette), non_empty(&b.silhouette)) {
        (Some(a), Some(b)) => norm(a) == norm(b),
        _ => true,
    }
}

/// The structured-pass predicate over a query/candidate pair.
pub fn is_structural_match(query: &VisualAttributes, candidate: &VisualAttributes) -> bool {
    types_match(query, candidate)
        && colors_compatible(query, candidate)
        && silhouette_compatible(query, candidate)
}

// ---------------------------------------------------------------------------
// Textual fallback
// ---------------------------------------------------------------------------

/// Case-insensitive containment of any query term in the listing's title or
/// description. Terms are expected pre-lowercased
/// (see [`VisualAttributes::query_terms`]).
pub fn text_contains_any(terms: &[String], title: &str, description: Option<&str>) -> bool {
    if terms.is_empty() {
        return false;
    }
    let haystack = match description {
        Some(desc) => format!("{} {}", title.to_lowercase(), desc.to_lowercase()),
        None => title.to_lowercase(),
    };
    terms.iter().any(|term| haystack.contains(term.as_str()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
