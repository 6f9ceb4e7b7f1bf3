//! Deterministic similarity scoring between two attribute sets.
//!
//! The score is a weighted attribute agreement in `[0, 1]`. For each
//! comparable field a per-field agreement in `[0, 1]` is computed (exact
//! case-normalized match for scalar fields, Jaccard overlap for set
//! fields). The final score is the weighted sum divided by the sum of
//! weights actually applied.
//!
//! Normalizing by applied weight rather than total weight is an explicit
//! policy: items with sparse attribute data are not penalized relative to
//! richly-tagged items. A field absent on either side simply does not vote.

use std::collections::BTreeSet;

use crate::attributes::{non_empty, norm, split_tags, VisualAttributes};

// ---------------------------------------------------------------------------
// Field weights
// ---------------------------------------------------------------------------

/// Weight for item type / category agreement.
pub const WEIGHT_ITEM_TYPE: f64 = 0.30;
/// Weight for primary color overlap.
pub const WEIGHT_COLORS: f64 = 0.20;
/// Weight for fabric type agreement.
pub const WEIGHT_FABRIC: f64 = 0.15;
/// Weight for silhouette agreement.
pub const WEIGHT_SILHOUETTE: f64 = 0.15;
/// Weight for pattern agreement.
pub const WEIGHT_PATTERN: f64 = 0.10;
/// Weight for era / aesthetic overlap.
pub const WEIGHT_STYLE: f64 = 0.10;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Compute the similarity score between two attribute sets.
///
/// Deterministic and symmetric: `score(a, b) == score(b, a)` for all
/// inputs, and `score(a, a) == 1.0` whenever `a` has at least one
/// comparable field. Returns `0.0` when the two sides share no comparable
/// fields at all.
pub fn score(a: &VisualAttributes, b: &VisualAttributes) -> f64 {
    let mut applied_weight = 0.0;
    let mut weighted_agreement = 0.0;

    let mut apply = |weight: f64, agreement: Option<f64>| {
        if let Some(s) = agreement {
            applied_weight += weight;
            weighted_agreement += weight * s;
        }
    };

    apply(WEIGHT_ITEM_TYPE, set_agreement(&type_terms(a), &type_terms(b)));
    apply(WEIGHT_COLORS, set_agreement(&color_set(a), &color_set(b)));
    apply(WEIGHT_FABRIC, exact_agreement(&a.fabric_type, &b.fabric_type));
    apply(
        WEIGHT_SILHOUETTE,
        exact_agreement(&a.silhouette, &b.silhouette),
    );
    apply(WEIGHT_PATTERN, exact_agreement(&a.pattern, &b.pattern));
    apply(WEIGHT_STYLE, set_agreement(&style_terms(a), &style_terms(b)));

    if applied_weight == 0.0 {
        0.0
    } else {
        weighted_agreement / applied_weight
    }
}

/// Build a short human-readable explanation of which fields agreed.
///
/// Returns `None` when nothing agreed (the candidate would not have cleared
/// the gate anyway, but the gate decides that, not this function).
pub fn explain_match(a: &VisualAttributes, b: &VisualAttributes) -> Option<String> {
    let mut agreed: Vec<&str> = Vec::new();

    if set_agreement(&type_terms(a), &type_terms(b)).is_some_and(|s| s > 0.0) {
        agreed.push("item type");
    }
    if set_agreement(&color_set(a), &color_set(b)).is_some_and(|s| s > 0.0) {
        agreed.push("colors");
    }
    if exact_agreement(&a.fabric_type, &b.fabric_type) == Some(1.0) {
        agreed.push("fabric");
    }
    if exact_agreement(&a.silhouette, &b.silhouette) == Some(1.0) {
        agreed.push("silhouette");
    }
    if exact_agreement(&a.pattern, &b.pattern) == Some(1.0) {
        agreed.push("pattern");
    }
    if set_agreement(&style_terms(a), &style_terms(b)).is_some_and(|s| s > 0.0) {
        agreed.push("style");
    }

    if agreed.is_empty() {
        None
    } else {
        Some(format!("Matched on {}", agreed.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// Per-field agreement
// ---------------------------------------------------------------------------

/// Exact case-normalized agreement for a scalar field.
///
/// `None` when the field is absent on either side (excluded from weight
/// normalization, not penalized).
fn exact_agreement(a: &Option<String>, b: &Option<String>) -> Option<f64> {
    let a = non_empty(a)?;
    let b = non_empty(b)?;
    Some(if norm(a) == norm(b) { 1.0 } else { 0.0 })
}

/// Jaccard agreement (`|intersection| / |union|`) for a set field.
///
/// `None` when either side's set is empty.
fn set_agreement(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    Some(intersection as f64 / union as f64)
}

/// Type descriptors for one side: the union of `item_type` and `category`.
///
/// Comparing the union (rather than field-by-field) lets "pants" on one
/// side agree with a "pants" category on the other.
fn type_terms(attrs: &VisualAttributes) -> BTreeSet<String> {
    [&attrs.item_type, &attrs.category]
        .into_iter()
        .filter_map(non_empty)
        .map(norm)
        .collect()
}

/// Normalized primary color set for one side.
fn color_set(attrs: &VisualAttributes) -> BTreeSet<String> {
    attrs
        .primary_colors
        .iter()
        .map(|c| norm(c))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Style terms for one side: the era plus comma-split aesthetic tags.
fn style_terms(attrs: &VisualAttributes) -> BTreeSet<String> {
    let mut terms: BTreeSet<String> = non_empty(&attrs.aesthetic)
        .map(split_tags)
        .unwrap_or_default()
        .into_iter()
        .collect();
    if let Some(era) = non_empty(&attrs.era) {
        terms.insert(norm(era));
    }
    terms
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::MATCH_THRESHOLD;

    fn trousers() -> VisualAttributes {
        VisualAttributes {
            item_type: Some("pants".to_string()),
            category: Some("wide-leg trousers".to_string()),
            fabric_type: Some("linen".to_string()),
            primary_colors: vec!["khaki".to_string()],
            pattern: Some("solid".to_string()),
            silhouette: Some("wide-leg".to_string()),
            era: Some("90s".to_string()),
            aesthetic: Some("minimalist, coastal".to_string()),
            ..Default::default()
        }
    }

    fn gown() -> VisualAttributes {
        VisualAttributes {
            item_type: Some("dress".to_string()),
            category: Some("evening gown".to_string()),
            fabric_type: Some("sequin".to_string()),
            primary_colors: vec!["red".to_string()],
            pattern: Some("sequined".to_string()),
            silhouette: Some("mermaid".to_string()),
            era: Some("y2k".to_string()),
            aesthetic: Some("glam".to_string()),
            ..Default::default()
        }
    }

    // -- reflexivity ---------------------------------------------------------

    #[test]
    fn identical_attributes_score_one() {
        let a = trousers();
        assert_eq!(score(&a, &a), 1.0);
    }

    #[test]
    fn identical_sparse_attributes_score_one() {
        let a = VisualAttributes {
            item_type: Some("pants".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&a, &a), 1.0);
    }

    // -- symmetry ------------------------------------------------------------

    #[test]
    fn score_is_symmetric() {
        let a = trousers();
        let b = VisualAttributes {
            item_type: Some("pants".to_string()),
            primary_colors: vec!["khaki".to_string(), "beige".to_string()],
            fabric_type: Some("linen".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    // -- disjoint attributes -------------------------------------------------

    #[test]
    fn fully_disjoint_attributes_score_below_threshold() {
        let s = score(&trousers(), &gown());
        assert_eq!(s, 0.0);
        assert!(s < MATCH_THRESHOLD);
    }

    // -- sparse-field policy -------------------------------------------------

    #[test]
    fn absent_fields_do_not_penalize() {
        // Candidate only carries an item type; it agrees, so the score is
        // 1.0 despite every other query field being unmatched.
        let query = trousers();
        let sparse = VisualAttributes {
            item_type: Some("pants".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&query, &sparse), 1.0);
    }

    #[test]
    fn no_comparable_fields_scores_zero() {
        let a = VisualAttributes {
            fabric_type: Some("linen".to_string()),
            ..Default::default()
        };
        let b = VisualAttributes {
            pattern: Some("solid".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&a, &b), 0.0);
    }

    // -- per-field behavior --------------------------------------------------

    #[test]
    fn item_type_matches_against_category() {
        let a = VisualAttributes {
            item_type: Some("Pants".to_string()),
            ..Default::default()
        };
        let b = VisualAttributes {
            category: Some("pants".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&a, &b), 1.0);
    }

    #[test]
    fn color_overlap_is_jaccard() {
        let a = VisualAttributes {
            primary_colors: vec!["khaki".to_string(), "white".to_string()],
            ..Default::default()
        };
        let b = VisualAttributes {
            primary_colors: vec!["khaki".to_string()],
            ..Default::default()
        };
        // |{khaki}| / |{khaki, white}| = 0.5, and colors are the only
        // applicable field.
        assert_eq!(score(&a, &b), 0.5);
    }

    #[test]
    fn partial_agreement_lands_between_zero_and_one() {
        let query = trousers();
        let candidate = VisualAttributes {
            item_type: Some("pants".to_string()),
            fabric_type: Some("cotton".to_string()),
            primary_colors: vec!["khaki".to_string()],
            ..Default::default()
        };
        let s = score(&query, &candidate);
        assert!(s > 0.0 && s < 1.0, "got {s}");
    }

    // -- explain_match -------------------------------------------------------

    #[test]
    fn explanation_lists_agreeing_fields() {
        let query = trousers();
        let candidate = VisualAttributes {
            item_type: Some("pants".to_string()),
            fabric_type: Some("linen".to_string()),
            primary_colors: vec!["khaki".to_string()],
            ..Default::default()
        };
        let explanation = explain_match(&query, &candidate).unwrap();
        assert_eq!(explanation, "Matched on item type, colors, fabric");
    }

    #[test]
    fn no_agreement_yields_no_explanation() {
        assert_eq!(explain_match(&trousers(), &gown()), None);
    }
}
