//! The match gate: thresholding scored candidates into curated results.
//!
//! A fixed acceptance threshold separates curated matches from noise.
//! Candidates below the bar are never surfaced, even when nothing clears
//! it — an empty accepted set is a `no_matches` outcome that triggers the
//! human-sourcing hand-off on the product side. The threshold trades
//! recall for precision and is a product decision, not a tuning knob.

use std::cmp::Ordering;

use crate::search_status::{STATUS_COMPLETED, STATUS_NO_MATCHES};

/// Minimum similarity score a candidate must reach to be accepted.
pub const MATCH_THRESHOLD: f64 = 0.75;

/// Maximum number of accepted results persisted per session.
pub const MAX_ACCEPTED_RESULTS: usize = 20;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A candidate item paired with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<T> {
    pub score: f64,
    pub item: T,
}

/// Terminal outcome of the gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// At least one candidate cleared the threshold.
    Completed,
    /// Nothing cleared the threshold (or there were no candidates at all).
    NoMatches,
}

impl GateOutcome {
    /// The session status string this outcome maps to.
    pub fn status(self) -> &'static str {
        match self {
            GateOutcome::Completed => STATUS_COMPLETED,
            GateOutcome::NoMatches => STATUS_NO_MATCHES,
        }
    }
}

/// The gate's decision over a scored candidate list.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision<T> {
    /// Accepted candidates, sorted by score descending, capped at
    /// [`MAX_ACCEPTED_RESULTS`].
    pub accepted: Vec<ScoredCandidate<T>>,
    pub outcome: GateOutcome,
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Apply the acceptance threshold to a scored candidate list.
///
/// Pure and idempotent: the same input always yields the same accepted set
/// in the same order. Ties keep their input order (stable sort).
pub fn apply_gate<T>(scored: Vec<ScoredCandidate<T>>) -> GateDecision<T> {
    let mut accepted: Vec<ScoredCandidate<T>> = scored
        .into_iter()
        .filter(|c| c.score >= MATCH_THRESHOLD)
        .collect();

    accepted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    accepted.truncate(MAX_ACCEPTED_RESULTS);

    let outcome = if accepted.is_empty() {
        GateOutcome::NoMatches
    } else {
        GateOutcome::Completed
    };

    GateDecision { accepted, outcome }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
