//! Search session status constants and transition rules.
//!
//! A session moves strictly forward:
//!
//! ```text
//! pending -> analyzing -> searching -> completed
//!                                   -> no_matches
//! (any non-terminal) ---------------> failed
//! ```
//!
//! `completed`, `no_matches`, and `failed` are terminal. `failed` is
//! distinct from `no_matches`: an extractor or persistence failure is a
//! retriable error, while `no_matches` is a successful search that found
//! nothing worth curating.

/// Session row created, extractor not yet invoked.
pub const STATUS_PENDING: &str = "pending";
/// Vision-model extraction in flight.
pub const STATUS_ANALYZING: &str = "analyzing";
/// Attributes available; candidate search and scoring running.
pub const STATUS_SEARCHING: &str = "searching";
/// Accepted results persisted.
pub const STATUS_COMPLETED: &str = "completed";
/// Search succeeded but nothing cleared the match gate.
pub const STATUS_NO_MATCHES: &str = "no_matches";
/// Pipeline error; cause retained in `error_message`, retriable via a new
/// session.
pub const STATUS_FAILED: &str = "failed";

/// All valid session statuses.
pub const ALL_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_ANALYZING,
    STATUS_SEARCHING,
    STATUS_COMPLETED,
    STATUS_NO_MATCHES,
    STATUS_FAILED,
];

/// Returns `true` for statuses no session ever leaves.
pub fn is_terminal(status: &str) -> bool {
    matches!(
        status,
        STATUS_COMPLETED | STATUS_NO_MATCHES | STATUS_FAILED
    )
}

/// Whether `from -> to` is a legal (strictly forward) transition.
///
/// The repository layer enforces this again with a compare-and-set update,
/// so a concurrent observer can never see a status regression.
pub fn can_transition(from: &str, to: &str) -> bool {
    match (from, to) {
        (STATUS_PENDING, STATUS_ANALYZING) => true,
        (STATUS_ANALYZING, STATUS_SEARCHING) => true,
        (STATUS_SEARCHING, STATUS_COMPLETED) => true,
        (STATUS_SEARCHING, STATUS_NO_MATCHES) => true,
        (from, STATUS_FAILED) => !is_terminal(from) && ALL_STATUSES.contains(&from),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
