//! Pipeline error types.

use cura_core::types::DbId;
use cura_vision::VisionError;

/// Errors from running a search session through the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Attribute extraction failed; the session is marked `failed` and can
    /// be retried by submitting again.
    #[error("Attribute extraction failed: {0}")]
    Extraction(#[from] VisionError),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The session was not in the expected state, typically because a
    /// concurrent run of the same session got there first.
    #[error("Search {id} is not in state {expected}")]
    StaleSession { id: DbId, expected: &'static str },

    /// The session row disappeared mid-run.
    #[error("Search {0} not found")]
    SessionNotFound(DbId),
}
