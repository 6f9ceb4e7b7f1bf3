//! The visual search pipeline.
//!
//! Drives one session from submission to a terminal state: extract
//! attributes from the query image, select catalog candidates, score them,
//! gate the results, and persist what clears the bar. Every status change
//! goes through the session state machine in `cura-db`.

pub mod candidates;
pub mod error;
pub mod session;

pub use error::PipelineError;
pub use session::SearchPipeline;
