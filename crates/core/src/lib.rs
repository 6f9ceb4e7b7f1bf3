//! Pure domain logic for the CURA visual search pipeline.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the pipeline orchestrator, and any future CLI or
//! worker tooling.

pub mod attributes;
pub mod candidate;
pub mod crop;
pub mod error;
pub mod gate;
pub mod scoring;
pub mod search_status;
pub mod types;
