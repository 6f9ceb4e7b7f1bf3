//! Vision model client for garment attribute extraction.
//!
//! Wraps an OpenAI-compatible chat-completions endpoint behind the
//! [`extractor::AttributeExtractor`] trait, turning a query image (and an
//! optional crop region) into structured [`cura_core::attributes::VisualAttributes`].

pub mod client;
pub mod extractor;
pub mod probe;

pub use client::{VisionClient, VisionConfig, VisionError};
pub use extractor::{AttributeExtractor, ExtractionRequest, VisionExtractor};
