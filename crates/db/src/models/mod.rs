//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write paths that exist for that entity

pub mod catalog;
pub mod search_result;
pub mod visual_search;
