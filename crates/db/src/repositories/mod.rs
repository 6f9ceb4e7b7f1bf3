//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_item_repo;
pub mod search_result_repo;
pub mod visual_search_repo;

pub use catalog_item_repo::CatalogItemRepo;
pub use search_result_repo::SearchResultRepo;
pub use visual_search_repo::VisualSearchRepo;
