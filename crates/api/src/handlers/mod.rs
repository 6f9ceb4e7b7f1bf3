pub mod catalog;
pub mod visual_search;
