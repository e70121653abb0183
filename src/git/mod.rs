pub mod error;
pub mod exclude;
pub mod operations;
pub mod repository;
pub mod status;

pub mod api;

// Re-export commonly used items
pub use api::*;
