// Internal modules - not part of public API
pub(crate) mod cancel;
pub(crate) mod config;
pub(crate) mod discovery;
pub(crate) mod evaluator;
pub(crate) mod resolver;
pub(crate) mod stats;

// Public API - curated exports only
pub mod api;

// Re-export key items at module level for convenience
pub use api::*;
