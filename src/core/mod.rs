//! Core search logic.
//!
//! This module contains:
//! - Loader: Decompresses and parses the dataset into a Collection
//! - QueryEngine: Substring search over a loaded Collection

pub mod loader;
pub mod query;

// Re-export commonly used types
pub use loader::{
    LoadError, LoadErrorKind, LoadOutcome, LoadStats, Loader, LoaderOptions,
    DEFAULT_MAX_LINE_BYTES,
};
pub use query::QueryEngine;
