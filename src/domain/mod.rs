//! Domain types for the catalog.
//!
//! - Record: One catalog entry, deserialized from a JSONL line
//! - Collection: The ordered, read-only set of loaded records

pub mod collection;
pub mod record;

pub use collection::Collection;
pub use record::Record;
