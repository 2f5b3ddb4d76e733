//! gzsearch - substring search over a gzip-compressed JSONL catalog
//!
//! The dataset is loaded into memory once at startup and then queried
//! read-only for the life of the process.
//!
//! # Architecture
//!
//! - Loading decompresses the file and parses one record per line. Lines
//!   that are not valid records are counted and skipped; only an unreadable
//!   file or a broken gzip stream fails the load.
//! - Searching is a full scan returning every record whose title or content
//!   contains the query, in load order.
//!
//! # Modules
//!
//! - `domain`: Data structures (Record, Collection)
//! - `core`: Loader and QueryEngine
//! - `config`: Layered configuration (flags, env, config file, defaults)
//! - `server`: HTTP transport (axum)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Serve the search API on port 3000
//! gzsearch serve --data data.gz
//!
//! # One-off search
//! gzsearch search "Blue" --data data.gz
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;

// Re-export main types at crate root for convenience
pub use core::{
    LoadError, LoadErrorKind, LoadOutcome, LoadStats, Loader, LoaderOptions, QueryEngine,
};
pub use domain::{Collection, Record};
