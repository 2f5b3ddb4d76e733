//! Substring query engine over a loaded collection.

use crate::domain::{Collection, Record};

/// Answers substring queries against a read-only [`Collection`].
///
/// Every query is a full scan. The engine holds no mutable state, so a
/// single instance (or cheap clones of it) can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    collection: Collection,
}

impl QueryEngine {
    /// Create an engine over a collection
    pub fn new(collection: Collection) -> Self {
        Self { collection }
    }

    /// Records whose title or content contains `query`, in collection order.
    ///
    /// Matching is case-sensitive and exact. An empty query matches every
    /// record. A record matching on both fields is returned once.
    pub fn search(&self, query: &str) -> Vec<&Record> {
        self.collection
            .iter()
            .filter(|record| record.matches(query))
            .collect()
    }

    /// Like [`search`](Self::search), but returns owned records
    pub fn search_owned(&self, query: &str) -> Vec<Record> {
        self.search(query).into_iter().cloned().collect()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Get the number of searchable records
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Check if there is nothing to search
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

impl From<Collection> for QueryEngine {
    fn from(collection: Collection) -> Self {
        Self::new(collection)
    }
}
