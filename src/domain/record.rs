//! Catalog records as they appear in the dataset.
//!
//! One record per JSONL line. Every field is optional on the wire: a missing
//! key or an explicit `null` leaves the field at its zero value. Keys match
//! field names case-insensitively, and when a key repeats the last non-null
//! value wins.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A single catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Identifier (not checked for uniqueness)
    pub id: i64,

    /// Primary search field
    pub title: String,

    /// Secondary search field
    pub content: String,

    /// Thumbnail URL, carried through untouched
    pub thumb_url: String,

    pub tags: Vec<String>,

    /// Unix timestamp in seconds
    pub updated_at: i64,

    pub image_urls: Vec<String>,
}

impl Record {
    /// Create a record with the two searchable fields set
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Parse a single JSONL line holding exactly one JSON object
    pub fn from_json_line(line: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(line)
    }

    /// Case-sensitive substring match against title or content.
    ///
    /// The empty query matches every record.
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.content.contains(query)
    }

    /// `updated_at` as a UTC timestamp, if it is in chrono's representable range
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.updated_at, 0)
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the update timestamp
    pub fn with_updated_at(mut self, updated_at: i64) -> Self {
        self.updated_at = updated_at;
        self
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Walks object entries in order so repeated keys overwrite earlier ones
struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Record, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = Record::default();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("id") {
                assign(&mut map, &mut record.id)?;
            } else if key.eq_ignore_ascii_case("title") {
                assign(&mut map, &mut record.title)?;
            } else if key.eq_ignore_ascii_case("content") {
                assign(&mut map, &mut record.content)?;
            } else if key.eq_ignore_ascii_case("thumb_url") {
                assign(&mut map, &mut record.thumb_url)?;
            } else if key.eq_ignore_ascii_case("tags") {
                assign(&mut map, &mut record.tags)?;
            } else if key.eq_ignore_ascii_case("updated_at") {
                assign(&mut map, &mut record.updated_at)?;
            } else if key.eq_ignore_ascii_case("image_urls") {
                assign(&mut map, &mut record.image_urls)?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(record)
    }
}

/// Read the next value into `slot`; `null` leaves the slot untouched
fn assign<'de, A, T>(map: &mut A, slot: &mut T) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    if let Some(value) = map.next_value::<Option<T>>()? {
        *slot = value;
    }
    Ok(())
}
