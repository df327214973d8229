//! Conversion of raw recognizer lines into [`FridgeItem`]s.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::item::{FridgeItem, IdSequence};

/// Separator between item name and expiration phrase in a raw line.
pub const DELIMITER: &str = " | ";

/// Result of ingesting one recognition batch.
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
    pub items: Vec<FridgeItem>,
    /// Number of lines that lacked the delimiter.
    pub malformed: usize,
}

/// Split a raw `"name | phrase"` line.
///
/// Only the first delimiter splits; anything after it stays in the phrase.
/// A line without the delimiter becomes a name-only item.
pub fn split_line(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once(DELIMITER) {
        Some((name, phrase)) => (name, Some(phrase)),
        None => (raw, None),
    }
}

/// Build a fresh item list from raw recognizer lines, all created at `now`.
pub fn ingest<S: AsRef<str>>(raw_items: &[S], now: DateTime<Utc>, ids: &mut IdSequence) -> IngestBatch {
    let mut batch = IngestBatch {
        items: Vec::with_capacity(raw_items.len()),
        malformed: 0,
    };

    for (index, raw) in raw_items.iter().enumerate() {
        let raw = raw.as_ref();
        let (name, phrase) = split_line(raw);
        if phrase.is_none() {
            warn!(index, line = raw, "recognized line has no ' | ' delimiter, keeping it as a name");
            batch.malformed += 1;
        }
        let id = ids.next_id(name);
        batch
            .items
            .push(FridgeItem::new(id, name, phrase.map(str::to_string), now));
    }

    batch
}
