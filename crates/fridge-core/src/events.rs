use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in a session produces an Event.
/// Front ends print or forward them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhotoCaptured {
        path: String,
        at: DateTime<Utc>,
    },
    /// A recognition result replaced the item list.
    ItemsIngested {
        count: usize,
        /// Lines that lacked the `" | "` delimiter.
        malformed: usize,
        at: DateTime<Utc>,
    },
    /// A reconciliation pass lowered at least one adjustment.
    ItemsDecayed {
        changed: usize,
        at: DateTime<Utc>,
    },
    ItemAdjusted {
        id: String,
        adjustment: i64,
        display: String,
        at: DateTime<Utc>,
    },
}
