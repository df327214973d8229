use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recognized food item with its adjustable shelf-life countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FridgeItem {
    pub id: String,
    pub name: String,
    /// Phrase as returned by the recognizer, e.g. `"5 days"`.
    /// `None` when the raw line had no `" | "` delimiter.
    pub base_expiration: Option<String>,
    /// Net days added (positive) or removed (negative) relative to the
    /// integer embedded in `base_expiration`.
    pub adjustment: i64,
    pub created_at: DateTime<Utc>,
}

impl FridgeItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_expiration: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_expiration,
            adjustment: 0,
            created_at,
        }
    }
}

/// Monotonic id source for one session.
///
/// Ids take the form `name-seq`, with `seq` counting up from 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, name: &str) -> String {
        let id = format!("{name}-{}", self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_starts_unadjusted() {
        let now = Utc::now();
        let item = FridgeItem::new("Milk-0", "Milk", Some("5 days".into()), now);
        assert_eq!(item.adjustment, 0);
        assert_eq!(item.created_at, now);
    }

    #[test]
    fn sequence_keeps_counting_across_calls() {
        let mut ids = IdSequence::new();
        assert_eq!(ids.next_id("Milk"), "Milk-0");
        assert_eq!(ids.next_id("Milk"), "Milk-1");
        assert_eq!(ids.next_id("Eggs"), "Eggs-2");
        assert_eq!(ids.next, 3);
    }
}
