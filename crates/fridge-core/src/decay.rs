//! Natural decay of shelf-life.
//!
//! Each item loses one day of shelf-life per whole 24-hour period since it
//! was ingested. Decay is expressed as a *floor* on the item's adjustment:
//! reconciliation only ever lowers an adjustment down to that floor, so a
//! pass is idempotent and safe to run as often as the caller likes.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::expiration;
use crate::item::FridgeItem;

pub const MS_PER_DAY: i64 = 86_400_000;

/// Whole days between `created_at` and `now`. Never negative.
pub fn days_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - created_at).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    elapsed_ms / MS_PER_DAY
}

/// Most negative adjustment that elapsed time alone justifies.
pub fn natural_floor(item: &FridgeItem, now: DateTime<Utc>) -> i64 {
    -days_elapsed(item.created_at, now)
}

/// Lower the item's adjustment to its natural floor if it sits above it.
///
/// Items without an embedded day count are display-only and left alone.
/// Returns `true` when the adjustment changed.
pub fn reconcile(item: &mut FridgeItem, now: DateTime<Utc>) -> bool {
    if item
        .base_expiration
        .as_deref()
        .and_then(expiration::parse)
        .is_none()
    {
        return false;
    }

    let floor = natural_floor(item, now);
    if item.adjustment > floor {
        debug!(id = %item.id, from = item.adjustment, to = floor, "natural decay");
        item.adjustment = floor;
        true
    } else {
        false
    }
}

/// Reconcile every item in place. Returns how many changed.
pub fn reconcile_all(items: &mut [FridgeItem], now: DateTime<Utc>) -> usize {
    items
        .iter_mut()
        .map(|item| reconcile(item, now))
        .filter(|changed| *changed)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiration::display;
    use chrono::Duration;
    use proptest::prelude::*;

    fn item_created(created_at: DateTime<Utc>) -> FridgeItem {
        FridgeItem::new("Milk-0", "Milk", Some("5 days".into()), created_at)
    }

    #[test]
    fn days_elapsed_floors_partial_days() {
        let t = Utc::now();
        assert_eq!(days_elapsed(t, t), 0);
        assert_eq!(days_elapsed(t, t + Duration::hours(23)), 0);
        assert_eq!(days_elapsed(t, t + Duration::hours(24)), 1);
        assert_eq!(days_elapsed(t, t + Duration::hours(71)), 2);
    }

    #[test]
    fn days_elapsed_clamps_clock_skew() {
        let t = Utc::now();
        assert_eq!(days_elapsed(t, t - Duration::days(3)), 0);
    }

    #[test]
    fn reconcile_applies_elapsed_days() {
        let now = Utc::now();
        let mut item = item_created(now - Duration::days(3));

        assert!(reconcile(&mut item, now));
        assert_eq!(item.adjustment, -3);
        assert_eq!(display(&item), "2 days");
    }

    #[test]
    fn reconcile_leaves_lower_adjustment_alone() {
        let now = Utc::now();
        let mut item = item_created(now - Duration::days(1));
        item.adjustment = -4;

        assert!(!reconcile(&mut item, now));
        assert_eq!(item.adjustment, -4);
    }

    #[test]
    fn reconcile_skips_display_only_items() {
        let now = Utc::now();
        let mut item = item_created(now - Duration::days(10));
        item.base_expiration = Some("a while".into());
        assert!(!reconcile(&mut item, now));
        assert_eq!(item.adjustment, 0);

        item.base_expiration = None;
        assert!(!reconcile(&mut item, now));
    }

    #[test]
    fn reconcile_all_counts_changes_and_is_idempotent() {
        let now = Utc::now();
        let mut items = vec![
            item_created(now - Duration::days(2)),
            item_created(now),
            item_created(now - Duration::days(5)),
        ];

        assert_eq!(reconcile_all(&mut items, now), 2);
        let snapshot = items.clone();
        assert_eq!(reconcile_all(&mut items, now), 0);
        assert_eq!(items, snapshot);
    }

    proptest! {
        #[test]
        fn decay_is_monotonic(
            start_adj in -50i64..50,
            steps in proptest::collection::vec(0i64..200, 1..20),
        ) {
            let created = Utc::now();
            let mut item = item_created(created);
            item.adjustment = start_adj;

            let mut now = created;
            let mut last = item.adjustment;
            for hours in steps {
                now += Duration::hours(hours);
                reconcile(&mut item, now);
                prop_assert!(item.adjustment <= last);
                prop_assert!(item.adjustment <= natural_floor(&item, now));
                last = item.adjustment;
            }
        }

        #[test]
        fn reconcile_all_twice_equals_once(
            ages in proptest::collection::vec(0i64..5_000, 0..10),
            adjs in proptest::collection::vec(-20i64..20, 10),
        ) {
            let now = Utc::now();
            let mut items: Vec<FridgeItem> = ages
                .iter()
                .zip(adjs.iter())
                .map(|(age, adj)| {
                    let mut it = item_created(now - Duration::hours(*age));
                    it.adjustment = *adj;
                    it
                })
                .collect();

            reconcile_all(&mut items, now);
            let once = items.clone();
            reconcile_all(&mut items, now);
            prop_assert_eq!(items, once);
        }
    }
}
