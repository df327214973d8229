//! User-driven shelf-life corrections.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::decay::{days_elapsed, natural_floor};
use crate::item::FridgeItem;

/// How far above the natural floor a manual boost may go.
pub const MAX_BOOST_DAYS: i64 = 999;

/// Absolute lower bound on an adjustment.
pub const MIN_ADJUSTMENT: i64 = -999;

/// Apply `delta` days to the item's adjustment.
///
/// Increases are capped at `natural_floor + MAX_BOOST_DAYS`. Decreases may
/// go below the natural floor but never below [`MIN_ADJUSTMENT`].
pub fn adjust(item: &mut FridgeItem, delta: i64, now: DateTime<Utc>) {
    let floor = natural_floor(item, now);
    let candidate = item.adjustment.saturating_add(delta);
    let capped = candidate.min(floor + MAX_BOOST_DAYS).max(MIN_ADJUSTMENT);
    debug!(id = %item.id, delta, from = item.adjustment, to = capped, "manual adjustment");
    item.adjustment = capped;
}

/// Portion of the adjustment not explained by natural decay.
///
/// Positive when the user extended the item, negative when they shortened it.
pub fn manual_adjustment(item: &FridgeItem, now: DateTime<Utc>) -> i64 {
    item.adjustment + days_elapsed(item.created_at, now)
}
