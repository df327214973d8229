//! Expiration phrase parsing and rendering.
//!
//! A phrase from the recognizer carries exactly one day count somewhere in
//! free text (`"5 days"`, `"about 3 days left"`). Everything outside the
//! first run of digits is preserved verbatim when the count is re-rendered.

use crate::item::FridgeItem;

/// Label shown instead of a count once effective days reach zero.
pub const EXPIRED_LABEL: &str = "Expired";

/// Byte range of the first maximal run of ASCII digits.
fn first_digit_run(phrase: &str) -> Option<(usize, usize)> {
    let start = phrase.find(|c: char| c.is_ascii_digit())?;
    let len = phrase[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(phrase.len() - start);
    Some((start, start + len))
}

/// Extract the first embedded integer, if any.
pub fn parse(phrase: &str) -> Option<i64> {
    let (start, end) = first_digit_run(phrase)?;
    phrase[start..end].parse().ok()
}

/// Replace the first embedded integer with `days`.
///
/// Returns the phrase unchanged when it has no digits.
pub fn render(phrase: &str, days: i64) -> String {
    match first_digit_run(phrase) {
        Some((start, end)) => format!("{}{}{}", &phrase[..start], days, &phrase[end..]),
        None => phrase.to_string(),
    }
}

/// Embedded day count plus the item's adjustment.
pub fn effective_days(item: &FridgeItem) -> Option<i64> {
    let base = parse(item.base_expiration.as_deref()?)?;
    Some(base.saturating_add(item.adjustment))
}

pub fn is_expired(item: &FridgeItem) -> bool {
    matches!(effective_days(item), Some(days) if days <= 0)
}

/// Text shown for the item's countdown.
pub fn display(item: &FridgeItem) -> String {
    let Some(phrase) = item.base_expiration.as_deref() else {
        return item.name.clone();
    };
    match effective_days(item) {
        None => phrase.to_string(),
        Some(days) if days <= 0 => EXPIRED_LABEL.to_string(),
        Some(days) => render(phrase, days),
    }
}
