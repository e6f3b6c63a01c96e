//! First-business-day month anchors for partitioned historical pulls.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::TesseraError;

/// First Monday-to-Friday day of the given month.
///
/// Weekend-aware only; exchange holidays are not consulted, matching the
/// upstream snapshots these anchors address.
#[must_use]
pub fn first_business_day(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let shift = match first.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    first.checked_add_days(Days::new(shift))
}

/// Walk backward from `today`'s month, one calendar month at a time, and
/// return the first business day of each month visited.
///
/// The result has exactly `months_back + 1` entries, starts with the current
/// month, is strictly decreasing, and decrements the year when the walk
/// wraps from January into the previous December. Deterministic: the same
/// inputs always produce the same sequence.
///
/// # Errors
/// Returns `TesseraError::InvalidArg` if the walk leaves the representable
/// calendar range.
pub fn month_anchors(today: NaiveDate, months_back: u32) -> Result<Vec<NaiveDate>, TesseraError> {
    let mut year = today.year();
    let mut month = today.month();
    let mut anchors = Vec::with_capacity(months_back as usize + 1);
    for _ in 0..=months_back {
        let anchor = first_business_day(year, month).ok_or_else(|| {
            TesseraError::InvalidArg(format!("calendar range exceeded at {year}-{month:02}"))
        })?;
        anchors.push(anchor);
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    Ok(anchors)
}
