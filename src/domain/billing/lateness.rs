//! Late-month counting for penalties

use chrono::{Datelike, NaiveDate};

/// Number of started months `on` lies past `due_date`.
///
/// Paying on or before the due date is 0. With a due date of Jan 20,
/// Jan 21 through Feb 20 count as 1 month, Feb 21 through Mar 20 as 2.
pub fn months_late(due_date: NaiveDate, on: NaiveDate) -> i32 {
    if on <= due_date {
        return 0;
    }

    let calendar_months = (on.year() - due_date.year()) * 12 + on.month() as i32
        - due_date.month() as i32;
    let completed = if on.day() <= due_date.day() {
        calendar_months - 1
    } else {
        calendar_months
    };

    completed.max(0) + 1
}
