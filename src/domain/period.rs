//! Billing period (month + year a usage record covers)

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian month names, January first.
pub fn month_names() -> &'static [&'static str; 12] {
    &MONTH_NAMES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Period containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month_name(&self) -> &'static str {
        (self.month as usize)
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
            .unwrap_or("?")
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Day `day` of this period, clamped to the last day of the month.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let last = self.next().first_day()?.pred_opt()?;
        let day = day.clamp(1, last.day());
        first.with_day(day)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = DomainError;

    /// Accepts `"Januari 2024"`, `"01-2024"` and `"2024-01"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("unrecognised billing period '{}'", s));
        let s = s.trim();

        let words: Vec<&str> = s.split_whitespace().collect();
        if let [name, year] = words.as_slice() {
            let idx = MONTH_NAMES
                .iter()
                .position(|m| m.eq_ignore_ascii_case(name))
                .ok_or_else(invalid)?;
            let year = year.parse::<i32>().map_err(|_| invalid())?;
            return Self::new(idx as u32 + 1, year);
        }

        let parts: Vec<&str> = s.split('-').collect();
        if let [first, second] = parts.as_slice() {
            let first = first.parse::<i32>().map_err(|_| invalid())?;
            let second = second.parse::<i32>().map_err(|_| invalid())?;
            // a leading component above 12 can only be the year
            let (month, year) = if first > 12 {
                (second, first)
            } else {
                (first, second)
            };
            let month = u32::try_from(month).map_err(|_| invalid())?;
            return Self::new(month, year);
        }

        Err(invalid())
    }
}
