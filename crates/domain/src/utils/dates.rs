//! Calendar date helpers
//!
//! Every interface exchanges dates as `YYYY-MM-DD` strings; internally they
//! are `chrono::NaiveDate`.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;
use crate::errors::{AdSyncError, Result};

/// Parse a `YYYY-MM-DD` string.
///
/// # Errors
/// Returns `AdSyncError::Validation` naming the offending input.
pub fn parse_ymd(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| AdSyncError::Validation(format!("invalid date '{value}': {e}")))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive calendar date range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// Returns `AdSyncError::Validation` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AdSyncError::Validation(format!(
                "start date {} is after end date {}",
                format_ymd(start),
                format_ymd(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_ymd(start)?, parse_ymd(end)?)
    }

    /// The `days` days ending yesterday: `end = today - 1`,
    /// `start = end - days`.
    pub fn last_n_days(today: NaiveDate, days: u32) -> Self {
        let end = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let start = end.checked_sub_days(Days::new(u64::from(days))).unwrap_or(end);
        Self { start, end }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start as `YYYY-MM-DD`.
    pub fn start_ymd(&self) -> String {
        format_ymd(self.start)
    }

    /// End as `YYYY-MM-DD`.
    pub fn end_ymd(&self) -> String {
        format_ymd(self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start_ymd(), self.end_ymd())
    }
}
