//! Relative date-range windows.
//!
//! Windows are anchored on the last record's date, not the wall clock, so a
//! stale weekend payload still shows a full week.

use crate::error::ParseDateRangeError;
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use pricedash_data::CanonicalRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Lookback selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum DateRange {
    #[serde(rename = "7D")]
    SevenDays,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl DateRange {
    /// Every selector, in button order.
    pub const SELECTORS: [DateRange; 5] = [
        DateRange::SevenDays,
        DateRange::OneMonth,
        DateRange::SixMonths,
        DateRange::OneYear,
        DateRange::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::SevenDays => "7D",
            DateRange::OneMonth => "1M",
            DateRange::SixMonths => "6M",
            DateRange::OneYear => "1Y",
            DateRange::All => "ALL",
        }
    }

    /// Exclusive lower bound of the window ending at `anchor`.
    ///
    /// `None` for [`DateRange::All`]. Month arithmetic clamps to the end of
    /// shorter months (Mar 31 - 1M = Feb 29).
    pub fn window_start(&self, anchor: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateRange::SevenDays => anchor.checked_sub_signed(TimeDelta::days(7)),
            DateRange::OneMonth => anchor.checked_sub_months(Months::new(1)),
            DateRange::SixMonths => anchor.checked_sub_months(Months::new(6)),
            DateRange::OneYear => anchor.checked_sub_months(Months::new(12)),
            DateRange::All => None,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DateRange {
    type Err = ParseDateRangeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::SELECTORS
            .into_iter()
            .find(|range| range.label().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| ParseDateRangeError(input.to_string()))
    }
}

/// Parse a record date as delivered by the backend.
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f][±HH:MM]`,
/// `YYYY-MM-DDTHH:MM:SS[.f]`, RFC 2822 (Flask's default date rendering) and
/// integer epoch milliseconds. Offset-bearing dates are compared in UTC.
pub fn parse_record_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.naive_utc());
    }
    if let Ok(datetime) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(datetime.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(input) {
        return Some(datetime.naive_utc());
    }
    if !input.is_empty() && input.bytes().all(|byte| byte.is_ascii_digit()) {
        let millis = input.parse::<i64>().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|datetime| datetime.naive_utc());
    }

    None
}

/// Records dated strictly after `range`'s start, anchored on the last record.
///
/// [`DateRange::All`] returns the whole series. Records whose date cannot be
/// parsed fall outside every bounded window, and an unparseable anchor yields an
/// empty window.
pub fn filter_range(series: &[CanonicalRecord], range: DateRange) -> Vec<CanonicalRecord> {
    let Some(last) = series.last() else {
        return Vec::new();
    };

    if range == DateRange::All {
        return series.to_vec();
    }

    let Some(start) = parse_record_date(&last.date).and_then(|anchor| range.window_start(anchor))
    else {
        debug!(anchor = %last.date, %range, "cannot anchor date range on last record");
        return Vec::new();
    };

    series
        .iter()
        .filter(|record| parse_record_date(&record.date).is_some_and(|date| date > start))
        .cloned()
        .collect()
}
