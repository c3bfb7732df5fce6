//! Descriptive statistics over a (windowed) series.

use itertools::{Itertools, MinMaxResult};
use pricedash_data::CanonicalRecord;
use serde::{Deserialize, Serialize};

/// Period statistics for the summary panel.
///
/// Each field is computed from the records where that field is present,
/// independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub last_close: Option<f64>,
    /// Change from first to last close, in percent. `None` when the first
    /// close is zero.
    pub pct_change: Option<f64>,
    pub max_close: Option<f64>,
    pub min_close: Option<f64>,
    pub period_high: Option<f64>,
    pub period_low: Option<f64>,
    pub avg_volume: Option<f64>,
}

/// Summarise `series`, or `None` if it is empty.
///
/// An empty input is "no data", which callers must be able to tell apart from
/// a series whose values are all zero.
pub fn summarise(series: &[CanonicalRecord]) -> Option<Summary> {
    if series.is_empty() {
        return None;
    }

    let closes: Vec<f64> = series.iter().filter_map(|record| record.close).collect();
    let highs = series.iter().filter_map(|record| record.high);
    let lows = series.iter().filter_map(|record| record.low);
    let volumes: Vec<f64> = series.iter().filter_map(|record| record.volume).collect();

    let first_close = closes.first().copied();
    let last_close = closes.last().copied();

    let pct_change = match (first_close, last_close) {
        (Some(first), Some(last)) if first != 0.0 => Some((last - first) / first * 100.0),
        _ => None,
    };

    let (min_close, max_close) = match closes.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (None, None),
        MinMaxResult::OneElement(close) => (Some(close), Some(close)),
        MinMaxResult::MinMax(min, max) => (Some(min), Some(max)),
    };

    let avg_volume =
        (!volumes.is_empty()).then(|| volumes.iter().sum::<f64>() / volumes.len() as f64);

    Some(Summary {
        last_close,
        pct_change,
        max_close,
        min_close,
        period_high: highs.max_by(f64::total_cmp),
        period_low: lows.min_by(f64::total_cmp),
        avg_volume,
    })
}
