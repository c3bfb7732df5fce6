//! Display figures for the summary panel.
//!
//! Backend KPIs and the windowed [`Summary`] overlap. The panel prefers the
//! backend for the headline price and change, and the window for the extremes.

use crate::{
    kpi::{self, KpiSet},
    summary::Summary,
    trend::{self, Trend},
};
use pricedash_data::MovingAverageSet;
use serde::{Deserialize, Serialize};

/// Placeholder for a figure that cannot be shown.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct PanelFigures {
    pub current_price: Option<f64>,
    pub change_pct: Option<f64>,
    pub period_high: Option<f64>,
    pub period_low: Option<f64>,
    pub avg_volume: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub trend: Trend,
    /// Neither KPIs nor a summary are available.
    pub is_empty: bool,
}

/// Resolve each displayed figure from its preferred source.
pub fn panel_figures(
    kpis: &KpiSet,
    summary: Option<&Summary>,
    moving_averages: &MovingAverageSet,
) -> PanelFigures {
    let from_summary = |pick: fn(&Summary) -> Option<f64>| summary.and_then(pick);
    let truthy_kpi = |key: &str| kpis.is_supplied(key).then(|| kpis.number(key)).flatten();
    let truthy_ma = |label: &str| {
        moving_averages
            .last_value(label)
            .filter(|value| *value != 0.0)
    };

    PanelFigures {
        current_price: kpis
            .number(kpi::LAST_PRICE)
            .or_else(|| from_summary(|summary| summary.last_close)),
        change_pct: kpis
            .number(kpi::PCT_CHANGE)
            .or_else(|| from_summary(|summary| summary.pct_change)),
        period_high: from_summary(|summary| summary.period_high)
            .or_else(|| truthy_kpi(kpi::HIGH)),
        period_low: from_summary(|summary| summary.period_low)
            .or_else(|| truthy_kpi(kpi::LOW)),
        avg_volume: from_summary(|summary| summary.avg_volume),
        ma_short: truthy_ma(trend::SHORT_WINDOW_LABEL),
        ma_long: truthy_ma(trend::LONG_WINDOW_LABEL),
        trend: trend::classify_moving_averages(moving_averages),
        is_empty: kpis.is_empty() && summary.is_none(),
    }
}

/// `$123.45`, or `N/A`
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("${:.2}", value),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `1.23%`, or `N/A`
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Rounded with thousands separators (`1,234,568`), or `N/A`.
pub fn format_volume(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (index, digit) in rounded.chars().enumerate() {
        if index > 0 && (rounded.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value.is_sign_negative() && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}
