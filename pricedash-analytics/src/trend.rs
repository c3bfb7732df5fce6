use pricedash_data::MovingAverageSet;
use serde::{Deserialize, Serialize};

/// Short window compared by [`classify_moving_averages`].
pub const SHORT_WINDOW_LABEL: &str = "MA7";

/// Long window compared by [`classify_moving_averages`].
pub const LONG_WINDOW_LABEL: &str = "MA50";

/// Short vs long moving-average signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,  // Short MA above long MA
    Bearish,  // Short MA at or below long MA
    #[default]
    Unavailable,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Unavailable => "unavailable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Bullish => "▲",
            Trend::Bearish => "▼",
            Trend::Unavailable => "-",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Equality is bearish.
pub fn classify(short: Option<f64>, long: Option<f64>) -> Trend {
    match (short, long) {
        (Some(short), Some(long)) if short > long => Trend::Bullish,
        (Some(_), Some(_)) => Trend::Bearish,
        _ => Trend::Unavailable,
    }
}

/// Classify on the last `MA7` and `MA50` values.
pub fn classify_moving_averages(moving_averages: &MovingAverageSet) -> Trend {
    classify(
        moving_averages.last_value(SHORT_WINDOW_LABEL),
        moving_averages.last_value(LONG_WINDOW_LABEL),
    )
}
