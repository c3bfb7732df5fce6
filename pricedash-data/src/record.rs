/// Core data types for price history
///
/// Raw rows arrive from the price API with whatever key spelling the backend
/// release happened to produce. Canonical records carry fixed field names and
/// serialise with the same names the presentation layer charts by.
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

/// One semi-structured row of the upstream `history` array.
pub type RawRow = Map<String, Value>;

/// Ordered canonical price history, assumed ascending by date.
pub type Series = Vec<CanonicalRecord>;

/// Ticker symbol (e.g., "AAPL", "MSFT")
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Symbol(SmolStr);

impl Symbol {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(SmolStr::new(symbol))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

/// Logical OHLCV field of a price row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum OhlcvField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl OhlcvField {
    /// Every field, in chart toggle order.
    pub const ALL: [OhlcvField; 5] = [
        OhlcvField::Open,
        OhlcvField::High,
        OhlcvField::Low,
        OhlcvField::Close,
        OhlcvField::Volume,
    ];

    /// Capitalised name, as used by the backend's plain keys
    pub fn as_str(&self) -> &'static str {
        match self {
            OhlcvField::Open => "Open",
            OhlcvField::High => "High",
            OhlcvField::Low => "Low",
            OhlcvField::Close => "Close",
            OhlcvField::Volume => "Volume",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for OhlcvField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical OHLCV entry
///
/// Invariant: `date` is non-empty and at least one of open/high/low/close is
/// present. Volume alone never makes a record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CanonicalRecord {
    /// Date as delivered by the backend, coerced to a string
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl CanonicalRecord {
    /// Record with only a close price, mostly useful for tests and fixtures.
    pub fn from_close(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }

    /// Value of the given field, if present
    pub fn field(&self, field: OhlcvField) -> Option<f64> {
        match field {
            OhlcvField::Open => self.open,
            OhlcvField::High => self.high,
            OhlcvField::Low => self.low,
            OhlcvField::Close => self.close,
            OhlcvField::Volume => self.volume,
        }
    }

    /// Close price, falling back to open
    pub fn price(&self) -> Option<f64> {
        self.close.or(self.open)
    }

    /// Check the canonical invariant holds
    pub fn has_price(&self) -> bool {
        self.open.is_some() || self.high.is_some() || self.low.is_some() || self.close.is_some()
    }
}
