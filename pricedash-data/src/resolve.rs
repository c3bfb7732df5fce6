//! Key resolution over semi-structured price rows.
//!
//! Depending on the backend release, a close price may be keyed `Close`,
//! `close`, `('Close', 'AAPL')` (a stringified pandas MultiIndex column),
//! `Close_AAPL`, `AAPLClose`, and so on. Every spelling the backends have been
//! seen to produce is declared once in [`FIELD_KEY_PATTERNS`] and
//! [`DATE_KEYS`]; resolution probes them in declaration order.

use crate::record::{OhlcvField, RawRow, Symbol};
use serde_json::Value;

/// Static spellings probed for the row date, in priority order.
pub const DATE_KEYS: [&str; 7] = [
    "Date",
    "date",
    "timestamp",
    "Timestamp",
    "('Date', '')",
    "('Date','')",
    "index",
];

/// Spelling rule for a symbol-dependent field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    /// `Close`
    Capitalised,
    /// `close`
    Lowercase,
    /// `('Close', 'AAPL')`
    Tuple,
    /// `('Close','AAPL')`
    TupleCompact,
    /// `Close_AAPL`
    FieldUnderscoreSymbol,
    /// `AAPL_Close`
    SymbolUnderscoreField,
    /// `CloseAAPL`
    FieldSymbol,
    /// `AAPLClose`
    SymbolField,
    /// `Close AAPL`
    FieldSpaceSymbol,
}

/// Field key spellings, in priority order.
pub const FIELD_KEY_PATTERNS: [KeyPattern; 9] = [
    KeyPattern::Capitalised,
    KeyPattern::Lowercase,
    KeyPattern::Tuple,
    KeyPattern::TupleCompact,
    KeyPattern::FieldUnderscoreSymbol,
    KeyPattern::SymbolUnderscoreField,
    KeyPattern::FieldSymbol,
    KeyPattern::SymbolField,
    KeyPattern::FieldSpaceSymbol,
];

impl KeyPattern {
    /// Render the physical key for a capitalised field name and symbol.
    pub fn render(&self, field: &str, symbol: &str) -> String {
        match self {
            KeyPattern::Capitalised => field.to_string(),
            KeyPattern::Lowercase => field.to_lowercase(),
            KeyPattern::Tuple => format!("('{field}', '{symbol}')"),
            KeyPattern::TupleCompact => format!("('{field}','{symbol}')"),
            KeyPattern::FieldUnderscoreSymbol => format!("{field}_{symbol}"),
            KeyPattern::SymbolUnderscoreField => format!("{symbol}_{field}"),
            KeyPattern::FieldSymbol => format!("{field}{symbol}"),
            KeyPattern::SymbolField => format!("{symbol}{field}"),
            KeyPattern::FieldSpaceSymbol => format!("{field} {symbol}"),
        }
    }
}

/// Ordered candidate keys for `field` under `symbol`, duplicates removed.
pub fn field_candidates(field: OhlcvField, symbol: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(FIELD_KEY_PATTERNS.len());
    for pattern in FIELD_KEY_PATTERNS {
        let key = pattern.render(field.as_str(), symbol);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Value of the first candidate key present in `row`.
///
/// Presence is key existence: `0`, `""`, `false` and `null` values are all
/// returned as found.
pub fn pick<'a, K>(row: &'a RawRow, candidates: &[K]) -> Option<&'a Value>
where
    K: AsRef<str>,
{
    candidates.iter().find_map(|key| row.get(key.as_ref()))
}

/// Candidate keys for every OHLCV field of one symbol, built once per fetch.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    symbol: Symbol,
    fields: [Vec<String>; 5],
}

impl KeyResolver {
    pub fn new(symbol: &Symbol) -> Self {
        Self {
            symbol: symbol.clone(),
            fields: OhlcvField::ALL.map(|field| field_candidates(field, symbol.as_str())),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Candidate keys for `field`, in priority order
    pub fn candidates(&self, field: OhlcvField) -> &[String] {
        &self.fields[field.index()]
    }

    /// Resolve the row date
    pub fn resolve_date<'a>(&self, row: &'a RawRow) -> Option<&'a Value> {
        pick(row, &DATE_KEYS)
    }

    /// Resolve an OHLCV field
    pub fn resolve<'a>(&self, row: &'a RawRow, field: OhlcvField) -> Option<&'a Value> {
        pick(row, self.candidates(field))
    }
}
