//! Raw `history` rows → canonical OHLCV records.

use crate::{
    record::{CanonicalRecord, OhlcvField, RawRow, Series, Symbol},
    resolve::KeyResolver,
};
use serde_json::Value;
use tracing::debug;

/// Strict numeric coercion.
///
/// JSON numbers are taken as-is and strings are trimmed then parsed. Anything
/// else (`null`, booleans, empty or non-numeric strings, containers) and any
/// non-finite result is `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Coerce a resolved date value to a non-empty string.
pub fn coerce_date(value: &Value) -> Option<String> {
    let date = match value {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    (!date.is_empty()).then_some(date)
}

/// Build one canonical record, or `None` if the row is unusable.
pub fn normalise_row(resolver: &KeyResolver, row: &RawRow) -> Option<CanonicalRecord> {
    let date = resolver.resolve_date(row).and_then(coerce_date)?;
    let value = |field| resolver.resolve(row, field).and_then(coerce_number);

    let record = CanonicalRecord {
        date,
        open: value(OhlcvField::Open),
        high: value(OhlcvField::High),
        low: value(OhlcvField::Low),
        close: value(OhlcvField::Close),
        volume: value(OhlcvField::Volume),
    };

    record.has_price().then_some(record)
}

/// Normalise the upstream `history` payload, keeping original row order.
///
/// A payload that is not an array is an empty series.
pub fn normalise_history(history: &Value, symbol: &Symbol) -> Series {
    let Some(rows) = history.as_array() else {
        if !history.is_null() {
            debug!(%symbol, "price history is not an array, treating as empty");
        }
        return Series::new();
    };

    let resolver = KeyResolver::new(symbol);
    let series: Series = rows
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|row| normalise_row(&resolver, row))
        .collect();

    let dropped = rows.len() - series.len();
    if dropped > 0 {
        debug!(%symbol, rows = rows.len(), dropped, "dropped unusable price rows");
    }

    series
}
