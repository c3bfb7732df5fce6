//! Headline KPI fill-in.
//!
//! The backend usually ships its own KPIs; whatever it leaves out (or leaves
//! falsy) is derived from the canonical series. Backend values always win.

use pricedash_data::{CanonicalRecord, normalise::coerce_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const LAST_PRICE: &str = "last_price";
pub const PCT_CHANGE: &str = "pct_change";
pub const CHANGE: &str = "change";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";

/// Sparse named scalars surfaced in the summary panel.
///
/// Backed by a JSON object so keys the backend adds beyond the five known
/// ones survive the fill-in untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct KpiSet(Map<String, Value>);

impl KpiSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend `kpis` object, or an empty set for anything else
    pub fn from_value(value: &Value) -> Self {
        Self(value.as_object().cloned().unwrap_or_default())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric value of `key`, if present and coercible
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce_number)
    }

    /// Backend supplied a truthy value for `key`.
    ///
    /// `null`, `false`, `0`, NaN and `""` do not count, so a legitimate zero
    /// from the backend is recomputed.
    pub fn is_supplied(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set `key` unless the backend already supplied it. Non-finite values are
    /// not representable in JSON and are skipped.
    fn fill(&mut self, key: &str, value: Option<f64>) {
        if self.is_supplied(key) {
            return;
        }
        if let Some(number) = value.and_then(Number::from_f64) {
            self.0.insert(key.to_string(), Value::Number(number));
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fill the gaps in `backend` from `series`.
///
/// * `last_price`: last record's close, falling back to open.
/// * `pct_change`, `change`: last two records' close (fallback open). A zero or
///   missing previous price forces `pct_change` to `0` while `change` stays
///   `last - prev`, with a missing `prev` taken as `0`. Skipped when the last
///   record has no price.
/// * `high` / `low`: extremes of `high ?? close` / `low ?? close`.
///
/// The output always contains every input key.
pub fn fill_kpis(backend: &KpiSet, series: &[CanonicalRecord]) -> KpiSet {
    let mut kpis = backend.clone();

    let Some(last) = series.last() else {
        return kpis;
    };

    kpis.fill(LAST_PRICE, last.price());

    // A missing previous price counts as zero
    if let [.., prev, last] = series {
        if let Some(last) = last.price() {
            let prev = prev.price().unwrap_or(0.0);
            let pct_change = if prev != 0.0 {
                (last - prev) / prev * 100.0
            } else {
                0.0
            };
            kpis.fill(PCT_CHANGE, Some(pct_change));
            kpis.fill(CHANGE, Some(last - prev));
        }
    }

    let high = series
        .iter()
        .map(|record| record.high.or(record.close).unwrap_or(f64::NEG_INFINITY))
        .fold(f64::NEG_INFINITY, f64::max);
    kpis.fill(HIGH, Some(high));

    let low = series
        .iter()
        .map(|record| record.low.or(record.close).unwrap_or(f64::INFINITY))
        .fold(f64::INFINITY, f64::min);
    kpis.fill(LOW, Some(low));

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(date: &str, open: Option<f64>, high: Option<f64>, low: Option<f64>, close: Option<f64>) -> CanonicalRecord {
        CanonicalRecord {
            date: date.to_string(),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_fill_from_closes() {
        let series = vec![
            CanonicalRecord::from_close("2024-01-30", 100.0),
            CanonicalRecord::from_close("2024-01-31", 110.0),
        ];

        let kpis = fill_kpis(&KpiSet::new(), &series);

        assert_eq!(kpis.number(PCT_CHANGE), Some(10.0));
        assert_eq!(kpis.number(CHANGE), Some(10.0));
        assert_eq!(kpis.number(LAST_PRICE), Some(110.0));
        assert_eq!(kpis.number(HIGH), Some(110.0));
        assert_eq!(kpis.number(LOW), Some(100.0));
    }

    #[test]
    fn test_backend_values_are_authoritative() {
        let backend = KpiSet::from_value(&json!({
            "last_price": 999.0,
            "change": -1.5,
            "currency": "USD"
        }));
        let series = vec![
            CanonicalRecord::from_close("2024-01-30", 100.0),
            CanonicalRecord::from_close("2024-01-31", 110.0),
        ];

        let kpis = fill_kpis(&backend, &series);

        assert_eq!(kpis.number(LAST_PRICE), Some(999.0));
        assert_eq!(kpis.number(CHANGE), Some(-1.5));
        assert_eq!(kpis.number(PCT_CHANGE), Some(10.0));
        assert_eq!(kpis.get("currency"), Some(&json!("USD")));
        assert!(backend.keys().all(|key| kpis.get(key).is_some()));
    }

    #[test]
    fn test_falsy_backend_values_are_recomputed() {
        struct TestCase {
            input: Value,
            expected: Option<f64>,
        }

        let series = vec![
            CanonicalRecord::from_close("2024-01-30", 100.0),
            CanonicalRecord::from_close("2024-01-31", 110.0),
        ];

        let tests = vec![
            TestCase {
                // TC0: legitimate zero is recomputed
                input: json!({"last_price": 0}),
                expected: Some(110.0),
            },
            TestCase {
                // TC1: null is recomputed
                input: json!({"last_price": null}),
                expected: Some(110.0),
            },
            TestCase {
                // TC2: empty string is recomputed
                input: json!({"last_price": ""}),
                expected: Some(110.0),
            },
            TestCase {
                // TC3: truthy numeric string is kept
                input: json!({"last_price": "108.5"}),
                expected: Some(108.5),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let kpis = fill_kpis(&KpiSet::from_value(&test.input), &series);
            assert_eq!(kpis.number(LAST_PRICE), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_zero_previous_price_guard() {
        let series = vec![
            CanonicalRecord::from_close("2024-01-30", 0.0),
            CanonicalRecord::from_close("2024-01-31", 5.0),
        ];

        let kpis = fill_kpis(&KpiSet::new(), &series);

        assert_eq!(kpis.number(PCT_CHANGE), Some(0.0));
        assert_eq!(kpis.number(CHANGE), Some(5.0));
    }

    #[test]
    fn test_change_with_falsy_previous_price() {
        struct TestCase {
            input: Vec<CanonicalRecord>,
            expected_pct_change: Option<f64>,
            expected_change: Option<f64>,
        }

        let tests = vec![
            TestCase {
                // TC0: previous record carries only high/low
                input: vec![
                    record("2024-01-30", None, Some(104.0), Some(99.0), None),
                    record("2024-01-31", None, None, None, Some(110.0)),
                ],
                expected_pct_change: Some(0.0),
                expected_change: Some(110.0),
            },
            TestCase {
                // TC1: previous record falls back to open
                input: vec![
                    record("2024-01-30", Some(100.0), None, None, None),
                    record("2024-01-31", None, None, None, Some(110.0)),
                ],
                expected_pct_change: Some(10.0),
                expected_change: Some(10.0),
            },
            TestCase {
                // TC2: last record without a price fills neither
                input: vec![
                    CanonicalRecord::from_close("2024-01-30", 100.0),
                    record("2024-01-31", None, Some(104.0), Some(99.0), None),
                ],
                expected_pct_change: None,
                expected_change: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let kpis = fill_kpis(&KpiSet::new(), &test.input);
            let last_price = test.input.last().and_then(CanonicalRecord::price);
            assert_eq!(kpis.number(LAST_PRICE), last_price, "TC{} failed", index);
            assert_eq!(kpis.get(LAST_PRICE).is_some(), last_price.is_some(), "TC{} failed", index);
            assert_eq!(kpis.number(PCT_CHANGE), test.expected_pct_change, "TC{} failed", index);
            assert_eq!(kpis.number(CHANGE), test.expected_change, "TC{} failed", index);
        }
    }

    #[test]
    fn test_single_record_has_no_change() {
        let series = vec![record("2024-01-31", Some(101.0), Some(104.0), Some(99.0), None)];

        let kpis = fill_kpis(&KpiSet::new(), &series);

        assert_eq!(kpis.number(LAST_PRICE), Some(101.0));
        assert_eq!(kpis.get(PCT_CHANGE), None);
        assert_eq!(kpis.get(CHANGE), None);
        assert_eq!(kpis.number(HIGH), Some(104.0));
        assert_eq!(kpis.number(LOW), Some(99.0));
    }

    #[test]
    fn test_high_low_fall_back_to_close() {
        let series = vec![
            record("2024-01-29", None, Some(120.0), None, Some(100.0)),
            record("2024-01-30", None, None, Some(90.0), Some(95.0)),
            record("2024-01-31", None, None, None, Some(130.0)),
        ];

        let kpis = fill_kpis(&KpiSet::new(), &series);

        assert_eq!(kpis.number(HIGH), Some(130.0));
        assert_eq!(kpis.number(LOW), Some(90.0));
    }

    #[test]
    fn test_open_only_series_leaves_extremes_unset() {
        let series = vec![record("2024-01-31", Some(101.0), None, None, None)];

        let kpis = fill_kpis(&KpiSet::new(), &series);

        assert_eq!(kpis.number(LAST_PRICE), Some(101.0));
        assert_eq!(kpis.get(HIGH), None);
        assert_eq!(kpis.get(LOW), None);
    }

    #[test]
    fn test_empty_series_fills_nothing() {
        let backend = KpiSet::from_value(&json!({"high": 1.0}));
        assert_eq!(fill_kpis(&backend, &[]), backend);
        assert!(fill_kpis(&KpiSet::new(), &[]).is_empty());
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
    }
}
