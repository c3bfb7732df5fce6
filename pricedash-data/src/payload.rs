use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET <base>/api/stock/<symbol>`.
///
/// Every field is optional upstream. A missing or `null` field decodes as
/// `Value::Null`, which the normalisers treat as an empty container.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StockPayload {
    /// Array of semi-structured rows
    #[serde(default)]
    pub history: Value,
    /// Label → array of numeric/string values
    #[serde(default)]
    pub moving_averages: Value,
    /// Backend-computed KPIs (`last_price`, `pct_change`, `change`, `high`, `low`)
    #[serde(default)]
    pub kpis: Value,
    /// Error message the backend attaches to non-2xx responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StockPayload {
    /// Decode a response body into the payload shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(FetchError::from)
    }

    /// Number of raw history rows, if `history` is an array
    pub fn row_count(&self) -> usize {
        self.history.as_array().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_payload() {
        let body = br#"{
            "kpis": {"last_price": 110.0, "change": 10.0, "pct_change": 10.0, "high": 110.0, "low": 100.0},
            "history": [{"Date": "2024-01-30", "Close": 100.0}, {"Date": "2024-01-31", "Close": 110.0}],
            "moving_averages": {"MA7": [100.0, 105.0]}
        }"#;

        let payload = StockPayload::from_slice(body).unwrap();
        assert_eq!(payload.row_count(), 2);
        assert_eq!(payload.kpis["last_price"], json!(110.0));
        assert_eq!(payload.moving_averages["MA7"], json!([100.0, 105.0]));
        assert_eq!(payload.error, None);
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let payload = StockPayload::from_slice(b"{}").unwrap();
        assert_eq!(payload, StockPayload::default());
        assert_eq!(payload.row_count(), 0);
    }

    #[test]
    fn test_decode_backend_error_body() {
        let payload = StockPayload::from_slice(br#"{"error": "No data available"}"#).unwrap();
        assert_eq!(payload.error.as_deref(), Some("No data available"));
    }

    #[test]
    fn test_decode_malformed() {
        struct TestCase {
            input: &'static [u8],
        }

        let tests = vec![
            TestCase {
                // TC0: truncated JSON
                input: b"{\"history\": [",
            },
            TestCase {
                // TC1: bare string body
                input: b"\"No data available\"",
            },
            TestCase {
                // TC2: html error page
                input: b"<html>502 Bad Gateway</html>",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = StockPayload::from_slice(test.input);
            assert!(
                matches!(actual, Err(FetchError::Decode(_))),
                "TC{} failed",
                index
            );
        }
    }
}
