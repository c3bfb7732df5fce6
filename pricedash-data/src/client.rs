/// HTTP client for the stock price API
///
/// Fetches `GET <base>/api/stock/<symbol>` and decodes the body into a
/// [`StockPayload`]. Retries are left to the caller; every failure surfaces as
/// a [`FetchError`].
use crate::{error::FetchError, payload::StockPayload, record::Symbol};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Source of raw price payloads, keyed by symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, symbol: &Symbol) -> Result<StockPayload, FetchError>;
}

/// Price API client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the price API
    pub base_url: String,
    /// Optional lookback forwarded as `?period=` (backend default is `60d`)
    pub period: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached payloads, see [`CachedPriceSource`](crate::cache::CachedPriceSource)
    pub cache_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            period: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(20),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build a configuration from `PRICEDASH_*` environment variables, falling
    /// back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: std::env::var("PRICEDASH_API_URL").unwrap_or(defaults.base_url),
            period: std::env::var("PRICEDASH_PERIOD")
                .ok()
                .filter(|period| !period.is_empty())
                .or(defaults.period),
            timeout: std::env::var("PRICEDASH_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| parse_secs(&secs))
                .unwrap_or(defaults.timeout),
            cache_ttl: std::env::var("PRICEDASH_CACHE_TTL_SECS")
                .ok()
                .and_then(|secs| parse_secs(&secs))
                .unwrap_or(defaults.cache_ttl),
        }
    }

    /// Set the `?period=` lookback
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Set per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set cache lifetime
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

fn parse_secs(input: &str) -> Option<Duration> {
    input.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// [`PriceSource`] backed by the price API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: reqwest::Client,
    base_url: Url,
    period: Option<String>,
    timeout: Duration,
}

impl HttpPriceSource {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            period: config.period.clone(),
            timeout: config.timeout,
        })
    }

    /// Endpoint for `symbol`, e.g. `http://localhost:5000/api/stock/AAPL?period=60d`
    pub fn endpoint(&self, symbol: &Symbol) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["api", "stock", symbol.as_str()]);
        }

        if let Some(period) = &self.period {
            url.query_pairs_mut().append_pair("period", period);
        }

        Ok(url)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch(&self, symbol: &Symbol) -> Result<StockPayload, FetchError> {
        let url = self.endpoint(symbol)?;
        debug!(%symbol, %url, "fetching price history");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Backend errors are `{"error": "..."}`, fall back to the raw body
            let message = StockPayload::from_slice(body.as_bytes())
                .ok()
                .and_then(|payload| payload.error)
                .unwrap_or(body);

            warn!(%symbol, status = status.as_u16(), %message, "price API returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let payload = StockPayload::from_slice(&body)?;
        debug!(%symbol, rows = payload.row_count(), "received price history");

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://10.0.0.2:8000")
            .with_period("1y")
            .with_timeout(Duration::from_secs(3))
            .with_cache_ttl(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.period.as_deref(), Some("1y"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.period, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(20));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("15"), Some(Duration::from_secs(15)));
        assert_eq!(parse_secs(" 2 "), Some(Duration::from_secs(2)));
        assert_eq!(parse_secs("-1"), None);
        assert_eq!(parse_secs("soon"), None);
    }

    #[test]
    fn test_endpoint() {
        struct TestCase {
            config: ClientConfig,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: bare host
                config: ClientConfig::new("http://localhost:5000"),
                expected: "http://localhost:5000/api/stock/AAPL",
            },
            TestCase {
                // TC1: trailing slash is not doubled
                config: ClientConfig::new("http://localhost:5000/"),
                expected: "http://localhost:5000/api/stock/AAPL",
            },
            TestCase {
                // TC2: path prefix is kept
                config: ClientConfig::new("https://example.com/prices/"),
                expected: "https://example.com/prices/api/stock/AAPL",
            },
            TestCase {
                // TC3: period forwarded as query
                config: ClientConfig::new("http://localhost:5000").with_period("60d"),
                expected: "http://localhost:5000/api/stock/AAPL?period=60d",
            },
        ];

        let symbol = Symbol::from("AAPL");
        for (index, test) in tests.into_iter().enumerate() {
            let source = HttpPriceSource::new(&test.config).unwrap();
            let actual = source.endpoint(&symbol).unwrap();
            assert_eq!(actual.as_str(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpPriceSource::new(&ClientConfig::new("localhost")),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpPriceSource::new(&ClientConfig::new("mailto:prices@example.com")),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        // Port 9 (discard) is closed on test hosts
        let config = ClientConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        let source = HttpPriceSource::new(&config).unwrap();

        let error = source.fetch(&Symbol::from("AAPL")).await.unwrap_err();
        assert!(error.is_transport(), "unexpected error: {error}");
    }
}
