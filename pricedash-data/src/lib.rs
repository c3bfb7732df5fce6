//! # Pricedash-Data
//! Normalised ingestion for price APIs whose row schema drifts between
//! releases.
//!
//! The upstream `GET /api/stock/<symbol>` endpoint returns price rows keyed by
//! whatever the backend's dataframe happened to produce: plain `Close`,
//! stringified MultiIndex tuples like `('Close', 'AAPL')`, `Close_AAPL`,
//! `AAPLClose`... This crate turns such payloads into canonical OHLCV records
//! and canonical `MA<n>` moving-average series.
//!
//! ## Components
//! * [`resolve`]: statically declared candidate keys and first-present lookup.
//! * [`normalise`]: strict numeric/date coercion and raw row → [`CanonicalRecord`].
//! * [`moving_average`]: `MA<n>` label canonicalisation.
//! * [`client`]: the [`PriceSource`] seam and its reqwest implementation.
//! * [`cache`]: TTL cache in front of any [`PriceSource`].
//!
//! ## Example
//! ```rust,no_run
//! use pricedash_data::{
//!     client::{ClientConfig, HttpPriceSource, PriceSource},
//!     moving_average::normalise_moving_averages,
//!     normalise::normalise_history,
//!     record::Symbol,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = HttpPriceSource::new(&ClientConfig::from_env()).unwrap();
//!     let symbol = Symbol::from("AAPL");
//!
//!     let payload = source.fetch(&symbol).await.unwrap();
//!     let series = normalise_history(&payload.history, &symbol);
//!     let moving_averages = normalise_moving_averages(&payload.moving_averages);
//!
//!     println!("{} rows, {} moving averages", series.len(), moving_averages.len());
//! }
//! ```

/// Short-lived payload cache.
pub mod cache;

/// HTTP client and [`PriceSource`] trait.
pub mod client;

/// All [`Error`](std::error::Error)s generated in Pricedash-Data.
pub mod error;

/// Moving-average canonicalisation.
pub mod moving_average;

/// Raw row → canonical record normalisation.
pub mod normalise;

/// Upstream response body.
pub mod payload;

/// Canonical record types.
pub mod record;

/// Candidate-key resolution.
pub mod resolve;

pub use client::PriceSource;
pub use error::FetchError;
pub use moving_average::MovingAverageSet;
pub use payload::StockPayload;
pub use record::{CanonicalRecord, OhlcvField, RawRow, Series, Symbol};
