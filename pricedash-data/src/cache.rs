//! Short-lived response cache in front of any [`PriceSource`].
//!
//! Rapid symbol switching tends to re-request the same few tickers; payloads
//! younger than the TTL are served from memory. Failures are never cached.

use crate::{
    client::{ClientConfig, PriceSource},
    error::FetchError,
    payload::StockPayload,
    record::Symbol,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tracing::debug;

#[derive(Debug)]
pub struct CachedPriceSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<Symbol, (Instant, StockPayload)>>,
}

impl<S> CachedPriceSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache for [`ClientConfig::cache_ttl`].
    pub fn from_config(inner: S, config: &ClientConfig) -> Self {
        Self::new(inner, config.cache_ttl)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached payload
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn get(&self, symbol: &Symbol) -> Option<StockPayload> {
        let mut entries = self.entries.lock();

        let fresh = entries
            .get(symbol)
            .map(|(stored_at, _)| stored_at.elapsed() < self.ttl)?;

        if fresh {
            entries.get(symbol).map(|(_, payload)| payload.clone())
        } else {
            entries.remove(symbol);
            None
        }
    }
}

#[async_trait]
impl<S> PriceSource for CachedPriceSource<S>
where
    S: PriceSource,
{
    async fn fetch(&self, symbol: &Symbol) -> Result<StockPayload, FetchError> {
        if let Some(payload) = self.get(symbol) {
            debug!(%symbol, "serving cached price history");
            return Ok(payload);
        }

        let payload = self.inner.fetch(symbol).await?;
        self.entries
            .lock()
            .insert(symbol.clone(), (Instant::now(), payload.clone()));

        Ok(payload)
    }
}
