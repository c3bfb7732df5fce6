//! Dashboard controller.
//!
//! A single [`DashboardState`] holds everything the presentation layer reads.
//! Symbol changes trigger a fetch on a spawned task. Each fetch carries a
//! [`RequestTicket`] issued under the state lock, and only the response for the
//! latest ticket is applied, so a slow response for an earlier symbol can never
//! overwrite a newer one.

use crate::{
    error::DashboardError,
    kpi::{KpiSet, fill_kpis},
    panel::{PanelFigures, panel_figures},
    range::{DateRange, filter_range},
    summary::{Summary, summarise},
    trend::{Trend, classify_moving_averages},
};
use pricedash_data::{
    CanonicalRecord, FetchError, MovingAverageSet, OhlcvField, PriceSource, Series, StockPayload,
    Symbol, moving_average::normalise_moving_averages, normalise::normalise_history,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

/// Selectable universe when none is configured.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "MSFT", "TSLA", "GOOGL", "AMZN"];

/// Shown for any transport or decode failure.
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to fetch data. Is the backend running and ticker valid?";

/// Configuration for the [`Dashboard`] controller
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Symbols the user may select
    pub symbols: Vec<Symbol>,
    pub initial_symbol: Symbol,
    pub initial_range: DateRange,
    /// Initially visible chart fields
    pub initial_fields: BTreeSet<OhlcvField>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.into_iter().map(Symbol::from).collect(),
            initial_symbol: Symbol::from(DEFAULT_SYMBOLS[0]),
            initial_range: DateRange::default(),
            initial_fields: BTreeSet::from([OhlcvField::Close]),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols<I, T>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Symbol>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_initial_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.initial_symbol = symbol.into();
        self
    }

    pub fn with_initial_range(mut self, range: DateRange) -> Self {
        self.initial_range = range;
        self
    }

    pub fn with_initial_fields(mut self, fields: impl IntoIterator<Item = OhlcvField>) -> Self {
        self.initial_fields = fields.into_iter().collect();
        self
    }
}

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub seq: u64,
    pub symbol: Symbol,
}

/// Everything the presentation layer renders, derived on demand.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardSnapshot {
    pub symbol: Symbol,
    pub range: DateRange,
    pub fields: Vec<OhlcvField>,
    pub loading: bool,
    pub error: Option<String>,
    /// Series restricted to `range`
    pub series: Vec<CanonicalRecord>,
    pub kpis: KpiSet,
    pub moving_averages: MovingAverageSet,
    pub summary: Option<Summary>,
    pub trend: Trend,
    pub panel: PanelFigures,
}

/// Controller state.
///
/// Series, KPIs and moving averages are replaced wholesale by each applied
/// response. Everything else shown on screen is derived from them.
#[derive(Debug, Clone)]
pub struct DashboardState {
    symbol: Symbol,
    series: Series,
    kpis: KpiSet,
    moving_averages: MovingAverageSet,
    fields: BTreeSet<OhlcvField>,
    range: DateRange,
    loading: bool,
    error: Option<String>,
    issued_seq: u64,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            symbol: config.initial_symbol.clone(),
            series: Series::new(),
            kpis: KpiSet::new(),
            moving_averages: MovingAverageSet::new(),
            fields: config.initial_fields.clone(),
            range: config.initial_range,
            loading: false,
            error: None,
            issued_seq: 0,
        }
    }

    /// Start a fetch for `symbol`: selects it, marks loading and clears the error.
    pub fn issue_request(&mut self, symbol: Symbol) -> RequestTicket {
        self.issued_seq += 1;
        self.symbol = symbol.clone();
        self.loading = true;
        self.error = None;

        RequestTicket {
            seq: self.issued_seq,
            symbol,
        }
    }

    /// Apply a fetch result, returning `false` if `ticket` has been superseded.
    ///
    /// Any failure resets the series, KPIs and moving averages to empty and
    /// sets [`FETCH_ERROR_MESSAGE`].
    pub fn apply(
        &mut self,
        ticket: &RequestTicket,
        result: Result<StockPayload, FetchError>,
    ) -> bool {
        if ticket.seq != self.issued_seq {
            debug!(
                symbol = %ticket.symbol,
                seq = ticket.seq,
                latest = self.issued_seq,
                "discarding stale price history response"
            );
            return false;
        }

        self.loading = false;

        match result {
            Ok(payload) => {
                let series = normalise_history(&payload.history, &ticket.symbol);
                let moving_averages = normalise_moving_averages(&payload.moving_averages);
                let kpis = fill_kpis(&KpiSet::from_value(&payload.kpis), &series);

                info!(
                    symbol = %ticket.symbol,
                    rows = series.len(),
                    dropped = payload.row_count().saturating_sub(series.len()),
                    moving_averages = moving_averages.len(),
                    "applied price history"
                );

                self.series = series;
                self.kpis = kpis;
                self.moving_averages = moving_averages;
                self.error = None;
            }
            Err(error) => {
                warn!(symbol = %ticket.symbol, %error, "failed to fetch price history");

                self.series.clear();
                self.kpis = KpiSet::new();
                self.moving_averages = MovingAverageSet::new();
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }

        true
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Full canonical series of the last applied response
    pub fn series(&self) -> &[CanonicalRecord] {
        &self.series
    }

    pub fn kpis(&self) -> &KpiSet {
        &self.kpis
    }

    pub fn moving_averages(&self) -> &MovingAverageSet {
        &self.moving_averages
    }

    pub fn fields(&self) -> &BTreeSet<OhlcvField> {
        &self.fields
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the most recently issued request
    pub fn latest_seq(&self) -> u64 {
        self.issued_seq
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Flip `field`'s visibility, returning whether it is now visible.
    pub fn toggle_field(&mut self, field: OhlcvField) -> bool {
        if self.fields.remove(&field) {
            false
        } else {
            self.fields.insert(field);
            true
        }
    }

    pub fn windowed(&self) -> Vec<CanonicalRecord> {
        filter_range(&self.series, self.range)
    }

    /// Summary of the windowed series
    pub fn summary(&self) -> Option<Summary> {
        summarise(&self.windowed())
    }

    pub fn trend(&self) -> Trend {
        classify_moving_averages(&self.moving_averages)
    }

    pub fn panel(&self) -> PanelFigures {
        panel_figures(&self.kpis, self.summary().as_ref(), &self.moving_averages)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let series = self.windowed();
        let summary = summarise(&series);

        DashboardSnapshot {
            symbol: self.symbol.clone(),
            range: self.range,
            fields: self.fields.iter().copied().collect(),
            loading: self.loading,
            error: self.error.clone(),
            series,
            kpis: self.kpis.clone(),
            moving_averages: self.moving_averages.clone(),
            summary,
            trend: self.trend(),
            panel: panel_figures(&self.kpis, summary.as_ref(), &self.moving_averages),
        }
    }
}

/// Owns the shared [`DashboardState`] and drives fetches against a [`PriceSource`].
///
/// Nothing is fetched on construction; call [`Dashboard::refresh`] to load the
/// initial symbol.
#[derive(Debug)]
pub struct Dashboard<S> {
    source: Arc<S>,
    state: Arc<Mutex<DashboardState>>,
    symbols: Vec<Symbol>,
}

impl<S> Dashboard<S>
where
    S: PriceSource + 'static,
{
    pub fn new(source: S, config: DashboardConfig) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(DashboardState::new(&config))),
            symbols: config.symbols,
        }
    }

    /// Shared handle to the controller state
    pub fn state(&self) -> Arc<Mutex<DashboardState>> {
        Arc::clone(&self.state)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Select `symbol` from the configured universe and fetch its history.
    ///
    /// The returned handle resolves to whether the response was applied.
    pub async fn select_symbol(&self, symbol: &str) -> Result<JoinHandle<bool>, DashboardError> {
        let selected = self
            .symbols
            .iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(symbol.trim()))
            .cloned()
            .ok_or_else(|| DashboardError::UnknownSymbol(symbol.to_string()))?;

        Ok(self.spawn_fetch(selected).await)
    }

    /// Re-fetch the currently selected symbol.
    pub async fn refresh(&self) -> JoinHandle<bool> {
        let ticket = {
            let mut state = self.state.lock().await;
            let symbol = state.symbol().clone();
            state.issue_request(symbol)
        };
        self.spawn_ticket(ticket)
    }

    async fn spawn_fetch(&self, symbol: Symbol) -> JoinHandle<bool> {
        let ticket = self.state.lock().await.issue_request(symbol);
        self.spawn_ticket(ticket)
    }

    fn spawn_ticket(&self, ticket: RequestTicket) -> JoinHandle<bool> {
        debug!(symbol = %ticket.symbol, seq = ticket.seq, "fetching price history");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let result = source.fetch(&ticket.symbol).await;
            state.lock().await.apply(&ticket, result)
        })
    }

    pub async fn set_range(&self, range: DateRange) {
        self.state.lock().await.set_range(range);
    }

    /// Set the range from its selector label (`7D`, `1M`, `6M`, `1Y`, `ALL`).
    pub async fn set_range_label(&self, label: &str) -> Result<(), DashboardError> {
        let range = label.parse::<DateRange>()?;
        self.set_range(range).await;
        Ok(())
    }

    pub async fn toggle_field(&self, field: OhlcvField) -> bool {
        self.state.lock().await.toggle_field(field)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot()
    }
}
