/// Pricedash Analytics
///
/// Derivations over the canonical price history produced by `pricedash-data`,
/// and the controller that keeps them consistent with the selected symbol:
/// - KPI fill-in, preferring backend-supplied values
/// - Relative date-range windows anchored on the last record
/// - Period summary statistics
/// - MA7 / MA50 trend signal
/// - Summary panel figures and their display formatting
/// - Dashboard state with request sequencing for overlapping fetches
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod panel;
pub mod range;
pub mod summary;
pub mod trend;

// Re-export commonly used types for convenience
pub use dashboard::{
    DEFAULT_SYMBOLS, Dashboard, DashboardConfig, DashboardSnapshot, DashboardState,
    FETCH_ERROR_MESSAGE, RequestTicket,
};
pub use error::{DashboardError, ParseDateRangeError};
pub use kpi::{KpiSet, fill_kpis};
pub use panel::{PanelFigures, format_pct, format_price, format_volume, panel_figures};
pub use range::{DateRange, filter_range};
pub use summary::{Summary, summarise};
pub use trend::{Trend, classify, classify_moving_averages};
