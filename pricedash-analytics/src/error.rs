use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned to the presentation layer for rejected control inputs.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum DashboardError {
    #[error("unknown symbol: {0}, expected one of the configured symbols")]
    UnknownSymbol(String),

    #[error(transparent)]
    DateRange(#[from] ParseDateRangeError),
}

/// Label that is not one of `7D`, `1M`, `6M`, `1Y`, `ALL`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
#[error("unknown date range: {0}, expected one of 7D, 1M, 6M, 1Y, ALL")]
pub struct ParseDateRangeError(pub String);
