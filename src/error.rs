use crate::types::Side;
use thiserror::Error;

/// Per-symbol failure taxonomy. None of these are fatal to a scan;
/// the orchestrator records them and moves on to the next candidate.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("data fetch failed: {0}")]
    DataFetch(String),

    #[error("insufficient data: got {got} candles, need {need}")]
    InsufficientData { got: usize, need: usize },

    #[error("degenerate {side} risk: stop {stop_loss} on wrong side of entry {entry}")]
    DegenerateRisk {
        side: Side,
        entry: f64,
        stop_loss: f64,
    },

    #[error("notification failed: {0}")]
    Notification(String),
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::DataFetch(err.to_string())
    }
}
