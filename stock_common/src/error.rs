//! Error types shared between the tracker core and its hosts.
//!
//! The `TrackerError` enum unifies the failure cases of loading widget
//! attributes and validating settings form input, allowing crates to propagate
//! a single error type. Fetch failures have their own type in `stock_tracker`
//! because they never leave the refresh controller.
use std::io;

use thiserror::Error;

use crate::tickers::Ticker;

/// Unified error type for configuration and settings handling.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O error while reading an attributes or key file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while decoding widget attributes with serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A symbol outside of the supported ticker universe.
    #[error("Unknown ticker symbol: {0}")]
    UnknownTicker(String),

    /// More symbols selected than the widget can display.
    #[error(
        "Too many symbols: {0} selected, at most {max} allowed",
        max = crate::config::MAX_SYMBOLS
    )]
    TooManySymbols(usize),

    /// The same symbol selected twice.
    #[error("Symbol selected more than once: {0}")]
    DuplicateSymbol(Ticker),

    /// Refresh interval outside of the allowed range.
    #[error(
        "Refresh interval {0}s is out of range ({min}..={max})",
        min = crate::config::MIN_REFRESH_INTERVAL,
        max = crate::config::MAX_REFRESH_INTERVAL
    )]
    IntervalOutOfRange(u32),
}
