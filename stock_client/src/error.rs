//! Error types used across the stock client.
//!
//! The `ClientError` enum unifies configuration and HTTP client setup errors
//! so that they can be propagated easily with `Result<T, ClientError>`.
use stock_common::TrackerError;
use stock_tracker::FetchError;
use thiserror::Error;

/// Unified error type for the application.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid widget attributes or settings input.
    #[error("{0}")]
    Tracker(#[from] TrackerError),
    /// HTTP client could not be created, or a one-shot fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// Generic error with a human-readable message.
    #[error("{0}")]
    Format(String),
}
