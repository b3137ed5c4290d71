//! Quote record handed from the API client to the presentation.
//!
//! The refresh controller treats a `Quote` as opaque: it stores whatever the
//! API client returned and replaces the whole `QuoteResult` on every
//! successful fetch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tickers::Ticker;

/// Latest quotes keyed by symbol.
pub type QuoteResult = HashMap<Ticker, Quote>;

/// Current price data for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current (last traded) price.
    pub price: f64,
    /// Absolute change since the previous close, when the provider has it.
    pub change: Option<f64>,
    /// Change since the previous close in percent, when the provider has it.
    pub percent_change: Option<f64>,
    /// Day high.
    pub high: f64,
    /// Day low.
    pub low: f64,
    /// Day open.
    pub open: f64,
    /// Previous close.
    pub previous_close: f64,
    /// Provider timestamp in seconds since Unix epoch.
    pub timestamp: i64,
}

/// Price movement since the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Price went up.
    Up,
    /// Price went down.
    Down,
    /// No change, or the provider did not report one.
    Flat,
}

impl Quote {
    /// Direction of `change`; missing change is reported as flat.
    pub fn direction(&self) -> Direction {
        match self.change {
            Some(change) if change > 0.0 => Direction::Up,
            Some(change) if change < 0.0 => Direction::Down,
            _ => Direction::Flat,
        }
    }
}
