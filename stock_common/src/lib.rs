//!
//! Common types shared by the stock tracker core and its hosts.
//!
//! This crate aggregates:
//! - `error`: unified error type `TrackerError` used across the workspace.
//! - `result`: handy `Result<T, TrackerError>` alias.
//! - `tickers`: the allowed ticker universe and parsing helpers.
//! - `quote`: the quote record handed from the API client to the presentation.
//! - `config`: the widget attributes (`WidgetConfig`) and partial updates.
//! - `settings`: the settings form rules that produce validated updates.
//! - `messages`: localized user-facing strings.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod messages;
pub mod quote;
pub mod result;
pub mod settings;
pub mod tickers;

pub use config::{ConfigUpdate, WidgetConfig};
pub use error::TrackerError;
pub use messages::{Locale, Message};
pub use quote::{Quote, QuoteResult};
pub use result::Result;
pub use tickers::Ticker;
