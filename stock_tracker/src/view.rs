//! What the presentation should draw for a snapshot.

use chrono::{DateTime, Utc};
use stock_common::{Quote, Ticker};

use crate::state::WidgetSnapshot;

/// One line of the quote grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    /// Configured symbol.
    pub ticker: Ticker,
    /// Its quote, if the last successful fetch returned one.
    pub quote: Option<Quote>,
}

/// Widget body, chosen in precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// No API key: ask the author for one.
    CredentialMissing,
    /// No symbol selected.
    NoSymbols,
    /// Last fetch failed; replaces the grid entirely.
    Error {
        /// Message to show next to the retry action.
        message: String,
    },
    /// Quote grid in configured symbol order.
    Grid {
        /// Rows, one per configured symbol.
        rows: Vec<GridRow>,
        /// A fetch is in flight.
        loading: bool,
        /// Completion time of the last successful fetch.
        last_updated_at: Option<DateTime<Utc>>,
    },
}

impl WidgetView {
    /// Picks the view for `snapshot`.
    pub fn from_snapshot(snapshot: &WidgetSnapshot) -> Self {
        let config = &snapshot.config;
        if !config.has_credential() {
            return WidgetView::CredentialMissing;
        }
        if !config.has_symbols() {
            return WidgetView::NoSymbols;
        }
        if let Some(message) = &snapshot.state.last_error {
            return WidgetView::Error {
                message: message.clone(),
            };
        }
        WidgetView::Grid {
            rows: config
                .symbols
                .iter()
                .map(|ticker| GridRow {
                    ticker: *ticker,
                    quote: snapshot.quotes.get(ticker).cloned(),
                })
                .collect(),
            loading: snapshot.state.is_loading,
            last_updated_at: snapshot.state.last_updated_at,
        }
    }
}
