//! Observable widget state.

use chrono::{DateTime, Utc};
use stock_common::{QuoteResult, WidgetConfig};

/// Progress of the fetch cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    /// A fetch is in flight.
    pub is_loading: bool,
    /// Message of the last failed fetch, cleared when a new fetch starts.
    pub last_error: Option<String>,
    /// Completion time of the last successful fetch.
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Everything the presentation needs to render one widget.
#[derive(Debug, Clone, Default)]
pub struct WidgetSnapshot {
    /// Current attributes.
    pub config: WidgetConfig,
    /// Quotes of the last successful fetch.
    pub quotes: QuoteResult,
    /// Fetch progress.
    pub state: FetchState,
}
