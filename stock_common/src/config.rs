//! Widget attributes and partial updates.
//!
//! `WidgetConfig` mirrors the block attributes stored with the hosting
//! document. Its JSON form keeps the attribute names of the editor
//! (`stockSymbols`, `apiKey`, `autoRefresh`, `refreshInterval`) so existing
//! documents load unchanged.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::result::Result;
use crate::tickers::Ticker;

/// Maximum number of symbols a widget displays.
pub const MAX_SYMBOLS: usize = 4;
/// Shortest allowed auto-refresh period in seconds.
pub const MIN_REFRESH_INTERVAL: u32 = 5;
/// Longest allowed auto-refresh period in seconds.
pub const MAX_REFRESH_INTERVAL: u32 = 60;
/// Auto-refresh period used when the attribute is missing.
pub const DEFAULT_REFRESH_INTERVAL: u32 = 30;

/// Attributes of one widget instance.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Selected tickers, unique, in display order.
    #[serde(rename = "stockSymbols")]
    pub symbols: Vec<Ticker>,
    /// API key for the quote provider. Empty means "not set".
    #[serde(rename = "apiKey")]
    pub credential: String,
    /// Whether quotes are re-fetched periodically.
    #[serde(rename = "autoRefresh")]
    pub auto_refresh: bool,
    /// Auto-refresh period in seconds.
    #[serde(rename = "refreshInterval")]
    pub refresh_interval: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            credential: String::new(),
            auto_refresh: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

// The credential is a secret; never let it reach logs.
impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("symbols", &self.symbols)
            .field("credential", &if self.has_credential() { "<set>" } else { "<empty>" })
            .field("auto_refresh", &self.auto_refresh)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl WidgetConfig {
    /// Reads widget attributes from a JSON file and validates them.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: WidgetConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the settings form guarantees.
    pub fn validate(&self) -> Result<()> {
        validate_symbols(&self.symbols)?;
        validate_interval(self.refresh_interval)
    }

    /// `true` if an API key is set.
    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    /// `true` if at least one symbol is selected.
    pub fn has_symbols(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// Replaces every field present in `update`, leaving the others alone.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(symbols) = update.symbols {
            self.symbols = symbols;
        }
        if let Some(credential) = update.credential {
            self.credential = credential;
        }
        if let Some(auto_refresh) = update.auto_refresh {
            self.auto_refresh = auto_refresh;
        }
        if let Some(refresh_interval) = update.refresh_interval {
            self.refresh_interval = refresh_interval;
        }
    }
}

pub(crate) fn validate_symbols(symbols: &[Ticker]) -> Result<()> {
    if symbols.len() > MAX_SYMBOLS {
        return Err(TrackerError::TooManySymbols(symbols.len()));
    }
    for (i, ticker) in symbols.iter().enumerate() {
        if symbols[..i].contains(ticker) {
            return Err(TrackerError::DuplicateSymbol(*ticker));
        }
    }
    Ok(())
}

pub(crate) fn validate_interval(secs: u32) -> Result<()> {
    if (MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL).contains(&secs) {
        Ok(())
    } else {
        Err(TrackerError::IntervalOutOfRange(secs))
    }
}

/// Partial attribute change emitted by the settings form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigUpdate {
    /// New symbol selection.
    pub symbols: Option<Vec<Ticker>>,
    /// New API key.
    pub credential: Option<String>,
    /// New auto-refresh flag.
    pub auto_refresh: Option<bool>,
    /// New auto-refresh period in seconds.
    pub refresh_interval: Option<u32>,
}

impl ConfigUpdate {
    /// `true` if the update carries no field.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_none()
            && self.credential.is_none()
            && self.auto_refresh.is_none()
            && self.refresh_interval.is_none()
    }
}
