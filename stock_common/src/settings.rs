//! Settings form rules.
//!
//! The settings form is the only place that mutates widget attributes. It
//! restricts selection to the ticker universe and to at most four entries,
//! and keeps the interval within range. The refresh controller trusts the
//! updates built here and does not validate them again.

use crate::config::{
    ConfigUpdate, MAX_SYMBOLS, WidgetConfig, validate_interval, validate_symbols,
};
use crate::messages::{Locale, Message};
use crate::result::Result;
use crate::tickers::Ticker;

/// Builder of validated attribute updates.
#[derive(Debug, Default)]
pub struct SettingsForm {
    update: ConfigUpdate,
}

impl SettingsForm {
    /// Empty form, no field touched yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `symbols`; more than four or duplicated symbols are rejected.
    pub fn symbols(mut self, symbols: Vec<Ticker>) -> Result<Self> {
        validate_symbols(&symbols)?;
        self.update.symbols = Some(symbols);
        Ok(self)
    }

    /// Sets the API key, trimming surrounding whitespace.
    pub fn credential(mut self, credential: &str) -> Self {
        self.update.credential = Some(credential.trim().to_string());
        self
    }

    /// Turns auto-refresh on or off.
    pub fn auto_refresh(mut self, enabled: bool) -> Self {
        self.update.auto_refresh = Some(enabled);
        self
    }

    /// Sets the auto-refresh period; values outside `5..=60` are rejected.
    pub fn refresh_interval(mut self, secs: u32) -> Result<Self> {
        validate_interval(secs)?;
        self.update.refresh_interval = Some(secs);
        Ok(self)
    }

    /// The update to hand to the refresh controller.
    pub fn build(self) -> ConfigUpdate {
        self.update
    }
}

/// Hint displayed under the symbol selector once the cap is reached.
pub fn symbols_help(config: &WidgetConfig, locale: Locale) -> Option<&'static str> {
    (config.symbols.len() >= MAX_SYMBOLS).then(|| locale.text(Message::MaxSymbolsReached))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;

    #[test]
    fn form_builds_update_with_touched_fields_only() {
        let update = SettingsForm::new()
            .credential("  abc123 ")
            .auto_refresh(true)
            .build();
        assert_eq!(update.credential.as_deref(), Some("abc123"));
        assert_eq!(update.auto_refresh, Some(true));
        assert!(update.symbols.is_none());
        assert!(update.refresh_interval.is_none());
    }

    #[test]
    fn form_rejects_fifth_symbol() {
        let result = SettingsForm::new().symbols(vec![
            Ticker::AAPL,
            Ticker::MSFT,
            Ticker::GOOGL,
            Ticker::AMZN,
            Ticker::NFLX,
        ]);
        assert!(matches!(result, Err(TrackerError::TooManySymbols(5))));
    }

    #[test]
    fn form_rejects_interval_out_of_range() {
        assert!(SettingsForm::new().refresh_interval(4).is_err());
        assert!(SettingsForm::new().refresh_interval(61).is_err());
        let update = SettingsForm::new().refresh_interval(60).unwrap().build();
        assert_eq!(update.refresh_interval, Some(60));
    }

    #[test]
    fn help_appears_at_cap() {
        let mut config = WidgetConfig {
            symbols: vec![Ticker::AAPL, Ticker::MSFT, Ticker::GOOGL],
            ..Default::default()
        };
        assert_eq!(symbols_help(&config, Locale::En), None);
        config.symbols.push(Ticker::TSLA);
        assert_eq!(
            symbols_help(&config, Locale::Fr),
            Some("Nombre maximum de symboles atteint (4)")
        );
    }
}
