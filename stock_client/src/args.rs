//! Command-line arguments for the stock client.
//!
//! This module defines the CLI interface using `clap`. Flags override the
//! attributes file given with `--config`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use stock_common::settings::SettingsForm;
use stock_common::{Locale, Ticker, WidgetConfig};

use crate::error::ClientError;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Widget attributes file (JSON with `stockSymbols`, `apiKey`, `autoRefresh`,
    /// `refreshInterval`).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Symbols to display, comma separated, at most 4.
    #[clap(long, value_enum, value_delimiter = ',', ignore_case = true)]
    pub symbols: Option<Vec<Ticker>>,

    /// Finnhub API key.
    #[clap(long)]
    pub api_key: Option<String>,

    /// File holding a default API key, used when none is configured.
    #[clap(long, default_value = ".key")]
    pub key_file: PathBuf,

    /// Re-fetch quotes periodically (`true` or `false`).
    #[clap(long, action = ArgAction::Set)]
    pub auto_refresh: Option<bool>,

    /// Auto-refresh period in seconds.
    #[clap(long, value_parser = clap::value_parser!(u32).range(5..=60))]
    pub interval: Option<u32>,

    /// Display language.
    #[clap(long, value_enum, default_value_t = Locale::En)]
    pub locale: Locale,

    /// Finnhub API root, e.g. for a proxy.
    #[clap(long)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[clap(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Fetch once, print the grid and exit.
    #[clap(long)]
    pub once: bool,
}

impl Args {
    /// Widget attributes: the attributes file (or defaults) with flags applied on top.
    pub fn widget_config(&self) -> Result<WidgetConfig, ClientError> {
        let mut config = match &self.config {
            Some(path) => WidgetConfig::load(path)?,
            None => WidgetConfig::default(),
        };

        let mut form = SettingsForm::new();
        if let Some(symbols) = &self.symbols {
            form = form.symbols(symbols.clone())?;
        }
        if let Some(key) = &self.api_key {
            form = form.credential(key);
        }
        if let Some(enabled) = self.auto_refresh {
            form = form.auto_refresh(enabled);
        }
        if let Some(secs) = self.interval {
            form = form.refresh_interval(secs)?;
        }
        config.apply(form.build());
        Ok(config)
    }
}
