//! Ticker symbols the widget can display.
//!
//! The settings form offers a curated list of large caps; anything else is
//! rejected at parse time so the rest of the workspace can rely on the type.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::TrackerError;
use crate::result::Result;

/// Set of supported ticker symbols, in the order of their display labels.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AMZN,
    AAPL,
    GOOGL,
    META,
    MSFT,
    NFLX,
    NVDA,
    TSLA,
}

impl Ticker {
    /// Company label shown by the settings form, e.g. `Apple (AAPL)`.
    pub fn label(&self) -> String {
        let company = match self {
            Ticker::AMZN => "Amazon",
            Ticker::AAPL => "Apple",
            Ticker::GOOGL => "Google",
            Ticker::META => "Meta",
            Ticker::MSFT => "Microsoft",
            Ticker::NFLX => "Netflix",
            Ticker::NVDA => "NVIDIA",
            Ticker::TSLA => "Tesla",
        };
        format!("{} ({})", company, self)
    }

    /// All selectable tickers as settings form options.
    pub fn all() -> Vec<Ticker> {
        Ticker::iter().collect()
    }

    /// Parses a list of symbols separated by commas, spaces, or new lines.
    ///
    /// Order is preserved and empty items are skipped. Returns an error for the
    /// first symbol that is not part of the universe.
    pub fn parse_list(text: &str) -> Result<Vec<Ticker>> {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse::<Ticker>()
                    .map_err(|_| TrackerError::UnknownTicker(item.to_string()))
            })
            .collect()
    }
}
