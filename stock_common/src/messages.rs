//! Localized user-facing strings.
//!
//! The widget ships with English and French texts. `Message::FetchFailed` is
//! the fixed fallback shown when a fetch error carries no message of its own.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Display language of the widget.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// French.
    Fr,
}

/// Keys of the strings the widget displays.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Message {
    WidgetTitle,
    CredentialMissing,
    NoSymbols,
    FetchFailed,
    MaxSymbolsReached,
    Loading,
    LastUpdated,
    Retry,
}

impl Locale {
    /// Text for `message` in this locale.
    pub fn text(self, message: Message) -> &'static str {
        match (self, message) {
            (_, Message::WidgetTitle) => "Stock Tracker",
            (Locale::En, Message::CredentialMissing) => {
                "Please enter your Finnhub API key in the block settings."
            }
            (Locale::Fr, Message::CredentialMissing) => {
                "Veuillez saisir votre clé API Finnhub dans les paramètres du bloc."
            }
            (Locale::En, Message::NoSymbols) => {
                "Please select at least one stock symbol in the block settings."
            }
            (Locale::Fr, Message::NoSymbols) => {
                "Veuillez sélectionner au moins un symbole d'action dans les paramètres du bloc."
            }
            (Locale::En, Message::FetchFailed) => "Error while fetching stock data",
            (Locale::Fr, Message::FetchFailed) => "Erreur lors de la récupération des données",
            (Locale::En, Message::MaxSymbolsReached) => "Maximum number of symbols reached (4)",
            (Locale::Fr, Message::MaxSymbolsReached) => "Nombre maximum de symboles atteint (4)",
            (Locale::En, Message::Loading) => "Loading...",
            (Locale::Fr, Message::Loading) => "Chargement...",
            (Locale::En, Message::LastUpdated) => "Last updated",
            (Locale::Fr, Message::LastUpdated) => "Dernière mise à jour",
            (Locale::En, Message::Retry) => "Type 'r' to retry",
            (Locale::Fr, Message::Retry) => "Tapez 'r' pour réessayer",
        }
    }
}
