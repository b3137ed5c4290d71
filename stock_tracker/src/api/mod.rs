//! API client boundary.
//!
//! The refresh controller only depends on the mapping-or-failure contract of
//! [`QuoteApi`]; the wire format belongs to the provider implementation.

mod finnhub;

use async_trait::async_trait;
use reqwest::StatusCode;
use stock_common::{QuoteResult, Ticker};
use thiserror::Error;

pub use finnhub::{FinnhubClient, FinnhubConfig};

/// Failure of one fetch cycle. `Display` is the message shown to the author.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure (DNS, TLS, timeout, connection reset...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The provider rejected the API key.
    #[error("Invalid or unauthorized API key")]
    Unauthorized,
    /// The provider refused the request because of its quota.
    #[error("API rate limit exceeded")]
    RateLimited,
    /// Any other non-success HTTP status.
    #[error("Request failed with status {status}: {body}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, cut to a readable length.
        body: String,
    },
    /// The provider answered with an error message of its own.
    #[error("{0}")]
    Provider(String),
    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Payload(String),
    /// The provider has no data for the symbol.
    #[error("No data available for {0}")]
    NoData(Ticker),
    /// Failure without any message.
    #[error("")]
    Unknown,
}

impl FetchError {
    /// Author-facing message, or `None` if the error carries none.
    pub fn message(&self) -> Option<String> {
        let text = self.to_string();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Source of quotes for a set of symbols.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    /// Fetches the latest quote of every symbol in `symbols` using `credential`.
    ///
    /// Either every symbol is resolved or the whole cycle fails.
    async fn fetch_quotes(
        &self,
        symbols: &[Ticker],
        credential: &str,
    ) -> Result<QuoteResult, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_none_only_for_silent_errors() {
        assert_eq!(FetchError::Unknown.message(), None);
        assert_eq!(FetchError::Provider("  ".into()).message(), None);
        assert_eq!(
            FetchError::NoData(Ticker::AAPL).message().as_deref(),
            Some("No data available for AAPL")
        );
        assert_eq!(
            FetchError::Provider("API limit reached".into()).message().as_deref(),
            Some("API limit reached")
        );
    }
}
