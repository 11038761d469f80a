//! Error types for the market data crate.

use thiserror::Error;
use yahoo_finance_api::YahooError;

/// Errors that can occur during market data operations.
///
/// Transient errors (rate limiting, timeouts) are candidates for retry with
/// backoff; terminal errors (bad symbol, empty range) are not.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has no quotes in the requested period.
    #[error("No data for date range")]
    NoDataForRange,

    /// The provider rate limited the request.
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

impl MarketDataError {
    /// Whether retrying the same request may succeed.
    ///
    /// Rate limits and timeouts clear on their own; unknown symbols and
    /// empty ranges do not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout { .. })
    }
}

impl From<YahooError> for MarketDataError {
    fn from(error: YahooError) -> Self {
        match error {
            YahooError::FetchFailed(message) => {
                if message.contains("429") || message.contains("Too Many Requests") {
                    MarketDataError::RateLimited {
                        provider: "YAHOO".to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: "YAHOO".to_string(),
                        message,
                    }
                }
            }
            YahooError::NoQuotes | YahooError::NoResult => MarketDataError::NoDataForRange,
            other => MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: other.to_string(),
            },
        }
    }
}
