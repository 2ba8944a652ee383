use thiserror::Error;

use crate::types::ticker::Ticker;

/// A single provider failing is recoverable; the fetcher moves on to the
/// next provider in order.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response carried no usable price")]
    MissingPrice,

    #[error("no symbol mapping for ticker {0}")]
    UnknownTicker(Ticker),
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("all quote providers failed for {ticker}")]
    Unavailable { ticker: Ticker },
}
