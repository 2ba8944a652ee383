pub mod errors;
pub mod naver;
pub mod yahoo;

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::quotes::errors::{ProviderError, QuoteError};
use crate::types::price::Price;
use crate::types::quote::{Quote, QuoteSource};
use crate::types::ticker::Ticker;

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_price(&self, ticker: &Ticker) -> Result<Price, ProviderError>;
}

/// Ordered provider strategies: the first is the primary source, everything
/// after it is a fallback. Providers are tried in order until one succeeds.
pub struct QuoteFetcher {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteFetcher {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        assert!(!providers.is_empty(), "at least one quote provider required");

        Self { providers }
    }

    pub async fn get_quote(&self, ticker: &Ticker) -> Result<Quote, QuoteError> {
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.fetch_price(ticker).await {
                Ok(price) => {
                    let source = if index == 0 {
                        QuoteSource::Primary
                    } else {
                        QuoteSource::Secondary
                    };

                    return Ok(Quote {
                        ticker: ticker.clone(),
                        price,
                        source,
                        fetched_at: Utc::now(),
                    });
                }
                Err(error) => {
                    warn!(
                        provider = provider.name(),
                        %ticker,
                        %error,
                        "quote provider failed; trying next"
                    );
                }
            }
        }

        Err(QuoteError::Unavailable {
            ticker: ticker.clone(),
        })
    }
}

impl fmt::Debug for QuoteFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteFetcher")
            .field("providers_count", &self.providers.len())
            .finish()
    }
}
