use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::price::Price;
use crate::types::ticker::Ticker;

/// A single observed price, valid for one pipeline run only.
#[derive(Debug, Clone)]
pub struct Quote {
    pub ticker: Ticker,
    pub price: Price,
    pub source: QuoteSource,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuoteSource {
    Primary,
    Secondary,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(formatter, "primary"),
            Self::Secondary => write!(formatter, "secondary"),
        }
    }
}
