use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::quotes::QuoteProvider;
use crate::quotes::errors::ProviderError;
use crate::types::price::Price;
use crate::types::ticker::Ticker;

const USER_AGENT: &str = "Mozilla/5.0";

/// Fallback source: the Naver Finance realtime polling endpoint. Naver keys
/// quotes by its own numeric item code, so the adapter carries a
/// ticker-to-code mapping from configuration.
#[derive(Debug, Clone)]
pub struct NaverQuotes {
    http: reqwest::Client,
    base_url: String,
    codes: HashMap<String, String>,
}

impl NaverQuotes {
    pub fn new(timeout: Duration, codes: HashMap<String, String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: "https://polling.finance.naver.com".to_string(),
            codes,
        })
    }
}

#[async_trait]
impl QuoteProvider for NaverQuotes {
    fn name(&self) -> &'static str {
        "naver"
    }

    async fn fetch_price(&self, ticker: &Ticker) -> Result<Price, ProviderError> {
        let code = self
            .codes
            .get(ticker.as_str())
            .ok_or_else(|| ProviderError::UnknownTicker(ticker.clone()))?;

        let url = format!("{}/api/realtime?query=SERVICE_ITEM:{}", self.base_url, code);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus(status));
        }

        let body = response.text().await?;
        parse_realtime_price(&body)
    }
}

fn parse_realtime_price(body: &str) -> Result<Price, ProviderError> {
    let envelope: RealtimeEnvelope = serde_json::from_str(body)
        .map_err(|error| ProviderError::MalformedResponse(error.to_string()))?;

    /* nv is the current price in KRW, always a whole number */
    let raw = envelope
        .result
        .areas
        .first()
        .and_then(|area| area.datas.first())
        .and_then(|item| item.nv)
        .ok_or(ProviderError::MissingPrice)?;

    if raw <= 0 {
        return Err(ProviderError::MissingPrice);
    }

    Ok(Price::new(Decimal::from(raw)))
}

#[derive(Debug, Deserialize)]
struct RealtimeEnvelope {
    result: RealtimeResult,
}

#[derive(Debug, Deserialize)]
struct RealtimeResult {
    areas: Vec<RealtimeArea>,
}

#[derive(Debug, Deserialize)]
struct RealtimeArea {
    datas: Vec<RealtimeItem>,
}

#[derive(Debug, Deserialize)]
struct RealtimeItem {
    nv: Option<i64>,
}
