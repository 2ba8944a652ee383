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

/// Primary source: the Yahoo Finance chart endpoint. The price is taken
/// from `chart.result[0].meta.regularMarketPrice`.
#[derive(Debug, Clone)]
pub struct YahooQuotes {
    http: reqwest::Client,
    base_url: String,
}

impl YahooQuotes {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooQuotes {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_price(&self, ticker: &Ticker) -> Result<Price, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus(status));
        }

        let body = response.text().await?;
        parse_chart_price(&body)
    }
}

fn parse_chart_price(body: &str) -> Result<Price, ProviderError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|error| ProviderError::MalformedResponse(error.to_string()))?;

    let raw = envelope
        .chart
        .result
        .as_ref()
        .and_then(|series| series.first())
        .and_then(|series| series.meta.regular_market_price)
        .ok_or(ProviderError::MissingPrice)?;

    let value = Decimal::try_from(raw)
        .map_err(|error| ProviderError::MalformedResponse(error.to_string()))?;

    if value <= Decimal::ZERO {
        return Err(ProviderError::MissingPrice);
    }

    Ok(Price::new(value))
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartPayload,
}

#[derive(Debug, Deserialize)]
struct ChartPayload {
    result: Option<Vec<ChartSeries>>,
}

#[derive(Debug, Deserialize)]
struct ChartSeries {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_regular_market_price() {
        let body = r#"{"chart":{"result":[{"meta":{"currency":"KRW","symbol":"329180.KS","regularMarketPrice":10000.0}}],"error":null}}"#;

        let price = parse_chart_price(body).unwrap();

        assert_eq!(price.as_decimal(), dec!(10000));
    }

    #[test]
    fn missing_price_field_is_a_provider_failure() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"329180.KS"}}],"error":null}}"#;

        assert!(matches!(
            parse_chart_price(body),
            Err(ProviderError::MissingPrice)
        ));
    }

    #[test]
    fn non_positive_price_is_a_provider_failure() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":0.0}}],"error":null}}"#;

        assert!(matches!(
            parse_chart_price(body),
            Err(ProviderError::MissingPrice)
        ));
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_chart_price("<html>rate limited</html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
    }
}
