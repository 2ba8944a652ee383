use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::alert::decision;
use crate::arbitrage::calculator;
use crate::config::MonitorConfig;
use crate::notify::Notifier;
use crate::quotes::QuoteFetcher;
use crate::types::quote::Quote;
use crate::types::ticker::Ticker;

/// One stateless pass: fetch both quotes, compute the spread, decide, and
/// dispatch. A ticker with no available quote skips the run; a delivery
/// failure is logged but the run still counts as successful.
pub async fn run_once(
    config: &MonitorConfig,
    fetcher: &QuoteFetcher,
    notifier: Option<&dyn Notifier>,
    always_report: bool,
) -> Result<()> {
    let Some(quote_a) = fetch_or_skip(fetcher, &config.pair.ticker_a).await else {
        return Ok(());
    };
    let Some(quote_b) = fetch_or_skip(fetcher, &config.pair.ticker_b).await else {
        return Ok(());
    };

    info!(
        ticker_a = %quote_a.ticker,
        price_a = %quote_a.price,
        source_a = %quote_a.source,
        ticker_b = %quote_b.ticker,
        price_b = %quote_b.price,
        source_b = %quote_b.source,
        "quotes collected"
    );

    let snapshot = calculator::compute(
        quote_a,
        quote_b,
        config.pair.conversion_ratio,
        config.round_trip_cost_pct,
    );

    info!(
        implied_price = %snapshot.implied_price,
        spread_pct = %snapshot.spread_pct.round_dp(4),
        cost_adjusted_pct = %snapshot.cost_adjusted_spread_pct.round_dp(4),
        action = %snapshot.recommended_action,
        "spread computed"
    );

    let decision = decision::decide(snapshot, config.alert_threshold_pct, Utc::now());

    if !decision.should_alert && !always_report {
        info!(
            threshold_pct = %config.alert_threshold_pct,
            "spread below threshold; nothing to send"
        );
        return Ok(());
    }

    match notifier {
        None => {
            warn!("no notification credentials; report not dispatched");
        }
        Some(notifier) => match notifier.send(&decision.message).await {
            Ok(()) => info!(alert = decision.should_alert, "report dispatched"),
            Err(error) => {
                warn!(%error, "notification delivery failed; run still successful");
            }
        },
    }

    Ok(())
}

async fn fetch_or_skip(fetcher: &QuoteFetcher, ticker: &Ticker) -> Option<Quote> {
    match fetcher.get_quote(ticker).await {
        Ok(quote) => Some(quote),
        Err(error) => {
            warn!(%error, "skipping this run");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::{PairConfig, ProviderConfig};
    use crate::quotes::QuoteProvider;
    use crate::quotes::errors::ProviderError;
    use crate::types::price::Price;

    struct FixedProvider {
        prices: HashMap<String, Decimal>,
    }

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_price(&self, ticker: &Ticker) -> Result<Price, ProviderError> {
            self.prices
                .get(ticker.as_str())
                .copied()
                .map(Price::new)
                .ok_or(ProviderError::MissingPrice)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl QuoteProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_price(&self, _ticker: &Ticker) -> Result<Price, ProviderError> {
            Err(ProviderError::MissingPrice)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            pair: PairConfig {
                ticker_a: Ticker::new("A"),
                ticker_b: Ticker::new("B"),
                conversion_ratio: dec!(0.5),
            },
            alert_threshold_pct: dec!(2.0),
            round_trip_cost_pct: dec!(0.30),
            providers: ProviderConfig {
                request_timeout_secs: 5,
                naver_codes: HashMap::new(),
            },
        }
    }

    fn fetcher_with(price_a: Decimal, price_b: Decimal) -> QuoteFetcher {
        let mut prices = HashMap::new();
        prices.insert("A".to_string(), price_a);
        prices.insert("B".to_string(), price_b);

        QuoteFetcher::new(vec![Box::new(FixedProvider { prices })])
    }

    #[tokio::test]
    async fn unavailable_quote_skips_without_dispatch() {
        let fetcher = QuoteFetcher::new(vec![Box::new(FailingProvider)]);
        let notifier = RecordingNotifier::default();

        run_once(&test_config(), &fetcher, Some(&notifier), true)
            .await
            .unwrap();

        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn spread_at_threshold_dispatches_an_alert() {
        /* implied parity 10000, so 10200 sits exactly on the 2% threshold */
        let fetcher = fetcher_with(dec!(10200), dec!(20000));
        let notifier = RecordingNotifier::default();

        run_once(&test_config(), &fetcher, Some(&notifier), false)
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("ALERT:"));
    }

    #[tokio::test]
    async fn below_threshold_sends_nothing_by_default() {
        let fetcher = fetcher_with(dec!(10100), dec!(20000));
        let notifier = RecordingNotifier::default();

        run_once(&test_config(), &fetcher, Some(&notifier), false)
            .await
            .unwrap();

        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn always_report_sends_even_below_threshold() {
        let fetcher = fetcher_with(dec!(10100), dec!(20000));
        let notifier = RecordingNotifier::default();

        run_once(&test_config(), &fetcher, Some(&notifier), true)
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Merger arbitrage check"));
    }

    #[tokio::test]
    async fn missing_notifier_still_succeeds() {
        let fetcher = fetcher_with(dec!(10300), dec!(20000));

        run_once(&test_config(), &fetcher, None, false).await.unwrap();
    }
}
