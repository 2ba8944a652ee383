use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::ticker::Ticker;

/// Read once at startup and passed into each component; nothing here is
/// mutated after load.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub pair: PairConfig,

    /// Alert when |spread| reaches this many percent (inclusive).
    pub alert_threshold_pct: Decimal,

    /// Round-trip transaction cost deducted from the spread magnitude
    /// before recommending an action.
    pub round_trip_cost_pct: Decimal,

    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    /// The instrument that can also be acquired via `ticker_b` plus
    /// conversion.
    pub ticker_a: Ticker,
    pub ticker_b: Ticker,

    /// Shares of A received per share of B, fixed by the deal terms.
    pub conversion_ratio: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub request_timeout_secs: u64,

    /// Naver Finance item codes keyed by ticker symbol, for the fallback
    /// provider.
    #[serde(default)]
    pub naver_codes: HashMap<String, String>,
}

impl MonitorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        let config: MonitorConfig = serde_yaml::from_str(raw).context("failed to parse config")?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pair.conversion_ratio <= Decimal::ZERO {
            bail!("conversion_ratio must be > 0");
        }
        if self.alert_threshold_pct < Decimal::ZERO {
            bail!("alert_threshold_pct must be >= 0");
        }
        if self.round_trip_cost_pct < Decimal::ZERO {
            bail!("round_trip_cost_pct must be >= 0");
        }
        if self.providers.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be > 0");
        }
        Ok(())
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
