mod alert;
mod arbitrage;
mod config;
mod notify;
mod pipeline;
mod quotes;
mod types;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::MonitorConfig;
use crate::notify::Notifier;
use crate::notify::telegram::{TelegramConfig, TelegramNotifier};
use crate::quotes::QuoteFetcher;
use crate::quotes::naver::NaverQuotes;
use crate::quotes::yahoo::YahooQuotes;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[arg(long, default_value = "monitor.yml")]
    pub config: String,

    /// Send the report even when the spread is below the alert threshold.
    /// Scheduled runs use this so every invocation posts a digest.
    #[arg(long)]
    pub always_report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("arbwatch=debug".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = MonitorConfig::load(&args.config)?;

    let timeout = config.providers.request_timeout();
    let fetcher = QuoteFetcher::new(vec![
        Box::new(YahooQuotes::new(timeout)?),
        Box::new(NaverQuotes::new(
            timeout,
            config.providers.naver_codes.clone(),
        )?),
    ]);

    let notifier: Option<Box<dyn Notifier>> = match TelegramConfig::from_env() {
        Ok(telegram) => Some(Box::new(TelegramNotifier::new(telegram)?)),
        Err(error) => {
            warn!(%error, "running without telegram dispatch");
            None
        }
    };

    pipeline::run_once(&config, &fetcher, notifier.as_deref(), args.always_report).await
}
