use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::arbitrage::snapshot::{ArbitrageSnapshot, RecommendedAction};

#[derive(Debug, Clone)]
pub struct AlertDecision {
    pub snapshot: ArbitrageSnapshot,
    pub should_alert: bool,
    pub message: String,
}

/// Threshold check is on the raw spread, inclusive: a spread exactly at the
/// threshold alerts.
pub fn decide(
    snapshot: ArbitrageSnapshot,
    threshold_pct: Decimal,
    generated_at: DateTime<Utc>,
) -> AlertDecision {
    let should_alert = snapshot.spread_pct.abs() >= threshold_pct;
    let message = format_message(&snapshot, threshold_pct, should_alert, generated_at);

    AlertDecision {
        snapshot,
        should_alert,
        message,
    }
}

fn format_message(
    snapshot: &ArbitrageSnapshot,
    threshold_pct: Decimal,
    should_alert: bool,
    generated_at: DateTime<Utc>,
) -> String {
    let quote_a = &snapshot.quote_a;
    let quote_b = &snapshot.quote_b;

    let mut message = String::new();

    if should_alert {
        message.push_str(&format!(
            "ALERT: spread at or above the {}% threshold\n\n",
            threshold_pct.round_dp(2)
        ));
    }

    message.push_str(&format!(
        "Merger arbitrage check {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    message.push_str("Prices\n");
    message.push_str(&format!(
        "{}: {} ({})\n",
        quote_a.ticker, quote_a.price, quote_a.source
    ));
    message.push_str(&format!(
        "{}: {} ({})\n",
        quote_b.ticker, quote_b.price, quote_b.source
    ));
    message.push_str(&format!(
        "conversion ratio: {}\n\n",
        snapshot.conversion_ratio
    ));

    message.push_str("Analysis\n");
    message.push_str(&format!(
        "implied {} parity: {}\n",
        quote_a.ticker, snapshot.implied_price
    ));
    message.push_str(&format!(
        "spread vs parity: {}%\n",
        signed_pct(snapshot.spread_pct)
    ));
    message.push_str(&format!(
        "after round-trip costs: {}%\n\n",
        signed_pct(snapshot.cost_adjusted_spread_pct)
    ));

    message.push_str(&format!("Recommendation: {}\n", describe_action(snapshot)));

    message
}

fn signed_pct(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() {
        rounded.to_string()
    } else {
        format!("+{rounded}")
    }
}

fn describe_action(snapshot: &ArbitrageSnapshot) -> String {
    match snapshot.recommended_action {
        RecommendedAction::BuyViaConversion => format!(
            "buy {} and convert at the merger ratio",
            snapshot.quote_b.ticker
        ),
        RecommendedAction::BuyDirect => format!("buy {} directly", snapshot.quote_a.ticker),
        RecommendedAction::Hold => "hold; edge does not clear round-trip costs".to_string(),
    }
}
