//! Interactive operator dialog for configuring a tracking session.
//!
//! Invalid input (empty ticker, non-positive numbers, unparseable text) is
//! rejected here and the engine simply asks again on its next tick; nothing
//! invalid ever reaches the reconciliation loop.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sentinel_core::{RiskSettings, SettingsProvider};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Operator input over stdin. Each `next_settings` call runs one prompt
/// round on a blocking thread.
pub struct StdinSettingsProvider;

#[async_trait]
impl SettingsProvider for StdinSettingsProvider {
    async fn next_settings(&mut self) -> Result<Option<RiskSettings>> {
        tokio::task::spawn_blocking(prompt_round).await?
    }
}

fn prompt_round() -> Result<Option<RiskSettings>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock();

    let ticker = prompt(&mut lines, ">> Ticker to protect (e.g. BTC): ")?;
    let Some(symbol) = build_symbol(&ticker) else {
        println!("Ticker cannot be empty.");
        return Ok(None);
    };

    let budget_raw = prompt(&mut lines, &format!(">> Max loss in USDT for {symbol}: "))?;
    let Some(budget) = parse_positive_decimal(&budget_raw) else {
        println!("Max loss must be a positive number.");
        return Ok(None);
    };

    let choice = prompt(&mut lines, ">> Set an automatic take-profit? (y/N): ")?;
    let take_profit = if choice.trim().eq_ignore_ascii_case("y") {
        let pct_raw = prompt(&mut lines, ">> Take-profit percentage (e.g. 1.5): ")?;
        let pct = parse_positive_decimal(&pct_raw);
        if pct.is_none() {
            println!("Invalid percentage; take-profit will not be set.");
        }
        pct
    } else {
        None
    };

    Ok(Some(RiskSettings::new(symbol, budget, take_profit)?))
}

fn prompt(lines: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    lines.read_line(&mut line)?;
    Ok(line)
}

/// Upper-cases the ticker and appends the quote suffix; `None` for blank
/// input.
fn build_symbol(ticker: &str) -> Option<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        None
    } else {
        Some(format!("{ticker}USDT"))
    }
}

/// Parses a strictly positive decimal; `None` for anything else.
fn parse_positive_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|value| *value > Decimal::ZERO)
}
