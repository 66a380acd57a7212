//! Realized volatility from a closing-price series.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{PricerError, PricerResult};

/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum number of closing prices required before a volatility estimate is made
pub const MIN_OBSERVATIONS: usize = 30;

/// Default lookback window in trading days
pub const DEFAULT_LOOKBACK_DAYS: usize = 252;

/// How daily returns are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    /// Percentage change `c[i] / c[i-1] - 1`
    #[default]
    Simple,
    /// Log return `ln(c[i] / c[i-1])`
    Log,
}

/// Daily returns of a chronological closing-price series.
pub fn daily_returns(closes: &[f64], kind: ReturnKind) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| match kind {
            ReturnKind::Simple => w[1] / w[0] - 1.0,
            ReturnKind::Log => (w[1] / w[0]).ln(),
        })
        .collect()
}

/// Annualized sample standard deviation of daily returns, scaled by `sqrt(252)`.
///
/// Fails with `InsufficientData` when fewer than [`MIN_OBSERVATIONS`] closes
/// are supplied and with `InvalidInput` on non-positive or non-finite closes.
pub fn annualized_volatility(ticker: &str, closes: &[f64], kind: ReturnKind) -> PricerResult<f64> {
    if closes.len() < MIN_OBSERVATIONS {
        return Err(PricerError::insufficient_data(
            ticker,
            MIN_OBSERVATIONS,
            closes.len(),
        ));
    }
    if let Some(bad) = closes.iter().find(|c| !(c.is_finite() && **c > 0.0)) {
        return Err(PricerError::invalid_input(format!(
            "closing prices for {} must be positive and finite, got {}",
            ticker, bad
        )));
    }

    let returns = daily_returns(closes, kind);
    let daily_vol = returns.iter().std_dev();
    Ok(daily_vol * TRADING_DAYS_PER_YEAR.sqrt())
}

/// The last `lookback + 1` closes, i.e. the prices spanning `lookback` returns.
pub fn trailing_window(closes: &[f64], lookback: usize) -> &[f64] {
    let keep = lookback.saturating_add(1);
    &closes[closes.len().saturating_sub(keep)..]
}
