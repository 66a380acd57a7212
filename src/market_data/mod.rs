//! Market data collaborators
//!
//! Supplies the three inputs the pricer cannot compute itself:
//! - Spot: most recent close for a ticker
//! - Volatility: annualized realized volatility over a trailing window
//! - Rate: a statically configured risk-free proxy
//!
//! Backends:
//! - Yahoo Finance chart API (`YahooProvider`)
//! - Local CSV price history (`CsvProvider`)
//! - In-memory series (`FixedProvider`)

pub mod csv_source;
pub mod volatility;
pub mod yahoo;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PricerError, PricerResult};
use volatility::ReturnKind;

pub use csv_source::CsvProvider;
pub use volatility::{annualized_volatility, DEFAULT_LOOKBACK_DAYS, MIN_OBSERVATIONS};
pub use yahoo::YahooProvider;

/// Interface the pricer consumes for its market inputs.
///
/// Errors are surfaced to the caller as-is; implementations do not retry.
pub trait MarketDataProvider {
    /// Most recent closing price. `DataUnavailable` when there is no data.
    fn current_price(&self, ticker: &str) -> PricerResult<f64>;

    /// Annualized standard deviation of daily returns over `lookback_days`.
    /// `InsufficientData` when fewer than 30 observations exist.
    fn historical_volatility(&self, ticker: &str, lookback_days: usize) -> PricerResult<f64>;

    /// Current risk-free proxy rate.
    fn risk_free_rate(&self) -> PricerResult<f64>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn current_price(&self, ticker: &str) -> PricerResult<f64> {
        (**self).current_price(ticker)
    }

    fn historical_volatility(&self, ticker: &str, lookback_days: usize) -> PricerResult<f64> {
        (**self).historical_volatility(ticker, lookback_days)
    }

    fn risk_free_rate(&self) -> PricerResult<f64> {
        (**self).risk_free_rate()
    }
}

/// Everything fetched for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub spot: f64,
    pub sigma: f64,
    pub rate: f64,
}

impl MarketSnapshot {
    pub fn fetch<P: MarketDataProvider + ?Sized>(
        provider: &P,
        ticker: &str,
        lookback_days: usize,
    ) -> PricerResult<Self> {
        let spot = provider.current_price(ticker)?;
        let sigma = provider.historical_volatility(ticker, lookback_days)?;
        let rate = provider.risk_free_rate()?;
        tracing::debug!(ticker, spot, sigma, rate, "market snapshot");
        Ok(Self {
            ticker: ticker.to_string(),
            spot,
            sigma,
            rate,
        })
    }
}

/// Provider over in-memory closing-price series.
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    closes: HashMap<String, Vec<f64>>,
    rate: f64,
    return_kind: ReturnKind,
}

impl FixedProvider {
    pub fn new(rate: f64) -> Self {
        Self {
            closes: HashMap::new(),
            rate,
            return_kind: ReturnKind::default(),
        }
    }

    pub fn with_return_kind(mut self, kind: ReturnKind) -> Self {
        self.return_kind = kind;
        self
    }

    /// Register a chronological closing-price series for `ticker`.
    pub fn with_series(mut self, ticker: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(ticker.to_uppercase(), closes);
        self
    }

    fn series(&self, ticker: &str) -> PricerResult<&[f64]> {
        self.closes
            .get(&ticker.to_uppercase())
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| PricerError::data_unavailable(format!("no price history for {}", ticker)))
    }
}

impl MarketDataProvider for FixedProvider {
    fn current_price(&self, ticker: &str) -> PricerResult<f64> {
        let closes = self.series(ticker)?;
        closes
            .last()
            .copied()
            .ok_or_else(|| PricerError::data_unavailable(format!("no price history for {}", ticker)))
    }

    fn historical_volatility(&self, ticker: &str, lookback_days: usize) -> PricerResult<f64> {
        let closes = self.series(ticker)?;
        let window = volatility::trailing_window(closes, lookback_days);
        annualized_volatility(ticker, window, self.return_kind)
    }

    fn risk_free_rate(&self) -> PricerResult<f64> {
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i % 5) as f64).collect()
    }

    #[test]
    fn test_fixed_provider_spot_is_last_close() {
        let provider = FixedProvider::new(0.04).with_series("aapl", series(40));
        assert_eq!(provider.current_price("AAPL").unwrap(), 104.0);
        assert_eq!(provider.risk_free_rate().unwrap(), 0.04);
    }

    #[test]
    fn test_fixed_provider_unknown_ticker() {
        let provider = FixedProvider::new(0.04);
        assert!(matches!(
            provider.current_price("MSFT"),
            Err(PricerError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_snapshot_propagates_provider_errors() {
        let provider = FixedProvider::new(0.04).with_series("TINY", series(10));
        let err = MarketSnapshot::fetch(&provider, "TINY", 252).unwrap_err();
        assert!(matches!(err, PricerError::InsufficientData { available: 10, .. }));
    }

    #[test]
    fn test_snapshot_through_boxed_provider() {
        let provider: Box<dyn MarketDataProvider> =
            Box::new(FixedProvider::new(0.03).with_series("QQQ", series(60)));
        let snap = MarketSnapshot::fetch(&provider, "QQQ", 252).unwrap();
        assert_eq!(snap.ticker, "QQQ");
        assert_eq!(snap.rate, 0.03);
        assert!(snap.sigma > 0.0);
    }
}
