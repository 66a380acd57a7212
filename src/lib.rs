//! # bsm-pricer: Black-Scholes-Merton European Option Pricing
//!
//! `bsm-pricer` computes theoretical prices of European calls and puts with the
//! Black-Scholes-Merton closed form, fed by market data for the underlying:
//! the latest close, annualized realized volatility and a static risk-free rate.
//!
//! ## Core Features
//!
//! - **Pricing Engine**: validated closed-form call/put prices with explicit
//!   expiry and zero-volatility handling
//! - **Market Data**: Yahoo Finance chart API, local CSV history, or in-memory series
//!   behind one [`MarketDataProvider`] trait
//! - **Realized Volatility**: simple or log daily returns annualized by `sqrt(252)`
//! - **Reporting**: text summary, JSON, and SVG price-vs-strike charts
//!
//! ## Quick Start
//!
//! ```rust
//! use bsm_pricer::{call_price, put_price};
//!
//! let call = call_price(100.0, 100.0, 1.0, 0.05, 0.2)?;
//! let put = put_price(100.0, 100.0, 1.0, 0.05, 0.2)?;
//! assert!((call - 10.45).abs() < 0.01);
//! assert!((put - 5.57).abs() < 0.01);
//! # Ok::<(), bsm_pricer::PricerError>(())
//! ```
//!
//! ## Pricing From Market Data
//!
//! ```rust,no_run
//! use bsm_pricer::{price_ticker, build_provider, PricerConfig};
//!
//! let config = PricerConfig::default();
//! let provider = build_provider(&config)?;
//! let summary = price_ticker(&provider, "AAPL", 230.0, 30, &config)?;
//! println!("{}", summary);
//! # Ok::<(), bsm_pricer::PricerError>(())
//! ```

// ================================================================================================
// MODULES
// ================================================================================================

pub mod chart;
pub mod config;
pub mod error;
pub mod market_data;
pub mod models;
pub mod report;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Pricing engine
pub use models::bs::{call_price, norm_cdf, price, put_price};
pub use models::types::{OptionPrices, OptionPricingRequest, OptionType};

// Errors and configuration
pub use config::{PricerConfig, ProviderKind};
pub use error::{PricerError, PricerResult};

// Market data
pub use market_data::volatility::ReturnKind;
pub use market_data::{
    CsvProvider, FixedProvider, MarketDataProvider, MarketSnapshot, YahooProvider,
};

pub use report::PriceSummary;

// ================================================================================================
// TOP-LEVEL API
// ================================================================================================

/// Construct the market-data backend selected by `config.provider`.
///
/// # Errors
///
/// * [`PricerError::Network`] if the HTTP client for the Yahoo backend cannot be built
pub fn build_provider(config: &PricerConfig) -> PricerResult<Box<dyn MarketDataProvider>> {
    let provider: Box<dyn MarketDataProvider> = match config.provider {
        ProviderKind::Yahoo => Box::new(YahooProvider::new(config)?),
        ProviderKind::Csv => Box::new(CsvProvider::from_config(config)),
    };
    tracing::debug!(provider = ?config.provider, "market data provider ready");
    Ok(provider)
}

/// Fetch market inputs for `ticker` and price a call and a put at `strike`.
///
/// # Arguments
///
/// * `provider` - Source of spot, volatility and rate
/// * `ticker` - Underlying symbol, e.g. `"AAPL"`
/// * `strike` - Strike price (K)
/// * `days_to_expiry` - Calendar days until expiry; `T = days / config.days_per_year`
/// * `config` - Lookback window and day count
///
/// # Errors
///
/// Provider failures (`DataUnavailable`, `InsufficientData`, `Network`, `Parse`) are
/// returned unmodified. Invalid pricing inputs yield `InvalidInput`.
pub fn price_ticker<P: MarketDataProvider + ?Sized>(
    provider: &P,
    ticker: &str,
    strike: f64,
    days_to_expiry: u32,
    config: &PricerConfig,
) -> PricerResult<PriceSummary> {
    let snapshot = MarketSnapshot::fetch(provider, ticker, config.lookback_days)?;
    PriceSummary::compute(&snapshot, strike, days_to_expiry, config.days_per_year)
}
