use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PricerResult;
use crate::market_data::MarketSnapshot;
use crate::models::{types::OptionPricingRequest, utils::years_from_days};

/// Fetched inputs and resulting prices for one ticker/strike/expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub ticker: String,
    /// Spot price (S)
    pub spot: f64,
    /// Annualized volatility (σ)
    pub sigma: f64,
    /// Risk-free rate (r)
    pub rate: f64,
    pub days_to_expiry: u32,
    /// Time to expiry in years (T)
    pub years_to_exp: f64,
    /// Strike price (K)
    pub strike: f64,
    pub call: f64,
    pub put: f64,
}

impl PriceSummary {
    pub fn compute(
        snapshot: &MarketSnapshot,
        strike: f64,
        days_to_expiry: u32,
        days_per_year: f64,
    ) -> PricerResult<Self> {
        let years_to_exp = years_from_days(f64::from(days_to_expiry), days_per_year)?;
        let request = OptionPricingRequest::new(
            snapshot.spot,
            strike,
            years_to_exp,
            snapshot.rate,
            snapshot.sigma,
        );
        let prices = request.prices()?;

        Ok(Self {
            ticker: snapshot.ticker.clone(),
            spot: snapshot.spot,
            sigma: snapshot.sigma,
            rate: snapshot.rate,
            days_to_expiry,
            years_to_exp,
            strike,
            call: prices.call,
            put: prices.put,
        })
    }

    pub fn request(&self) -> OptionPricingRequest {
        OptionPricingRequest::new(self.spot, self.strike, self.years_to_exp, self.rate, self.sigma)
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Black-Scholes Option Pricer ===")?;
        writeln!(f, "Stock: {}", self.ticker)?;
        writeln!(f, "Current Price (S): ${:.2}", self.spot)?;
        writeln!(f, "Annualized Volatility (σ): {:.2}%", self.sigma * 100.0)?;
        writeln!(f, "Risk-Free Rate (r): {:.2}%", self.rate * 100.0)?;
        writeln!(
            f,
            "Time to Expiry (T): {} days ({:.4} years)",
            self.days_to_expiry, self.years_to_exp
        )?;
        writeln!(f, "Strike Price (K): ${:.2}", self.strike)?;
        writeln!(f)?;
        writeln!(f, "Theoretical Call Option Price: ${:.2}", self.call)?;
        write!(f, "Theoretical Put Option Price: ${:.2}", self.put)
    }
}
