use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PricerError, PricerResult};
use crate::models::bs;

/// Which side of the contract is being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff at exercise: `max(S - K, 0)` for a call, `max(K - S, 0)` for a put.
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricerError::invalid_input(format!(
                "Invalid option type: {}",
                other
            ))),
        }
    }
}

/// The five inputs of a single Black-Scholes-Merton valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPricingRequest {
    /// Spot price of the underlying (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Time to maturity in years (T)
    pub years_to_exp: f64,
    /// Annualized risk-free rate (r)
    pub rate: f64,
    /// Annualized volatility (as decimal, e.g., 0.20 for 20%)
    pub sigma: f64,
}

impl OptionPricingRequest {
    pub fn new(spot: f64, strike: f64, years_to_exp: f64, rate: f64, sigma: f64) -> Self {
        Self {
            spot,
            strike,
            years_to_exp,
            rate,
            sigma,
        }
    }

    pub fn validate(&self) -> PricerResult<()> {
        bs::validate_inputs(
            self.spot,
            self.strike,
            self.years_to_exp,
            self.rate,
            self.sigma,
        )
    }

    pub fn price(&self, option_type: OptionType) -> PricerResult<f64> {
        bs::price(
            option_type,
            self.spot,
            self.strike,
            self.years_to_exp,
            self.rate,
            self.sigma,
        )
    }

    pub fn call(&self) -> PricerResult<f64> {
        self.price(OptionType::Call)
    }

    pub fn put(&self) -> PricerResult<f64> {
        self.price(OptionType::Put)
    }

    /// Price both sides at once.
    pub fn prices(&self) -> PricerResult<OptionPrices> {
        Ok(OptionPrices {
            call: self.call()?,
            put: self.put()?,
        })
    }
}

/// Call and put prices for the same request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPrices {
    pub call: f64,
    pub put: f64,
}

impl OptionPrices {
    pub fn get(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(105.0, 100.0), 5.0);
        assert_eq!(OptionType::Call.intrinsic(95.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(95.0, 100.0), 5.0);
        assert_eq!(OptionType::Put.intrinsic(105.0, 100.0), 0.0);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("CALL".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("p".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_request_matches_free_functions() {
        let req = OptionPricingRequest::new(100.0, 100.0, 1.0, 0.05, 0.2);
        let prices = req.prices().unwrap();
        assert_eq!(prices.call, bs::call_price(100.0, 100.0, 1.0, 0.05, 0.2).unwrap());
        assert_eq!(prices.put, bs::put_price(100.0, 100.0, 1.0, 0.05, 0.2).unwrap());
        assert_eq!(prices.get(OptionType::Put), prices.put);
    }

    #[test]
    fn test_request_validation() {
        assert!(OptionPricingRequest::new(100.0, 100.0, 1.0, 0.05, 0.2)
            .validate()
            .is_ok());
        assert!(matches!(
            OptionPricingRequest::new(100.0, -5.0, 1.0, 0.05, 0.2).prices(),
            Err(PricerError::InvalidInput(_))
        ));
    }
}
