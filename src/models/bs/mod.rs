// Closed-form Black-Scholes-Merton pricing for European calls and puts on a
// non-dividend-paying underlying. Inputs are validated up front; expiry and
// zero volatility are answered in closed form without touching ln/sqrt.

use crate::error::{PricerError, PricerResult};
use crate::models::types::OptionType;

/// Standard normal CDF, `0.5 * erfc(-x / sqrt(2))`.
///
/// `erfc` keeps full relative precision deep in the lower tail, where
/// `1 + erf(x)` would cancel.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / std::f64::consts::SQRT_2)
}

#[allow(non_snake_case)]
pub fn d1(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> f64 {
    ((S / K).ln() + (r + 0.5 * sigma.powi(2)) * T) / (sigma * T.sqrt())
}

#[allow(non_snake_case)]
pub fn d2(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> f64 {
    d1(S, K, T, r, sigma) - sigma * T.sqrt()
}

/// Check the pricing preconditions: `S > 0`, `K > 0`, `T >= 0`, `sigma >= 0`
/// and every input finite.
#[allow(non_snake_case)]
pub fn validate_inputs(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> PricerResult<()> {
    if !(S.is_finite() && S > 0.0) {
        return Err(PricerError::invalid_input(format!(
            "spot price must be positive and finite, got {}",
            S
        )));
    }
    if !(K.is_finite() && K > 0.0) {
        return Err(PricerError::invalid_input(format!(
            "strike price must be positive and finite, got {}",
            K
        )));
    }
    if !(T.is_finite() && T >= 0.0) {
        return Err(PricerError::invalid_input(format!(
            "time to maturity must be non-negative and finite, got {}",
            T
        )));
    }
    if !r.is_finite() {
        return Err(PricerError::invalid_input(format!(
            "risk-free rate must be finite, got {}",
            r
        )));
    }
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(PricerError::invalid_input(format!(
            "volatility must be non-negative and finite, got {}",
            sigma
        )));
    }
    Ok(())
}

/// Price of a European call option under Black-Scholes assumptions.
///
/// At `T == 0` this is the intrinsic value `max(S - K, 0)`. With `sigma == 0`
/// and `T > 0` it is the discounted-intrinsic limit `max(S - K*exp(-rT), 0)`.
#[allow(non_snake_case)]
pub fn call_price(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> PricerResult<f64> {
    price(OptionType::Call, S, K, T, r, sigma)
}

/// Price of a European put option under Black-Scholes assumptions.
///
/// At `T == 0` this is the intrinsic value `max(K - S, 0)`. With `sigma == 0`
/// and `T > 0` it is the discounted-intrinsic limit `max(K*exp(-rT) - S, 0)`.
#[allow(non_snake_case)]
pub fn put_price(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> PricerResult<f64> {
    price(OptionType::Put, S, K, T, r, sigma)
}

/// Price either side of the contract.
#[allow(non_snake_case)]
pub fn price(
    option_type: OptionType,
    S: f64,
    K: f64,
    T: f64,
    r: f64,
    sigma: f64,
) -> PricerResult<f64> {
    validate_inputs(S, K, T, r, sigma)?;

    if T == 0.0 {
        return Ok(option_type.intrinsic(S, K));
    }

    let discounted_strike = K * (-r * T).exp();
    if !discounted_strike.is_finite() {
        return Err(PricerError::invalid_input(format!(
            "discount factor overflows for r={} T={}",
            r, T
        )));
    }
    if sigma == 0.0 {
        return Ok(option_type.intrinsic(S, discounted_strike));
    }

    let d1 = d1(S, K, T, r, sigma);
    let d2 = d1 - sigma * T.sqrt();

    let value = match option_type {
        OptionType::Call => S * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - S * norm_cdf(-d1),
    };
    // NaN.max(0.0) is 0.0, so check before clamping
    if !value.is_finite() {
        return Err(PricerError::invalid_input(format!(
            "inputs produce a non-finite price ({})",
            value
        )));
    }
    Ok(value.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_cdf_reference_values() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-16);
        assert!((norm_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-15);
        assert!((norm_cdf(-1.0) - 0.158_655_253_931_457_05).abs() < 1e-15);
        assert!((norm_cdf(1.96) - 0.975_002_104_851_779_5).abs() < 1e-15);
        // Lower tail keeps relative precision
        let tail = norm_cdf(-10.0);
        assert!((tail / 7.619_853_024_160_527e-24 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for &x in &[0.1, 0.5, 1.3, 2.7, 4.0] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_atm_reference_prices() {
        let call = call_price(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
        let put = put_price(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
        assert!((call - 10.450_583_572_185_565).abs() < 1e-9, "call = {}", call);
        assert!((put - 5.573_526_022_256_971).abs() < 1e-9, "put = {}", put);
    }

    #[test]
    fn test_expiry_returns_intrinsic() {
        assert_eq!(call_price(110.0, 100.0, 0.0, 0.05, 0.2).unwrap(), 10.0);
        assert_eq!(put_price(110.0, 100.0, 0.0, 0.05, 0.2).unwrap(), 0.0);
        assert_eq!(call_price(90.0, 100.0, 0.0, 0.05, 0.0).unwrap(), 0.0);
        assert_eq!(put_price(90.0, 100.0, 0.0, 0.05, 0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_zero_vol_discounted_intrinsic() {
        let df = (-0.05_f64).exp();
        let call = call_price(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
        assert!((call - (100.0 - 100.0 * df)).abs() < 1e-12);
        let put = put_price(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
        assert_eq!(put, 0.0);

        let put = put_price(90.0, 100.0, 1.0, 0.05, 0.0).unwrap();
        assert!((put - (100.0 * df - 90.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let cases = [
            (0.0, 100.0, 1.0, 0.05, 0.2),
            (-1.0, 100.0, 1.0, 0.05, 0.2),
            (100.0, 0.0, 1.0, 0.05, 0.2),
            (100.0, 100.0, -0.1, 0.05, 0.2),
            (100.0, 100.0, 1.0, 0.05, -0.2),
            (f64::NAN, 100.0, 1.0, 0.05, 0.2),
            (100.0, 100.0, f64::INFINITY, 0.05, 0.2),
            (100.0, 100.0, 1.0, f64::NAN, 0.2),
        ];
        for (s, k, t, r, sigma) in cases {
            assert!(
                matches!(call_price(s, k, t, r, sigma), Err(PricerError::InvalidInput(_))),
                "call accepted S={} K={} T={} r={} sigma={}",
                s,
                k,
                t,
                r,
                sigma
            );
            assert!(matches!(
                put_price(s, k, t, r, sigma),
                Err(PricerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_overflowing_discount_is_rejected() {
        // exp(-rT) = exp(1000) overflows
        assert!(matches!(
            put_price(100.0, 100.0, 1000.0, -1.0, 0.2),
            Err(PricerError::InvalidInput(_))
        ));
        assert!(matches!(
            put_price(100.0, 100.0, 1000.0, -1.0, 0.0),
            Err(PricerError::InvalidInput(_))
        ));
        assert!(matches!(
            call_price(100.0, 100.0, 1000.0, -1.0, 0.2),
            Err(PricerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_d2_offset() {
        let d1 = d1(100.0, 95.0, 0.5, 0.03, 0.3);
        let d2 = d2(100.0, 95.0, 0.5, 0.03, 0.3);
        assert!((d1 - d2 - 0.3 * 0.5_f64.sqrt()).abs() < 1e-15);
    }
}
