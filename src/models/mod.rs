pub mod bs;
pub mod types;

/// Utility functions for converting market conventions into model inputs
pub mod utils {
    use crate::error::{PricerError, PricerResult};

    /// Convert calendar days to expiry into a year fraction.
    pub fn years_from_days(days: f64, days_per_year: f64) -> PricerResult<f64> {
        if !(days.is_finite() && days >= 0.0) {
            return Err(PricerError::invalid_input(format!(
                "days to expiry must be non-negative, got {}",
                days
            )));
        }
        if !(days_per_year.is_finite() && days_per_year > 0.0) {
            return Err(PricerError::invalid_input(format!(
                "days per year must be positive, got {}",
                days_per_year
            )));
        }
        Ok(days / days_per_year)
    }

    /// Evenly spaced strikes spanning `[spot * (1 - width), spot * (1 + width)]`.
    pub fn strike_grid(spot: f64, width: f64, points: usize) -> Vec<f64> {
        let points = points.max(2);
        let lo = spot * (1.0 - width).max(0.01);
        let hi = spot * (1.0 + width);
        let step = (hi - lo) / (points - 1) as f64;
        (0..points).map(|i| lo + step * i as f64).collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_years_from_days() {
            assert!((years_from_days(30.0, 365.0).unwrap() - 0.082_191_780_821_917_8).abs() < 1e-12);
            assert_eq!(years_from_days(0.0, 365.0).unwrap(), 0.0);
            assert!(years_from_days(-1.0, 365.0).is_err());
            assert!(years_from_days(30.0, 0.0).is_err());
        }

        #[test]
        fn test_strike_grid_bounds() {
            let grid = strike_grid(100.0, 0.5, 11);
            assert_eq!(grid.len(), 11);
            assert!((grid[0] - 50.0).abs() < 1e-12);
            assert!((grid[10] - 150.0).abs() < 1e-9);
            assert!(grid.windows(2).all(|w| w[1] > w[0]));
        }
    }
}
