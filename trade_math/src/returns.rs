//! Return transforms

use crate::{MathError, Result};

/// Log returns scaled to percent: `100 * ln(p[t] / p[t-1])`
pub fn log_returns_pct(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MathError::InsufficientData(
            "Need at least 2 prices to calculate returns".to_string(),
        ));
    }
    if prices.iter().any(|&p| p <= 0.0 || !p.is_finite()) {
        return Err(MathError::InvalidInput(
            "Prices must be positive and finite".to_string(),
        ));
    }

    Ok(prices
        .windows(2)
        .map(|w| 100.0 * (w[1] / w[0]).ln())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_returns_pct() {
        let returns = log_returns_pct(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 100.0 * (1.1f64).ln());
        assert!(returns[1] < 0.0);
    }

    #[test]
    fn test_log_returns_rejects_bad_prices() {
        assert!(log_returns_pct(&[1.0]).is_err());
        assert!(log_returns_pct(&[1.0, 0.0]).is_err());
    }
}
