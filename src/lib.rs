//! # fx_forecast_suite
//!
//! Umbrella crate for the exchange-rate forecasting workspace.
//!
//! - [`trade_math`]: numeric helpers (statistics, scaling, regression, returns)
//! - [`fx_forecast`]: forecasting strategies and the dispatcher that runs them
//! - [`forecast_service`]: the HTTP API and command-line front end
//!
//! ## Example
//!
//! ```
//! use fx_forecast_suite::fx_forecast::Strategy;
//!
//! let strategy: Strategy = "prophet".parse().unwrap();
//! assert_eq!(strategy.name(), "seasonal-decomposition");
//! assert_eq!(strategy.confidence(), 0.88);
//! ```

pub use forecast_service;
pub use fx_forecast;
pub use trade_math;

/// Name and version of this crate and of the forecasting library.
///
/// # Examples
///
/// ```
/// let versions = fx_forecast_suite::member_versions();
/// assert_eq!(versions[1].0, "fx_forecast");
/// ```
pub fn member_versions() -> [(&'static str, &'static str); 2] {
    [
        ("fx_forecast_suite", env!("CARGO_PKG_VERSION")),
        (fx_forecast::NAME, fx_forecast::VERSION),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_versions() {
        let versions = member_versions();
        assert_eq!(versions[0].0, "fx_forecast_suite");
        assert!(!versions[1].1.is_empty());
    }

    #[test]
    fn test_reexported_catalog() {
        assert_eq!(fx_forecast::catalog().len(), 4);
    }
}
