use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate};
#[cfg(feature = "boosted-regression")]
use fx_forecast::models::boosted::{window_features, BoostedRegression};
#[cfg(feature = "volatility-model")]
use fx_forecast::models::garch::GarchModel;
#[cfg(feature = "seasonal-decomposition")]
use fx_forecast::models::seasonal::SeasonalDecomposition;
#[cfg(feature = "sequence-model")]
use fx_forecast::models::sequence::SequenceModel;
use fx_forecast::{
    ForecastError, ForecastModel, ModelForecast, TimeSeriesData, TrainedForecastModel,
};

// Daily closes with a gentle trend and a wobble, starting on a Monday
fn create_series(days: usize) -> TimeSeriesData {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates = (0..days)
        .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
        .collect();
    let closes = (0..days)
        .map(|i| {
            let t = i as f64;
            1.10 + 0.0005 * t + 0.01 * (t / 5.0).sin() + 0.002 * (t * 1.7).cos()
        })
        .collect();
    TimeSeriesData::from_parts(dates, closes).unwrap()
}

fn assert_ordered_bounds(forecast: &ModelForecast) {
    for (value, (lower, upper)) in forecast.values().iter().zip(forecast.intervals()) {
        assert!(value.is_finite());
        assert!(lower <= value, "lower {} above value {}", lower, value);
        assert!(value <= upper, "value {} above upper {}", value, upper);
    }
}

fn widths(forecast: &ModelForecast) -> Vec<f64> {
    forecast.intervals().iter().map(|(l, u)| u - l).collect()
}

#[cfg(feature = "volatility-model")]
#[test]
fn test_garch_forecast() {
    let data = create_series(120);
    let trained = GarchModel::default().train(&data).unwrap();

    assert!(trained.alpha() >= 0.0);
    assert!(trained.beta() >= 0.0);
    assert!(trained.alpha() + trained.beta() < 1.0);
    assert!(trained.omega() > 0.0);

    let forecast = trained.forecast(20).unwrap();
    assert_eq!(forecast.horizons(), 20);
    assert_ordered_bounds(&forecast);

    // Relative width follows the cumulative variance
    let relative: Vec<f64> = widths(&forecast)
        .iter()
        .zip(forecast.values())
        .map(|(w, v)| w / v)
        .collect();
    assert!(relative.windows(2).all(|w| w[1] >= w[0]));

    let fit = trained.fit_quality();
    assert!(fit.mae >= 0.0);
    assert!(fit.accuracy <= 1.0);
}

#[cfg(feature = "volatility-model")]
#[test]
fn test_garch_variance_reverts_to_long_run() {
    let trained = GarchModel::default().train(&create_series(120)).unwrap();
    let variances = trained.forecast_variance(500);
    let persistence = trained.alpha() + trained.beta();
    let long_run = trained.omega() / (1.0 - persistence);

    assert!(variances.iter().all(|v| *v > 0.0));
    if persistence < 0.95 {
        assert_relative_eq!(variances[499], long_run, max_relative = 1e-3);
    }
}

#[cfg(feature = "volatility-model")]
#[test]
fn test_garch_rejects_bad_interval() {
    assert!(GarchModel::new(0.0).is_err());
    assert!(GarchModel::new(1.0).is_err());
    assert!(GarchModel::new(0.9).is_ok());
}

#[cfg(feature = "seasonal-decomposition")]
#[test]
fn test_seasonal_forecast() {
    let data = create_series(90);
    let trained = SeasonalDecomposition::default().train(&data).unwrap();

    // Ninety days is too short for a yearly cycle
    assert!(!trained.has_yearly_component());

    let factors = trained.weekday_factors();
    let log_mean = factors.iter().map(|f| f.ln()).sum::<f64>() / 7.0;
    assert_relative_eq!(log_mean, 0.0, epsilon = 1e-9);

    let forecast = trained.forecast(30).unwrap();
    assert_eq!(forecast.horizons(), 30);
    assert_ordered_bounds(&forecast);

    let log_widths: Vec<f64> = forecast
        .intervals()
        .iter()
        .map(|(l, u)| (u / l).ln())
        .collect();
    assert!(log_widths.windows(2).all(|w| w[1] >= w[0] - 1e-12));
}

#[cfg(feature = "seasonal-decomposition")]
#[test]
fn test_seasonal_recovers_weekday_pattern() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..70)
        .map(|i| start.checked_add_days(Days::new(i)).unwrap())
        .collect();
    // Fridays trade one percent above the rest of the week
    let closes = (0..70)
        .map(|i| if i % 7 == 4 { 1.01 } else { 1.0 })
        .collect();
    let data = TimeSeriesData::from_parts(dates, closes).unwrap();

    let trained = SeasonalDecomposition::default().train(&data).unwrap();
    let factors = trained.weekday_factors();

    assert_relative_eq!(factors[4] / factors[0], 1.01, max_relative = 1e-6);
    assert_relative_eq!(trained.annual_trend(), 0.0, epsilon = 1e-6);
}

#[cfg(feature = "seasonal-decomposition")]
#[test]
fn test_seasonal_yearly_component_with_long_history() {
    let trained = SeasonalDecomposition::default()
        .train(&create_series(400))
        .unwrap();
    assert!(trained.has_yearly_component());

    let without = SeasonalDecomposition::default()
        .with_yearly(false)
        .train(&create_series(400))
        .unwrap();
    assert!(!without.has_yearly_component());
}

#[cfg(feature = "seasonal-decomposition")]
#[test]
fn test_seasonal_sparse_long_history_stays_bounded() {
    // One close per year for thirty years cannot resolve a yearly cycle
    let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..30)
        .map(|i| start.checked_add_days(Days::new(i * 365)).unwrap())
        .collect();
    let closes: Vec<f64> = (0..30)
        .map(|i| 1.0 + 0.03 * (i as f64 * 0.9).sin() + 0.002 * i as f64)
        .collect();
    let data = TimeSeriesData::from_parts(dates, closes).unwrap();

    let trained = SeasonalDecomposition::default().train(&data).unwrap();
    assert!(!trained.has_yearly_component());

    let forecast = trained.forecast(10).unwrap();
    assert_ordered_bounds(&forecast);
    for value in forecast.values() {
        assert!(*value > 0.5 && *value < 2.0, "forecast {} left the price range", value);
    }

    let result = fx_forecast::forecast(data.observations().to_vec(), "seasonal-decomposition", 10)
        .unwrap();
    assert!(result.forecast.iter().all(|p| p.rate > 0.5 && p.rate < 2.0));
}

#[cfg(feature = "seasonal-decomposition")]
#[test]
fn test_seasonal_business_day_history() {
    // Twelve weeks of Monday to Friday closes, Fridays one percent higher
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..84)
        .filter(|i| i % 7 < 5)
        .map(|i| start.checked_add_days(Days::new(i)).unwrap())
        .collect();
    let closes: Vec<f64> = (0..84u64)
        .filter(|i| i % 7 < 5)
        .map(|i| {
            let friday = if i % 7 == 4 { 1.01 } else { 1.0 };
            1.08 * friday * (0.0002 * i as f64).exp()
        })
        .collect();
    let data = TimeSeriesData::from_parts(dates, closes).unwrap();
    assert_eq!(data.len(), 60);

    let trained = SeasonalDecomposition::default().train(&data).unwrap();
    let factors = trained.weekday_factors();

    // Weekend never observed
    assert_eq!(factors[5], 1.0);
    assert_eq!(factors[6], 1.0);

    let log_mean = factors[..5].iter().map(|f| f.ln()).sum::<f64>() / 5.0;
    assert_relative_eq!(log_mean, 0.0, epsilon = 1e-9);
    assert_relative_eq!(factors[4] / factors[0], 1.01, max_relative = 1e-6);

    let result = fx_forecast::forecast(data.observations().to_vec(), "seasonal-decomposition", 7)
        .unwrap();
    let last = data.last_date();
    for (i, point) in result.forecast.iter().enumerate() {
        assert_eq!(point.date, last.checked_add_days(Days::new(i as u64 + 1)).unwrap());
        assert!(point.lower <= point.rate && point.rate <= point.upper);
    }
    // Friday close, so the forecast opens on a Saturday
    assert_eq!(result.forecast[0].date.weekday(), chrono::Weekday::Sat);
}

#[cfg(feature = "boosted-regression")]
#[test]
fn test_boosted_forecast() {
    let data = create_series(100);
    let trained = BoostedRegression::default().train(&data).unwrap();
    assert_eq!(trained.tree_count(), 100);

    let forecast = trained.forecast(15).unwrap();
    assert_eq!(forecast.horizons(), 15);
    assert_ordered_bounds(&forecast);
    assert!(widths(&forecast).windows(2).all(|w| w[1] >= w[0]));

    // Predictions stay within the range the trees were fit on
    let prices = data.close_prices();
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(forecast.values().iter().all(|v| *v >= min - 0.1 && *v <= max + 0.1));
}

#[cfg(feature = "boosted-regression")]
#[test]
fn test_boosted_window_features() {
    let features = window_features(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(features.len(), 8);
    assert_relative_eq!(features[0], 4.0); // last
    assert_relative_eq!(features[1], 2.5); // mean
    assert_relative_eq!(features[3], 3.0); // change
    assert_relative_eq!(features[4], 3.0); // pct change
    assert_relative_eq!(features[5], 4.0); // max
    assert_relative_eq!(features[6], 1.0); // min
    assert_relative_eq!(features[7], 1.5); // last - mean
}

#[cfg(feature = "boosted-regression")]
#[test]
fn test_boosted_invalid_parameters() {
    assert!(BoostedRegression::new(1, 10, 0.1, 3).is_err());
    assert!(BoostedRegression::new(5, 0, 0.1, 3).is_err());
    assert!(BoostedRegression::new(5, 10, 0.0, 3).is_err());
    assert!(BoostedRegression::new(5, 10, 0.1, 0).is_err());
}

#[cfg(feature = "boosted-regression")]
#[test]
fn test_boosted_short_series() {
    let result = BoostedRegression::default().train(&create_series(11));
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientData { required: 12, actual: 11 })
    ));
}

#[cfg(feature = "sequence-model")]
#[test]
fn test_sequence_forecast() {
    let data = create_series(60);
    let model = SequenceModel::new(10, 8, 3, 0.01).unwrap();
    let trained = model.train(&data).unwrap();

    let forecast = trained.forecast(10).unwrap();
    assert_eq!(forecast.horizons(), 10);
    assert_ordered_bounds(&forecast);
    assert!(widths(&forecast).windows(2).all(|w| w[1] >= w[0]));

    let fit = trained.fit_quality();
    assert!(fit.mae >= 0.0);
    assert!(fit.accuracy <= 1.0);
}

#[cfg(feature = "sequence-model")]
#[test]
fn test_sequence_is_deterministic_for_a_seed() {
    let data = create_series(50);
    let model = SequenceModel::new(8, 4, 2, 0.01).unwrap().with_seed(7);

    let first = model.train(&data).unwrap().forecast(5).unwrap();
    let second = model.train(&data).unwrap().forecast(5).unwrap();
    assert_eq!(first.values(), second.values());
}

#[cfg(feature = "sequence-model")]
#[test]
fn test_sequence_short_series() {
    let model = SequenceModel::new(20, 4, 1, 0.01).unwrap();
    assert!(model.train(&create_series(15)).is_err());
}
