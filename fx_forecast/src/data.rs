//! Historical price data handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// A single daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Closing price, strictly positive
    pub close: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Validated, chronologically ordered price history
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesData {
    observations: Vec<Observation>,
}

impl TimeSeriesData {
    /// Create a series, rejecting empty input, non-positive closes and
    /// dates that are not strictly increasing
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        for (i, obs) in observations.iter().enumerate() {
            if !obs.close.is_finite() || obs.close <= 0.0 {
                return Err(ForecastError::DataError(format!(
                    "Close price on {} must be positive, got {}",
                    obs.date, obs.close
                )));
            }
            if i > 0 && obs.date <= observations[i - 1].date {
                return Err(ForecastError::DataError(format!(
                    "Observations must be in strictly increasing date order ({} follows {})",
                    obs.date,
                    observations[i - 1].date
                )));
            }
        }

        Ok(Self { observations })
    }

    /// Create a series from parallel date and close vectors (for testing)
    pub fn from_parts(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match closes length ({})",
                dates.len(),
                closes.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(closes)
                .map(|(date, close)| Observation::new(date, close))
                .collect(),
        )
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Closing prices in chronological order
    pub fn close_prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    pub fn last_close(&self) -> f64 {
        self.observations[self.observations.len() - 1].close
    }

    /// Calendar days elapsed since the first observation
    pub fn day_offsets(&self) -> Vec<f64> {
        let first = self.first_date();
        self.observations
            .iter()
            .map(|o| (o.date - first).num_days() as f64)
            .collect()
    }

    /// Calendar days covered by the series
    pub fn span_days(&self) -> i64 {
        (self.last_date() - self.first_date()).num_days()
    }
}

/// Data loader for price history files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a `date,close` CSV file; extra columns are ignored and rows may be
    /// in either chronological or reverse order
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TimeSeriesData> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut observations = Vec::new();
        for record in reader.deserialize() {
            let observation: Observation = record?;
            observations.push(observation);
        }

        observations.sort_by_key(|o| o.date);
        tracing::debug!(rows = observations.len(), "loaded price history from csv");

        TimeSeriesData::new(observations)
    }
}
