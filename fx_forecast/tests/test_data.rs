use chrono::NaiveDate;
use fx_forecast::{DataLoader, ForecastError, Observation, TimeSeriesData};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_load_csv_sorts_rows_by_date() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,close,volume").unwrap();
    writeln!(file, "2024-01-03,1.0950,120").unwrap();
    writeln!(file, "2024-01-01,1.1040,100").unwrap();
    writeln!(file, "2024-01-02,1.0940,110").unwrap();

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.first_date(), date("2024-01-01"));
    assert_eq!(data.last_date(), date("2024-01-03"));
    assert_eq!(data.close_prices(), vec![1.1040, 1.0940, 1.0950]);
}

#[test]
fn test_load_missing_file() {
    let result = DataLoader::from_csv("/nonexistent/prices.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_load_malformed_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,close").unwrap();
    writeln!(file, "2024-01-01,not-a-number").unwrap();

    let result = DataLoader::from_csv(file.path());
    assert!(matches!(result, Err(ForecastError::CsvError(_))));
}

#[test]
fn test_series_rejects_bad_input() {
    assert!(matches!(
        TimeSeriesData::new(vec![]),
        Err(ForecastError::DataError(_))
    ));

    let negative = vec![Observation::new(date("2024-01-01"), -1.0)];
    assert!(matches!(
        TimeSeriesData::new(negative),
        Err(ForecastError::DataError(_))
    ));

    let duplicated = vec![
        Observation::new(date("2024-01-01"), 1.0),
        Observation::new(date("2024-01-01"), 1.1),
    ];
    assert!(matches!(
        TimeSeriesData::new(duplicated),
        Err(ForecastError::DataError(_))
    ));

    let mismatched = TimeSeriesData::from_parts(vec![date("2024-01-01")], vec![1.0, 2.0]);
    assert!(mismatched.is_err());
}

#[test]
fn test_series_calendar_helpers() {
    let data = TimeSeriesData::from_parts(
        vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-05")],
        vec![1.0, 1.1, 1.2],
    )
    .unwrap();

    assert_eq!(data.day_offsets(), vec![0.0, 1.0, 4.0]);
    assert_eq!(data.span_days(), 4);
    assert_eq!(data.last_close(), 1.2);
}

#[test]
fn test_observation_json_shape() {
    let obs: Observation = serde_json::from_str(r#"{"date":"2024-03-01","close":1.0832}"#).unwrap();
    assert_eq!(obs, Observation::new(date("2024-03-01"), 1.0832));
}
