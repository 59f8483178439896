//! Tests for BoM observation file decoding

use super::*;
use crate::Error;
use crate::app::models::WeatherField;
use crate::app::services::observations::load_observations;
use chrono::NaiveDate;

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn test_parses_rows_keyed_by_standard_time() {
    let first = timestamp(2019, 1, 1, 0, 0);
    let second = timestamp(2019, 1, 1, 0, 30);
    let file = create_obs_file(
        &obs_header("Wind speed in km/h"),
        &[
            obs_row(first, ["21.5", "15.0", "10.2", "48", "18.4", "270", "1013.2"]),
            obs_row(second, ["21.9", "15.1", "10.4", "47", "20.1", "265", "1013.0"]),
        ],
    );

    let set = load_observations(file.path()).unwrap();
    assert_eq!(set.samples.len(), 2);
    assert!(!set.wind_in_ms);

    // Rows are keyed by the second timestamp group, not the first.
    let values = set.samples.get(&first).unwrap();
    assert_eq!(values[WeatherField::DryBulb.index()], Some(21.5));
    assert_eq!(values[WeatherField::Pressure.index()], Some(1013.2));
    assert!(!set.samples.contains_key(&timestamp(2019, 1, 1, 1, 0)));
}

#[test]
fn test_prefers_wind_speed_in_ms() {
    let file = create_obs_file(
        &obs_header("Wind speed in m/s"),
        &[obs_row(
            timestamp(2019, 1, 1, 0, 0),
            ["21.5", "15.0", "10.2", "48", "5.1", "270", "1013.2"],
        )],
    );

    let set = load_observations(file.path()).unwrap();
    assert!(set.wind_in_ms);
    let values = set.samples.get(&timestamp(2019, 1, 1, 0, 0)).unwrap();
    assert_eq!(values[WeatherField::WindSpeed.index()], Some(5.1));
}

#[test]
fn test_empty_cells_are_missing() {
    let file = create_obs_file(
        &obs_header("Wind speed in km/h"),
        &[obs_row(
            timestamp(2019, 1, 1, 0, 0),
            ["", "15.0", "", "48", "18.4", "270", ""],
        )],
    );

    let set = load_observations(file.path()).unwrap();
    let values = set.samples.get(&timestamp(2019, 1, 1, 0, 0)).unwrap();
    assert_eq!(values[WeatherField::DryBulb.index()], None);
    assert_eq!(values[WeatherField::WetBulb.index()], Some(15.0));
    assert_eq!(values[WeatherField::DewPoint.index()], None);
    assert_eq!(values[WeatherField::Pressure.index()], None);
}

#[test]
fn test_duplicate_timestamps_last_wins() {
    // Repeated stamps are collapsed to the last occurrence (and counted
    // for the advisory log), whatever the repeat count.
    let at = timestamp(2019, 1, 1, 0, 0);
    let later = timestamp(2019, 1, 1, 0, 30);
    let file = create_obs_file(
        &obs_header("Wind speed in km/h"),
        &[
            obs_row(at, ["21.5", "15.0", "10.2", "48", "18.4", "270", "1013.2"]),
            obs_row(at, ["22.0", "15.0", "10.2", "48", "18.4", "270", "1013.2"]),
            obs_row(at, ["22.5", "15.0", "10.2", "48", "18.4", "270", "1013.2"]),
            obs_row(later, ["23.0", "15.0", "10.2", "48", "18.4", "270", "1013.2"]),
        ],
    );

    let set = load_observations(file.path()).unwrap();
    assert_eq!(set.samples.len(), 2);
    let values = set.samples.get(&at).unwrap();
    assert_eq!(values[WeatherField::DryBulb.index()], Some(22.5));
    let values = set.samples.get(&later).unwrap();
    assert_eq!(values[WeatherField::DryBulb.index()], Some(23.0));
}

#[test]
fn test_missing_required_column_is_an_error() {
    // Header without the pressure column.
    let header = obs_header("Wind speed in km/h").replace("Station level pressure in hPa,", "");
    let file = create_obs_file(&header, &[]);

    let result = load_observations(file.path());
    match result {
        Err(Error::ObservationData { message, .. }) => {
            assert!(message.contains("missing column"));
        }
        other => panic!("Expected ObservationData error, got {:?}", other),
    }
}

#[test]
fn test_invalid_timestamp_is_an_error() {
    let row = obs_row(
        timestamp(2019, 1, 1, 0, 0),
        ["21.5", "15.0", "10.2", "48", "18.4", "270", "1013.2"],
    )
    .replace(",2019,01,01,00,00,", ",2019,13,01,00,00,");
    let file = create_obs_file(&obs_header("Wind speed in km/h"), &[row]);

    let result = load_observations(file.path());
    assert!(matches!(result, Err(Error::ObservationData { .. })));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_observations(std::path::Path::new("/nonexistent/HM01X_Data.txt"));
    assert!(matches!(result, Err(Error::ObservationData { .. })));
}
