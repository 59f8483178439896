//! Tests for hourly reindexing, sentinel fill and unit conversion

use crate::app::models::WeatherField;
use crate::app::services::observations::build_hourly_series;
use crate::app::services::observations::parser::{FieldValues, ObservationSet};
use crate::constants::hours_in_year;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

fn start_of(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn empty_set() -> ObservationSet {
    ObservationSet {
        samples: BTreeMap::new(),
        wind_in_ms: false,
    }
}

/// A full year of half-hourly rows with every field set to `value`
fn half_hourly_set(year: i32, value: f64) -> ObservationSet {
    let start = start_of(year);
    let mut samples = BTreeMap::new();
    for i in 0..hours_in_year(year) * 2 {
        let timestamp = start + Duration::minutes(30 * i as i64);
        samples.insert(timestamp, [Some(value); WeatherField::COUNT]);
    }
    ObservationSet {
        samples,
        wind_in_ms: false,
    }
}

#[test]
fn test_row_count_non_leap_year() {
    let series = build_hourly_series(&half_hourly_set(2019, 10.0), 2019, 2).unwrap();
    assert_eq!(series.len(), 8760);
}

#[test]
fn test_row_count_leap_year() {
    let series = build_hourly_series(&half_hourly_set(2020, 10.0), 2020, 2).unwrap();
    assert_eq!(series.len(), 8784);
}

#[test]
fn test_row_count_with_no_observations() {
    let series = build_hourly_series(&empty_set(), 2019, 2).unwrap();
    assert_eq!(series.len(), 8760);
}

#[test]
fn test_sentinels_fill_missing_hours() {
    let series = build_hourly_series(&empty_set(), 2019, 2).unwrap();
    let row = &series[0];
    assert_eq!(row.dry_bulb, 99.9);
    assert_eq!(row.wet_bulb, 99.9);
    assert_eq!(row.dew_point, 99.9);
    assert_eq!(row.rel_humidity, 999.0);
    assert_eq!(row.wind_speed, 999.0);
    assert_eq!(row.wind_direction, 999.0);
    // The pressure sentinel is never scaled to Pa.
    assert_eq!(row.pressure, 999999.0);
}

#[test]
fn test_wind_speed_kmh_converted_to_ms() {
    let series = build_hourly_series(&half_hourly_set(2019, 36.0), 2019, 2).unwrap();
    assert!((series[0].wind_speed - 10.0).abs() < 1e-9);
}

#[test]
fn test_wind_speed_ms_passes_through() {
    let mut set = half_hourly_set(2019, 36.0);
    set.wind_in_ms = true;
    let series = build_hourly_series(&set, 2019, 2).unwrap();
    assert_eq!(series[0].wind_speed, 36.0);
}

#[test]
fn test_pressure_converted_to_pa() {
    let series = build_hourly_series(&half_hourly_set(2019, 1013.2), 2019, 2).unwrap();
    assert!((series[0].pressure - 101320.0).abs() < 1e-6);
}

#[test]
fn test_reindex_requires_exact_hour_match() {
    let start = start_of(2019);
    let mut samples = BTreeMap::new();
    // Only on the half hour for hour 0, on the hour for hour 1.
    let on_half: FieldValues = [Some(20.0); WeatherField::COUNT];
    let on_hour: FieldValues = [Some(25.0); WeatherField::COUNT];
    samples.insert(start + Duration::minutes(30), on_half);
    samples.insert(start + Duration::hours(1), on_hour);
    let set = ObservationSet {
        samples,
        wind_in_ms: false,
    };

    let series = build_hourly_series(&set, 2019, 0).unwrap();
    assert_eq!(series[0].dry_bulb, 99.9);
    assert_eq!(series[1].dry_bulb, 25.0);
}

#[test]
fn test_short_gap_interpolated_onto_hourly_grid() {
    let start = start_of(2019);
    let mut samples = BTreeMap::new();
    // Half-hourly cadence with the 01:00 and 01:30 rows missing entirely.
    let mut values: FieldValues = [None; WeatherField::COUNT];
    values[WeatherField::DryBulb.index()] = Some(10.0);
    samples.insert(start, values);
    samples.insert(start + Duration::minutes(30), values);
    let mut gap_edge: FieldValues = [None; WeatherField::COUNT];
    gap_edge[WeatherField::DryBulb.index()] = Some(40.0);
    samples.insert(start + Duration::minutes(120), gap_edge);
    let set = ObservationSet {
        samples,
        wind_in_ms: false,
    };

    // A two-hour limit covers the two missing samples.
    let series = build_hourly_series(&set, 2019, 2).unwrap();
    // Positional interpolation between 10.0 at position 1 and 40.0 at
    // position 2 never lands on the hourly grid: the 01:00 row is simply
    // absent from the sparse series, so hour 1 stays missing.
    assert_eq!(series[0].dry_bulb, 10.0);
    assert_eq!(series[1].dry_bulb, 99.9);
}

#[test]
fn test_gap_rows_present_but_empty_are_interpolated() {
    let start = start_of(2019);
    let mut samples = BTreeMap::new();
    let mut known: FieldValues = [None; WeatherField::COUNT];
    known[WeatherField::DryBulb.index()] = Some(10.0);
    samples.insert(start, known);
    // Rows exist at every half hour but carry no dry-bulb reading.
    samples.insert(start + Duration::minutes(30), [None; WeatherField::COUNT]);
    samples.insert(start + Duration::minutes(60), [None; WeatherField::COUNT]);
    samples.insert(start + Duration::minutes(90), [None; WeatherField::COUNT]);
    let mut edge: FieldValues = [None; WeatherField::COUNT];
    edge[WeatherField::DryBulb.index()] = Some(50.0);
    samples.insert(start + Duration::minutes(120), edge);
    let set = ObservationSet {
        samples,
        wind_in_ms: false,
    };

    let series = build_hourly_series(&set, 2019, 2).unwrap();
    assert_eq!(series[0].dry_bulb, 10.0);
    // Hour 1 sits two samples into the gap: 10 + (50 - 10) * 2 / 4.
    assert_eq!(series[1].dry_bulb, 30.0);
    assert_eq!(series[2].dry_bulb, 50.0);
}

#[test]
fn test_gap_longer_than_limit_stays_missing() {
    let start = start_of(2019);
    let mut samples = BTreeMap::new();
    let mut known: FieldValues = [None; WeatherField::COUNT];
    known[WeatherField::DryBulb.index()] = Some(10.0);
    samples.insert(start, known);
    for i in 1..=5 {
        samples.insert(
            start + Duration::minutes(30 * i),
            [None; WeatherField::COUNT],
        );
    }
    let mut edge: FieldValues = [None; WeatherField::COUNT];
    edge[WeatherField::DryBulb.index()] = Some(70.0);
    samples.insert(start + Duration::minutes(180), edge);
    let set = ObservationSet {
        samples,
        wind_in_ms: false,
    };

    // Five missing samples exceed a two-hour (four sample) limit.
    let series = build_hourly_series(&set, 2019, 2).unwrap();
    assert_eq!(series[1].dry_bulb, 99.9);
    assert_eq!(series[2].dry_bulb, 99.9);
    assert_eq!(series[3].dry_bulb, 70.0);
}

#[test]
fn test_out_of_range_year_is_an_error() {
    assert!(build_hourly_series(&empty_set(), 300000, 2).is_err());
}
