//! Test utilities for observation ingestion and normalization
//!
//! Provides builders for synthetic BoM half-hourly export files with the
//! duplicate timestamp column groups real exports carry.

use crate::constants::obs_column;
use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use std::io::Write;
use tempfile::NamedTempFile;

// Test modules
mod parser_tests;
mod series_tests;

/// Build a BoM export header row with the given wind speed column name
///
/// The two timestamp groups carry identical column names apart from the
/// minutes column; the second group is local standard time.
pub fn obs_header(wind_column: &str) -> String {
    [
        "hm",
        "Station Number",
        obs_column::YEAR,
        obs_column::MONTH,
        obs_column::DAY,
        obs_column::HOUR,
        "MI format in Local time",
        obs_column::YEAR,
        obs_column::MONTH,
        obs_column::DAY,
        obs_column::HOUR,
        obs_column::MINUTES_STANDARD,
        obs_column::AIR_TEMP,
        obs_column::WET_BULB,
        obs_column::DEW_POINT,
        obs_column::HUMIDITY,
        wind_column,
        obs_column::WIND_DIRECTION,
        obs_column::PRESSURE,
        "#",
    ]
    .join(",")
}

/// Build one data row keyed by local standard time
///
/// The local-time group is shifted thirty minutes ahead so tests can
/// prove the parser keys rows off the second timestamp group.
pub fn obs_row(standard: NaiveDateTime, values: [&str; 7]) -> String {
    let local = standard + Duration::minutes(30);
    let timestamp = |t: NaiveDateTime| {
        format!(
            "{},{:02},{:02},{:02},{:02}",
            t.year(),
            t.month(),
            t.day(),
            t.hour(),
            t.minute()
        )
    };
    format!(
        "hm,070351,{},{},{},#",
        timestamp(local),
        timestamp(standard),
        values.join(",")
    )
}

/// Write header and rows into a temporary observation file
pub fn create_obs_file(header: &str, rows: &[String]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", header).unwrap();
    for row in rows {
        writeln!(temp_file, "{}", row).unwrap();
    }
    temp_file.flush().unwrap();
    temp_file
}
