//! Station metadata lookup from BoM station details files
//!
//! The details file is fixed-width ASCII text with one line per station.
//! This service selects the line for a requested station code and decodes
//! the metadata fields at their fixed byte offsets.

use crate::app::models::{LatLong, Station};
use crate::constants::details_field;
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load one station's metadata from a BoM station details file
///
/// The matching line is the first one containing the `st,<code>`
/// substring. Data-quality percentage flags (wrong, suspect,
/// inconsistent) are advisory: nonzero values are logged as a warning
/// and never block processing.
///
/// # Errors
/// * Returns `Error::StationDetails` if the file cannot be read, no line
///   matches the station code, or a field cannot be decoded
pub fn load_station(path: &Path, station_code: &str) -> Result<Station> {
    debug!("Reading station details from {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| {
        Error::station_details(format!(
            "cannot read station details file {}: {}",
            path.display(),
            e
        ))
    })?;

    let needle = format!("st,{}", station_code);
    let line = contents
        .lines()
        .find(|line| line.contains(&needle))
        .ok_or_else(|| {
            Error::station_details(format!(
                "no entry for station {} in {}",
                station_code,
                path.display()
            ))
        })?;

    parse_details_line(line)
}

/// Decode one fixed-width details line into a [`Station`]
fn parse_details_line(line: &str) -> Result<Station> {
    let number = slice_field(line, details_field::NUMBER, "station number")?
        .trim()
        .to_string();
    let name = slice_field(line, details_field::NAME, "station name")?
        .trim()
        .to_string();
    // The state column is carried as recorded, padding included.
    let state = slice_field(line, details_field::STATE, "state")?.to_string();

    info!("Processing station number {} ({})", number, name);

    let latitude = parse_float(
        slice_field(line, details_field::LATITUDE, "latitude")?,
        "latitude",
    )?;
    let longitude = parse_float(
        slice_field(line, details_field::LONGITUDE, "longitude")?,
        "longitude",
    )?;
    let location = LatLong::new(latitude, longitude)?;

    // Elevation is recorded with a decimal fraction; truncate to metres.
    let elevation = parse_float(
        slice_field(line, details_field::ELEVATION, "elevation")?,
        "elevation",
    )? as i32;

    let wrong = parse_flag(line, details_field::PERCENT_WRONG, "percent wrong")?;
    let suspect = parse_flag(line, details_field::PERCENT_SUSPECT, "percent suspect")?;
    let inconsistent = parse_flag(
        line,
        details_field::PERCENT_INCONSISTENT,
        "percent inconsistent",
    )?;
    if wrong != 0 || suspect != 0 || inconsistent != 0 {
        warn!(
            "% wrong = {}, % suspect = {}, % inconsistent = {}",
            wrong, suspect, inconsistent
        );
    }

    Station::new(number, name, state, location, elevation)
}

/// Slice a fixed-width field out of a details line
fn slice_field<'a>(line: &'a str, range: (usize, usize), field_name: &str) -> Result<&'a str> {
    line.get(range.0..range.1).ok_or_else(|| {
        Error::station_details(format!(
            "details line too short for {} field (need bytes {}..{})",
            field_name, range.0, range.1
        ))
    })
}

/// Parse a fixed-width numeric field, tolerating space padding
fn parse_float(text: &str, field_name: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| {
        Error::station_details(format!("invalid {} value '{}'", field_name, text.trim()))
    })
}

/// Parse one of the three data-quality percentage fields
fn parse_flag(line: &str, range: (usize, usize), field_name: &str) -> Result<i32> {
    let text = slice_field(line, range, field_name)?;
    text.trim().parse::<i32>().map_err(|_| {
        Error::station_details(format!("invalid {} value '{}'", field_name, text.trim()))
    })
}
