//! CSV decoding of BoM half-hourly observation exports
//!
//! BoM "HM" data files carry two timestamp column groups with identical
//! names (local time first, local standard time second). Columns are
//! therefore resolved by position of occurrence, not just by name: the
//! second occurrence of each date column is the local-standard group the
//! rest of the pipeline is defined against.

use crate::app::models::WeatherField;
use crate::constants::obs_column;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Per-row field values in [`WeatherField::ALL`] order; `None` is missing
pub type FieldValues = [Option<f64>; WeatherField::COUNT];

/// A sparse observation series keyed by local standard timestamp
///
/// Later rows win on duplicate timestamps. Rows outside the target year
/// are kept: they feed interpolation near the year boundary and are
/// dropped by the hourly reindex.
#[derive(Debug, Clone)]
pub struct ObservationSet {
    /// Observations ordered by timestamp
    pub samples: BTreeMap<NaiveDateTime, FieldValues>,

    /// Wind speed column was already in m/s, so no km/h conversion applies
    pub wind_in_ms: bool,
}

/// Resolved column positions for one observation file
#[derive(Debug, Clone)]
struct ColumnMap {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    minute: usize,
    fields: [usize; WeatherField::COUNT],
    wind_in_ms: bool,
}

impl ColumnMap {
    /// Resolve column positions from the header record
    fn from_headers(headers: &StringRecord, file: &Path) -> Result<Self> {
        let missing = |name: &str| {
            Error::observation_data(
                file.display().to_string(),
                format!("missing column '{}'", name),
                None,
            )
        };

        // The date columns appear once per timestamp group; the last
        // occurrence belongs to the local-standard group.
        let last_of = |name: &str| -> Result<usize> {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == name)
                .map(|(i, _)| i)
                .last()
                .ok_or_else(|| missing(name))
        };

        let unique = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| missing(name))
        };

        // Wind speed is preferred in m/s when the export carries it.
        let (wind_speed, wind_in_ms) = match headers
            .iter()
            .position(|header| header == obs_column::WIND_SPEED_MS)
        {
            Some(position) => (position, true),
            None => (unique(obs_column::WIND_SPEED_KMH)?, false),
        };

        let mut fields = [0usize; WeatherField::COUNT];
        fields[WeatherField::DryBulb.index()] = unique(obs_column::AIR_TEMP)?;
        fields[WeatherField::WetBulb.index()] = unique(obs_column::WET_BULB)?;
        fields[WeatherField::DewPoint.index()] = unique(obs_column::DEW_POINT)?;
        fields[WeatherField::RelHumidity.index()] = unique(obs_column::HUMIDITY)?;
        fields[WeatherField::WindSpeed.index()] = wind_speed;
        fields[WeatherField::WindDirection.index()] = unique(obs_column::WIND_DIRECTION)?;
        fields[WeatherField::Pressure.index()] = unique(obs_column::PRESSURE)?;

        Ok(Self {
            year: last_of(obs_column::YEAR)?,
            month: last_of(obs_column::MONTH)?,
            day: last_of(obs_column::DAY)?,
            hour: last_of(obs_column::HOUR)?,
            minute: unique(obs_column::MINUTES_STANDARD)?,
            fields,
            wind_in_ms,
        })
    }
}

/// Load a BoM half-hourly observation export into a sparse series
///
/// # Errors
/// * Returns `Error::ObservationData` if the file cannot be opened, a
///   required column is absent, or a timestamp cannot be decoded
pub fn load_observations(path: &Path) -> Result<ObservationSet> {
    debug!("Reading station observations from {}", path.display());

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            Error::observation_data(
                path.display().to_string(),
                "failed to open observation file".to_string(),
                Some(e),
            )
        })?;

    let headers = reader
        .headers()
        .map_err(|e| {
            Error::observation_data(
                path.display().to_string(),
                "failed to read observation header".to_string(),
                Some(e),
            )
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers, path)?;
    if columns.wind_in_ms {
        debug!("Observation file reports wind speed in m/s");
    }

    let mut samples = BTreeMap::new();
    let mut duplicates = 0usize;
    let mut record = StringRecord::new();
    let mut row = 1usize;
    while reader.read_record(&mut record).map_err(|e| {
        Error::observation_data(
            path.display().to_string(),
            format!("failed to read observation record at line {}", row + 1),
            Some(e),
        )
    })? {
        row += 1;
        let timestamp = parse_timestamp(&record, &columns, path, row)?;

        let mut values: FieldValues = [None; WeatherField::COUNT];
        for field in WeatherField::ALL {
            let position = columns.fields[field.index()];
            values[field.index()] = record
                .get(position)
                .filter(|text| !text.is_empty())
                .and_then(|text| text.parse::<f64>().ok());
        }

        if samples.insert(timestamp, values).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        warn!(
            "{} duplicate observation timestamps in {}; keeping the last occurrence of each",
            duplicates,
            path.display()
        );
    }

    info!(
        "Loaded {} observations from {}",
        samples.len(),
        path.display()
    );

    Ok(ObservationSet {
        samples,
        wind_in_ms: columns.wind_in_ms,
    })
}

/// Decode the local-standard timestamp columns of one record
fn parse_timestamp(
    record: &StringRecord,
    columns: &ColumnMap,
    file: &Path,
    row: usize,
) -> Result<NaiveDateTime> {
    let part = |position: usize, what: &str| -> Result<u32> {
        record
            .get(position)
            .and_then(|text| text.parse::<u32>().ok())
            .ok_or_else(|| {
                Error::observation_data(
                    file.display().to_string(),
                    format!("invalid {} at line {}", what, row),
                    None,
                )
            })
    };

    let year = part(columns.year, "year")? as i32;
    let month = part(columns.month, "month")?;
    let day = part(columns.day, "day")?;
    let hour = part(columns.hour, "hour")?;
    let minute = part(columns.minute, "minute")?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            Error::observation_data(
                file.display().to_string(),
                format!(
                    "invalid timestamp {}-{:02}-{:02} {:02}:{:02} at line {}",
                    year, month, day, hour, minute, row
                ),
                None,
            )
        })
}
