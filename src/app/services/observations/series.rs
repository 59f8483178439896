//! Hourly normalization of the sparse observation series
//!
//! Produces exactly one row per hour of the target year, indexed from
//! local-standard-time midnight on Jan 1. Short gaps are linearly
//! interpolated in sample positions before reindexing; whatever is still
//! missing on the hourly grid is filled with the per-field sentinel.

use super::parser::{FieldValues, ObservationSet};
use crate::app::models::{WeatherField, WeatherSample};
use crate::constants::{HPA_TO_PA, KMH_TO_MS, SAMPLES_PER_HOUR, hours_in_year, sentinel};
use crate::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Build the canonical annual hourly series for one station year
///
/// The algorithm follows a fixed order:
/// 1. interpolate gaps no longer than `max_gap_hours` (in source samples,
///    two per hour); longer gaps are left missing end to end
/// 2. reindex onto the exact hourly grid of `year`, exact-timestamp match
/// 3. fill still-missing values with the per-field sentinel
/// 4. convert wind speed km/h to m/s and pressure hPa to Pa, skipping
///    sentinel values
///
/// The resulting row count is asserted: 8760 rows, or 8784 in a leap
/// year. A mismatch is a programming error, not bad input.
///
/// # Errors
/// * Returns `Error::Configuration` if `year` is outside the supported
///   calendar range
pub fn build_hourly_series(
    observations: &ObservationSet,
    year: i32,
    max_gap_hours: usize,
) -> Result<Vec<WeatherSample>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::configuration(format!("year {} is out of range", year)))?;

    // Column-major copy of the sparse series for positional interpolation.
    let timestamps: Vec<NaiveDateTime> = observations.samples.keys().copied().collect();
    let mut columns: Vec<Vec<Option<f64>>> =
        vec![vec![None; timestamps.len()]; WeatherField::COUNT];
    for (position, values) in observations.samples.values().enumerate() {
        for field in WeatherField::ALL {
            columns[field.index()][position] = values[field.index()];
        }
    }

    let limit = max_gap_hours * SAMPLES_PER_HOUR;
    debug!(
        "Interpolating gaps up to {} samples across {} observations",
        limit,
        timestamps.len()
    );
    for column in &mut columns {
        interpolate_gaps(column, limit);
    }

    let positions: HashMap<NaiveDateTime, usize> = timestamps
        .iter()
        .enumerate()
        .map(|(position, timestamp)| (*timestamp, position))
        .collect();

    let hours = hours_in_year(year);
    let mut missing = [0usize; WeatherField::COUNT];
    let mut rows = Vec::with_capacity(hours);

    for hour in 0..hours {
        let timestamp = start + Duration::hours(hour as i64);
        let values: FieldValues = match positions.get(&timestamp) {
            Some(&position) => {
                let mut values = [None; WeatherField::COUNT];
                for field in WeatherField::ALL {
                    values[field.index()] = columns[field.index()][position];
                }
                values
            }
            None => [None; WeatherField::COUNT],
        };

        let mut filled = [0.0f64; WeatherField::COUNT];
        for field in WeatherField::ALL {
            match values[field.index()] {
                Some(value) => filled[field.index()] = value,
                None => {
                    missing[field.index()] += 1;
                    filled[field.index()] = field.sentinel();
                }
            }
        }

        let wind = WeatherField::WindSpeed.index();
        if !observations.wind_in_ms && filled[wind] != sentinel::WIND_SPEED {
            filled[wind] /= KMH_TO_MS;
        }
        let pressure = WeatherField::Pressure.index();
        if filled[pressure] != sentinel::PRESSURE {
            filled[pressure] *= HPA_TO_PA;
        }

        rows.push(WeatherSample::from_values(filled));
    }

    let total_missing: usize = missing.iter().sum();
    if total_missing > 0 {
        let breakdown = WeatherField::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), missing[field.index()]))
            .collect::<Vec<_>>()
            .join(", ");
        warn!("missing values in weather data: {}", breakdown);
    }

    // Basic integrity check on the series.
    assert_eq!(rows.len(), hours_in_year(year));
    Ok(rows)
}

/// Linearly interpolate missing runs no longer than `limit` samples.
///
/// Positional semantics: samples are treated as equally spaced whatever
/// their actual timestamps. Runs at either end of the series have no
/// bounding value on one side and stay missing. Also used by the
/// network-backed irradiance source on its fetched hourly traces.
pub(crate) fn interpolate_gaps(column: &mut [Option<f64>], limit: usize) {
    if limit == 0 {
        return;
    }

    let mut last_known: Option<(usize, f64)> = None;
    let mut i = 0;
    while i < column.len() {
        match column[i] {
            Some(value) => {
                last_known = Some((i, value));
                i += 1;
            }
            None => {
                let run_start = i;
                while i < column.len() && column[i].is_none() {
                    i += 1;
                }
                let run = i - run_start;
                if run > limit {
                    continue;
                }
                if let (Some((prev_index, prev)), Some(Some(next))) =
                    (last_known, column.get(i).copied())
                {
                    let span = (i - prev_index) as f64;
                    for k in run_start..i {
                        let fraction = (k - prev_index) as f64 / span;
                        column[k] = Some(prev + (next - prev) * fraction);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_fills_short_gap() {
        let mut column = vec![Some(10.0), None, None, Some(40.0)];
        interpolate_gaps(&mut column, 4);
        assert_eq!(column, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_interpolate_skips_long_gap() {
        let mut column = vec![Some(10.0), None, None, None, Some(50.0)];
        interpolate_gaps(&mut column, 2);
        assert_eq!(column, vec![Some(10.0), None, None, None, Some(50.0)]);
    }

    #[test]
    fn test_interpolate_leaves_edges_missing() {
        let mut column = vec![None, Some(10.0), Some(20.0), None];
        interpolate_gaps(&mut column, 4);
        assert_eq!(column, vec![None, Some(10.0), Some(20.0), None]);
    }

    #[test]
    fn test_interpolate_exact_limit_gap() {
        let mut column = vec![Some(0.0), None, None, Some(3.0)];
        interpolate_gaps(&mut column, 2);
        assert_eq!(column, vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_interpolate_zero_limit_is_noop() {
        let mut column = vec![Some(0.0), None, Some(2.0)];
        interpolate_gaps(&mut column, 0);
        assert_eq!(column, vec![Some(0.0), None, Some(2.0)]);
    }
}
