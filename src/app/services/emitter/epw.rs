//! EPW format emission
//!
//! One `LOCATION` line, six fixed metadata lines and a `DATA PERIODS`
//! line, then one data line per hour. Fields the pipeline cannot supply
//! carry the EPW per-field missing codes; the 39-character flags field
//! is left as underscores.

use super::{AtomicFile, FormatWriter};
use crate::app::models::{HourlyRecord, Station};
use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::path::Path;

/// EPW emitter
pub struct EpwWriter {
    out: AtomicFile,
    year: i32,
    timezone: f64,
    start: NaiveDateTime,
}

impl EpwWriter {
    /// Stage an EPW file for the given year
    pub fn create(path: &Path, year: i32, timezone: f64) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| Error::configuration(format!("year {} is out of range", year)))?;
        Ok(Self {
            out: AtomicFile::create(path)?,
            year,
            timezone,
            start,
        })
    }
}

impl FormatWriter for EpwWriter {
    fn preamble(&mut self, station: &Station) -> Result<()> {
        self.out.write_line(&format!(
            "LOCATION,{} ({}) in {},{},AUS,BoM,{},{:.2},{:.2},{:.1},{:.1}",
            station.name,
            station.number,
            self.year,
            station.state,
            station.number,
            station.location.latitude,
            station.location.longitude,
            self.timezone,
            f64::from(station.elevation)
        ))?;
        self.out.write_line("DESIGN CONDITIONS,0")?;
        self.out.write_line("TYPICAL/EXTREME PERIODS,,")?;
        self.out.write_line("GROUND TEMPERATURES,,,,,,")?;
        self.out.write_line("HOLIDAYS/DAYLIGHT SAVINGS,No,0,0,0")?;
        self.out.write_line(&format!(
            "COMMENTS 1,Generated by weathermaker from Bureau of Meteorology solar and weather data ({})",
            self.year
        ))?;
        self.out.write_line(
            "COMMENTS 2,Please report weathermaker bugs at https://github.com/bje-/weather-maker",
        )?;
        self.out
            .write_line("DATA PERIODS,1,1,Data,Sunday,1/ 1,12/31")
    }

    fn record(&mut self, record: &HourlyRecord) -> Result<()> {
        let time = self.start + Duration::hours(record.hour as i64);
        let weather = &record.weather;
        self.out.write_line(&format!(
            "{},{},{},{},50,{},{:.1},{:.1},{},{},9999,9999,9999,{},{},{},\
             999999,999999,999999,999999,{},{:.1},99,99,9999,99999,9,999999999,\
             99999,0.999,999,99,999,0,99",
            time.year(),
            time.month(),
            time.day(),
            time.hour() + 1,
            "_".repeat(39),
            weather.dry_bulb,
            weather.dew_point,
            weather.rel_humidity as i64,
            weather.pressure as i64,
            record.ghi,
            record.dni,
            record.dhi as i64,
            weather.wind_direction as i64,
            weather.wind_speed
        ))
    }

    fn finish(self: Box<Self>) -> Result<()> {
        self.out.persist()
    }
}
