//! TMY3 format emission
//!
//! One station preamble line, one fixed 68-field header line, then one
//! 68-field data line per hour. Fields the pipeline cannot supply carry
//! the documented -9900 sentinel with "?" source and 9 uncertainty.

use super::{AtomicFile, FormatWriter};
use crate::app::models::{HourlyRecord, Station};
use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::path::Path;

/// The fixed 68-field TMY3 column header
const HEADER: &str = "Date (MM/DD/YYYY),Time (HH:MM),ETR (W/m^2),ETRN (W/m^2),GHI (W/m^2),GHI source,GHI uncert (%),DNI (W/m^2),DNI source,DNI uncert (%),DHI (W/m^2),DHI source,DHI uncert (%),GH illum (lx),GH illum source,Global illum uncert (%),DN illum (lx),DN illum source,DN illum uncert (%),DH illum (lx),DH illum source,DH illum uncert (%),Zenith lum (cd/m^2),Zenith lum source,Zenith lum uncert (%),TotCld (tenths),TotCld source,TotCld uncert (code),OpqCld (tenths),OpqCld source,OpqCld uncert (code),Dry-bulb (C),Dry-bulb source,Dry-bulb uncert (code),Dew-point (C),Dew-point source,Dew-point uncert (code),RHum (%),RHum source,RHum uncert (code),Pressure (mbar),Pressure source,Pressure uncert (code),Wdir (degrees),Wdir source,Wdir uncert (code),Wspd (m/s),Wspd source,Wspd uncert (code),Hvis (m),Hvis source,Hvis uncert (code),CeilHgt (m),CeilHgt source,CeilHgt uncert (code),Pwat (cm),Pwat source,Pwat uncert (code),AOD (unitless),AOD source,AOD uncert (code),Alb (unitless),Alb source,Alb uncert (code),Lprecip depth (mm),Lprecip quantity (hr),Lprecip source,Lprecip uncert (code)";

/// TMY3 emitter
pub struct Tmy3Writer {
    out: AtomicFile,
    year: i32,
    timezone: f64,
    start: NaiveDateTime,
}

impl Tmy3Writer {
    /// Stage a TMY3 file for the given year
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

impl FormatWriter for Tmy3Writer {
    fn preamble(&mut self, station: &Station) -> Result<()> {
        // TMY3 station lines carry a two-letter region code.
        let state: String = station.state.chars().take(2).collect();
        self.out.write_line(&format!(
            "{},\"{} in {}\",{},{:.1},{:.3},{:.3},{}",
            station.number,
            station.name,
            self.year,
            state,
            self.timezone,
            station.location.latitude,
            station.location.longitude,
            station.elevation
        ))?;
        self.out.write_line(HEADER)
    }

    fn record(&mut self, record: &HourlyRecord) -> Result<()> {
        let time = self.start + Duration::hours(record.hour as i64);
        let weather = &record.weather;
        self.out.write_line(&format!(
            "{:02}/{:02}/{},{:02}:50,-9900,-9900,{},1,5,{},1,5,{},1,0,\
             -9900,1,0,-9900,1,0,-9900,1,0,-9900,1,0,-9900,?,9,-9900,?,9,\
             {:.1},A,7,{:.1},A,7,{:.1},A,7,{},A,7,{},A,7,{:.1},A,7,\
             -9900,?,9,-9900,?,9,-9900,?,9,-9900,?,9,-9900,?,9,-9900,-9900,?,9",
            time.month(),
            time.day(),
            time.year(),
            time.hour() + 1,
            record.ghi,
            record.dni,
            record.dhi as i64,
            weather.dry_bulb,
            weather.dew_point,
            weather.rel_humidity,
            (weather.pressure / 100.0) as i64,
            weather.wind_direction as i64,
            weather.wind_speed
        ))
    }

    fn finish(self: Box<Self>) -> Result<()> {
        self.out.persist()
    }
}
