//! Run configuration assembled from command line arguments
//!
//! A [`Config`] is the validated, fully-resolved form of the CLI flags:
//! paths checked, the output format decoded, and exactly one irradiance
//! source selected. Everything downstream of the CLI layer works from
//! this struct, never from raw arguments.

use crate::app::models::{LatLong, OutputFormat};
use crate::constants::{DEFAULT_MAX_GAP_HOURS, DEFAULT_TIMEZONE};
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Validated configuration for one weather file generation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Top of the gridded irradiance data tree (file-backed source)
    pub grids: Option<PathBuf>,

    /// Base URL of the remote irradiance trace service (network-backed source)
    pub trace_url: Option<String>,

    /// Observer location override; the station location applies when absent
    pub latlong: Option<LatLong>,

    /// Station name override
    pub name: Option<String>,

    /// Maximum interpolation gap length, hours
    pub max_gap_hours: usize,

    /// Calendar year to generate
    pub year: i32,

    /// BoM station code
    pub station_code: String,

    /// BoM half-hourly observation file
    pub hm_data: PathBuf,

    /// BoM station details file
    pub hm_details: PathBuf,

    /// Time zone offset from UTC, hours
    pub timezone: f64,

    /// Output file path
    pub output: PathBuf,

    /// Output file format
    pub format: OutputFormat,
}

impl Config {
    /// Validate cross-field consistency
    ///
    /// # Errors
    /// * Returns `Error::Configuration` when no irradiance source (or
    ///   both) is configured, the grid path is not a directory, an input
    ///   file is absent, or the year is outside the supported range
    pub fn validate(&self) -> Result<()> {
        match (&self.grids, &self.trace_url) {
            (None, None) => {
                return Err(Error::configuration(
                    "no irradiance source: supply --grids or --trace-url",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(Error::configuration(
                    "--grids and --trace-url are mutually exclusive",
                ));
            }
            _ => {}
        }

        if let Some(grids) = &self.grids {
            if !grids.is_dir() {
                return Err(Error::configuration(format!(
                    "{} is not a directory",
                    grids.display()
                )));
            }
        }

        if !self.hm_data.is_file() {
            return Err(Error::configuration(format!(
                "observation file {} does not exist",
                self.hm_data.display()
            )));
        }
        if !self.hm_details.is_file() {
            return Err(Error::configuration(format!(
                "station details file {} does not exist",
                self.hm_details.display()
            )));
        }

        // BoM gridded solar data begins in the satellite era.
        if !(1900..=2100).contains(&self.year) {
            return Err(Error::configuration(format!(
                "year {} is out of range",
                self.year
            )));
        }

        if self.station_code.trim().is_empty() {
            return Err(Error::configuration("station code cannot be empty"));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grids: None,
            trace_url: None,
            latlong: None,
            name: None,
            max_gap_hours: DEFAULT_MAX_GAP_HOURS,
            year: 0,
            station_code: String::new(),
            hm_data: PathBuf::new(),
            hm_details: PathBuf::new(),
            timezone: DEFAULT_TIMEZONE,
            output: PathBuf::new(),
            format: OutputFormat::Epw,
        }
    }
}
