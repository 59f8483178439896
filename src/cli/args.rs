//! Command-line argument definitions for weathermaker
//!
//! One flat argument set covering the whole run; cross-flag rules live
//! in [`Args::validate`] by way of [`Config::validate`], so every
//! downstream component sees a checked [`Config`] rather than raw flags.

use crate::app::models::{LatLong, OutputFormat};
use crate::config::Config;
use crate::constants::{DEFAULT_MAX_GAP_HOURS, DEFAULT_TIMEZONE};
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the weathermaker generator
///
/// Converts Australian Bureau of Meteorology half-hourly station
/// observations and gridded solar irradiance data into hourly TMY3 or
/// EPW weather files for building and solar energy simulation.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weathermaker",
    version,
    about = "Generate TMY3 and EPW weather files from BoM observation and solar data",
    long_about = "Generates hourly TMY3 or EPW weather files for one station and calendar \
                  year by combining a BoM half-hourly observation export with gridded solar \
                  irradiance data (from a local grid-file tree or a remote trace service). \
                  Please file bug reports at https://github.com/bje-/weather-maker/"
)]
pub struct Args {
    /// Top of the gridded irradiance data tree
    ///
    /// Expects <DIR>/GHI/<year>/ and <DIR>/DNI/<year>/ subtrees of BoM
    /// ASCII grid files. Exactly one of --grids and --trace-url must be
    /// given.
    #[arg(long = "grids", value_name = "DIR")]
    pub grids: Option<PathBuf>,

    /// Base URL of a remote irradiance trace service
    ///
    /// The service is queried once per variable for the whole year.
    /// Exactly one of --grids and --trace-url must be given.
    #[arg(long = "trace-url", value_name = "URL")]
    pub trace_url: Option<String>,

    /// Latitude and longitude of the location
    ///
    /// Overrides the station location from the details file; the station
    /// name becomes the coordinate pair unless --name is also given.
    #[arg(
        short = 'l',
        long = "latlong",
        value_names = ["LAT", "LON"],
        num_args = 2,
        allow_negative_numbers = true
    )]
    pub latlong: Option<Vec<f64>>,

    /// Maximum length of interpolation (hours)
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "HOURS",
        default_value_t = DEFAULT_MAX_GAP_HOURS
    )]
    pub interval: usize,

    /// Year to generate
    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub year: i32,

    /// Nearest BoM station code
    #[arg(long = "st", value_name = "CODE")]
    pub st: String,

    /// Override the station name
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// BoM half-hourly station data file
    #[arg(long = "hm-data", value_name = "FILE")]
    pub hm_data: PathBuf,

    /// BoM station details file
    #[arg(long = "hm-details", value_name = "FILE")]
    pub hm_details: PathBuf,

    /// Time zone offset from UTC [default +10]
    #[arg(
        long = "tz",
        value_name = "HOURS",
        default_value_t = DEFAULT_TIMEZONE,
        allow_negative_numbers = true
    )]
    pub tz: f64,

    /// Output filename
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: PathBuf,

    /// Output format: EPW [default] or TMY3
    #[arg(long = "format", value_name = "FMT", default_value = "epw")]
    pub format: String,

    /// Increase log verbosity (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Resolve and validate these arguments into a run configuration
    ///
    /// # Errors
    /// * Returns `Error::Configuration` for an unknown output format,
    ///   invalid coordinates, or any cross-flag rule in
    ///   [`Config::validate`]
    pub fn validate(&self) -> Result<Config> {
        let format: OutputFormat = self.format.parse()?;

        let latlong = match &self.latlong {
            // num_args = 2 guarantees the pair when the flag is present.
            Some(pair) => Some(LatLong::new(pair[0], pair[1])?),
            None => None,
        };

        let config = Config {
            grids: self.grids.clone(),
            trace_url: self.trace_url.clone(),
            latlong,
            name: self.name.clone(),
            max_gap_hours: self.interval,
            year: self.year,
            station_code: self.st.clone(),
            hm_data: self.hm_data.clone(),
            hm_details: self.hm_details.clone(),
            timezone: self.tz,
            output: self.out.clone(),
            format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Map the verbosity flags to a tracing level filter string
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Progress display is wanted unless logging is chatty or suppressed
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbose == 0
    }
}
