//! Data models for weather file generation
//!
//! This module contains the core data structures for the BoM solar grid
//! coordinate mapping, station metadata, and the canonical hourly series
//! rows consumed by the output emitters.

use crate::constants::{CELLSIZE, MAXCOLS, MAXROWS, XLLCORNER, YLLCORNER, sentinel};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Coordinate Mapping
// =============================================================================

/// A point of latitude and longitude, WGS84 decimal degrees
///
/// Immutable once constructed. Convertible to the enclosing solar grid
/// cell with [`LatLong::to_cell`]; points outside the grid extent are an
/// error, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLong {
    /// Latitude in decimal degrees (south negative)
    pub latitude: f64,

    /// Longitude in decimal degrees (east positive)
    pub longitude: f64,
}

impl LatLong {
    /// Create a new point with range validation
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::configuration(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::configuration(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Map this point onto the solar grid cell containing it.
    ///
    /// The mapping floors the normalized offset from the grid's lower-left
    /// corner, so every point inside a cell maps to the same index. Points
    /// outside the grid extent return [`Error::PointOutsideGrid`].
    pub fn to_cell(&self) -> Result<GridCell> {
        let col = ((self.longitude - XLLCORNER) / CELLSIZE).floor();
        let row = (MAXROWS as f64 - (self.latitude - YLLCORNER) / CELLSIZE).floor() - 1.0;

        if row < 0.0 || col < 0.0 || row >= MAXROWS as f64 || col >= MAXCOLS as f64 {
            return Err(Error::PointOutsideGrid {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }

        Ok(GridCell {
            row: row as usize,
            col: col as usize,
        })
    }
}

impl fmt::Display for LatLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A cell index into the solar irradiance grid
///
/// Row 0 is the northernmost row; rows increase southward in grid-file
/// order. Invariant: `row < MAXROWS`, `col < MAXCOLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridCell {
    /// Row index, north to south
    pub row: usize,

    /// Column index, west to east
    pub col: usize,
}

impl GridCell {
    /// Create a new cell index with bounds validation
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= MAXROWS || col >= MAXCOLS {
            return Err(Error::CellOutsideGrid { row, col });
        }
        Ok(Self { row, col })
    }

    /// Return a representative point for this cell.
    ///
    /// This is the inverse of [`LatLong::to_cell`] up to cell resolution:
    /// round-trips land inside the same cell, not on the original point.
    pub fn to_point(&self) -> LatLong {
        LatLong {
            latitude: YLLCORNER + CELLSIZE * (MAXROWS - self.row) as f64,
            longitude: XLLCORNER + CELLSIZE * self.col as f64,
        }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// =============================================================================
// Station Metadata
// =============================================================================

/// A BoM weather station, parsed once from the station details file
///
/// Immutable for the run apart from the startup `--latlong`/`--name`
/// overrides applied by the orchestration layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    /// Station number as recorded in the details file (e.g. "070351")
    pub number: String,

    /// Human-readable station name (e.g. "CANBERRA AIRPORT")
    pub name: String,

    /// State abbreviation (e.g. "NSW", "ACT")
    pub state: String,

    /// Station location
    pub location: LatLong,

    /// Station elevation above sea level in metres
    pub elevation: i32,
}

impl Station {
    /// Create a new station with validation
    pub fn new(
        number: String,
        name: String,
        state: String,
        location: LatLong,
        elevation: i32,
    ) -> Result<Self> {
        let station = Self {
            number,
            name,
            state,
            location,
            elevation,
        };
        station.validate()?;
        Ok(station)
    }

    /// Validate station fields for consistency
    pub fn validate(&self) -> Result<()> {
        if self.number.trim().is_empty() {
            return Err(Error::station_details("station number cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::station_details("station name cannot be empty"));
        }
        if self.state.trim().len() < 2 {
            return Err(Error::station_details(format!(
                "state abbreviation '{}' is too short",
                self.state
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Hourly Series Fields
// =============================================================================

/// The fixed set of station observation fields carried through the
/// normalized hourly series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherField {
    DryBulb,
    WetBulb,
    DewPoint,
    RelHumidity,
    WindSpeed,
    WindDirection,
    Pressure,
}

impl WeatherField {
    /// Number of fields in the fixed set
    pub const COUNT: usize = 7;

    /// All fields, in series column order
    pub const ALL: [WeatherField; WeatherField::COUNT] = [
        WeatherField::DryBulb,
        WeatherField::WetBulb,
        WeatherField::DewPoint,
        WeatherField::RelHumidity,
        WeatherField::WindSpeed,
        WeatherField::WindDirection,
        WeatherField::Pressure,
    ];

    /// Column index of this field in the series
    pub fn index(self) -> usize {
        self as usize
    }

    /// The missing-value sentinel written when no observation survives
    /// interpolation and reindexing
    pub fn sentinel(self) -> f64 {
        match self {
            WeatherField::DryBulb | WeatherField::WetBulb | WeatherField::DewPoint => {
                sentinel::TEMPERATURE
            }
            WeatherField::RelHumidity => sentinel::HUMIDITY,
            WeatherField::WindSpeed => sentinel::WIND_SPEED,
            WeatherField::WindDirection => sentinel::WIND_DIRECTION,
            WeatherField::Pressure => sentinel::PRESSURE,
        }
    }

    /// Short label used in advisory log output
    pub fn label(self) -> &'static str {
        match self {
            WeatherField::DryBulb => "dry-bulb",
            WeatherField::WetBulb => "wet-bulb",
            WeatherField::DewPoint => "dew-point",
            WeatherField::RelHumidity => "rel-humidity",
            WeatherField::WindSpeed => "wind-speed",
            WeatherField::WindDirection => "wind-direction",
            WeatherField::Pressure => "atm-pressure",
        }
    }
}

impl fmt::Display for WeatherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One hour's station observation fields after normalization.
///
/// Values are either real readings in output units (m/s, Pa) or the
/// per-field sentinel; never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WeatherSample {
    /// Dry-bulb temperature, degrees C
    pub dry_bulb: f64,

    /// Wet-bulb temperature, degrees C
    pub wet_bulb: f64,

    /// Dew-point temperature, degrees C
    pub dew_point: f64,

    /// Relative humidity, percent
    pub rel_humidity: f64,

    /// Wind speed, m/s
    pub wind_speed: f64,

    /// Wind direction, degrees true
    pub wind_direction: f64,

    /// Station-level atmospheric pressure, Pa
    pub pressure: f64,
}

impl WeatherSample {
    /// Build a sample from values laid out in [`WeatherField::ALL`] order
    pub fn from_values(values: [f64; WeatherField::COUNT]) -> Self {
        Self {
            dry_bulb: values[WeatherField::DryBulb.index()],
            wet_bulb: values[WeatherField::WetBulb.index()],
            dew_point: values[WeatherField::DewPoint.index()],
            rel_humidity: values[WeatherField::RelHumidity.index()],
            wind_speed: values[WeatherField::WindSpeed.index()],
            wind_direction: values[WeatherField::WindDirection.index()],
            pressure: values[WeatherField::Pressure.index()],
        }
    }
}

/// One row of the canonical annual hourly series
///
/// Produced exactly once per hour-of-year. Feb 29 rows exist in the
/// working series of a leap year but are skipped at file emission.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HourlyRecord {
    /// Hour index from local-standard-time midnight Jan 1 (0..8759/8783)
    pub hour: usize,

    /// Normalized station observation fields
    pub weather: WeatherSample,

    /// Global horizontal irradiance, W/m2 (-999 when unavailable)
    pub ghi: i32,

    /// Direct normal irradiance, W/m2 (-999 when unavailable)
    pub dni: i32,

    /// Diffuse horizontal irradiance, W/m2 (-999 when unavailable)
    pub dhi: f64,
}

// =============================================================================
// Irradiance Lookup
// =============================================================================

/// Solar irradiance variables resolved from the grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarVariable {
    /// Global horizontal irradiance
    Ghi,
    /// Direct normal irradiance
    Dni,
}

impl SolarVariable {
    /// Both variables, in lookup order
    pub const ALL: [SolarVariable; 2] = [SolarVariable::Ghi, SolarVariable::Dni];

    /// Directory layer name in the gridded data tree
    pub fn dir_name(self) -> &'static str {
        match self {
            SolarVariable::Ghi => "GHI",
            SolarVariable::Dni => "DNI",
        }
    }

    /// Lowercase tag used in grid filenames and trace request paths
    pub fn file_tag(self) -> &'static str {
        match self {
            SolarVariable::Ghi => "ghi",
            SolarVariable::Dni => "dni",
        }
    }
}

impl fmt::Display for SolarVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Where an irradiance sample was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SampleOrigin {
    /// Read from a grid file on disk
    GridFile,
    /// Looked up in a fetched HTTP trace
    HttpTrace,
}

/// A pair of irradiance readings for one hour
///
/// The sentinel -999 means "unavailable"; 0 is a valid reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct IrradianceSample {
    /// Global horizontal irradiance, W/m2
    pub ghi: i32,

    /// Direct normal irradiance, W/m2
    pub dni: i32,

    /// Backend that produced this sample
    pub origin: SampleOrigin,
}

// =============================================================================
// Output Format
// =============================================================================

/// Supported output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum OutputFormat {
    /// Typical Meteorological Year, version 3
    Tmy3,
    /// EnergyPlus Weather
    Epw,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tmy3" => Ok(OutputFormat::Tmy3),
            "epw" => Ok(OutputFormat::Epw),
            other => Err(Error::configuration(format!(
                "unknown output format '{}' (expected 'tmy3' or 'epw')",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tmy3 => write!(f, "TMY3"),
            OutputFormat::Epw => write!(f, "EPW"),
        }
    }
}
