//! Application constants for weathermaker
//!
//! This module contains the BoM solar grid geometry, missing-value
//! sentinels, fixed-width field offsets, and default values used
//! throughout the weather file generator.

// =============================================================================
// Solar Grid Geometry
// =============================================================================

/// Grid cell size in degrees (both axes)
pub const CELLSIZE: f64 = 0.05;

/// Longitude of the grid's lower-left corner
pub const XLLCORNER: f64 = 112.025;

/// Latitude of the grid's lower-left corner
pub const YLLCORNER: f64 = -43.925;

/// Number of grid columns (west to east)
pub const MAXCOLS: usize = 839;

/// Number of grid rows (north to south; row 0 is the northernmost)
pub const MAXROWS: usize = 679;

/// Header lines preceding the data block in a BoM ASCII grid file
pub const GRID_HEADER_LINES: usize = 6;

// =============================================================================
// Missing-Value Sentinels
// =============================================================================

/// Sentinel values written into the hourly series and output files.
///
/// Zero is always a valid reading; sentinels are reserved values well
/// outside each field's physical range.
pub mod sentinel {
    /// Dry-bulb, wet-bulb and dew-point temperatures (degrees C)
    pub const TEMPERATURE: f64 = 99.9;

    /// Relative humidity (%)
    pub const HUMIDITY: f64 = 999.0;

    /// Wind speed (never unit-converted when present)
    pub const WIND_SPEED: f64 = 999.0;

    /// Wind direction (degrees true)
    pub const WIND_DIRECTION: f64 = 999.0;

    /// Station-level pressure (never unit-converted when present)
    pub const PRESSURE: f64 = 999999.0;

    /// Irradiance readings (GHI, DNI, DHI), W/m2
    pub const IRRADIANCE: i32 = -999;

    /// TMY3 fields this tool does not populate
    pub const TMY3_UNSUPPORTED: i32 = -9900;
}

// =============================================================================
// Station Details File Offsets
// =============================================================================

/// Byte ranges (start, end) of the fixed-width station details record
pub mod details_field {
    /// Station number
    pub const NUMBER: (usize, usize) = (3, 9);

    /// Station name
    pub const NAME: (usize, usize) = (15, 55);

    /// Latitude, decimal degrees
    pub const LATITUDE: (usize, usize) = (72, 80);

    /// Longitude, decimal degrees
    pub const LONGITUDE: (usize, usize) = (81, 90);

    /// State abbreviation
    pub const STATE: (usize, usize) = (107, 110);

    /// Station elevation, metres
    pub const ELEVATION: (usize, usize) = (111, 117);

    /// Percentage of observations flagged wrong
    pub const PERCENT_WRONG: (usize, usize) = (153, 156);

    /// Percentage of observations flagged suspect
    pub const PERCENT_SUSPECT: (usize, usize) = (157, 160);

    /// Percentage of observations flagged inconsistent
    pub const PERCENT_INCONSISTENT: (usize, usize) = (161, 164);
}

// =============================================================================
// Observation File Columns
// =============================================================================

/// Column names in the BoM half-hourly observation file.
///
/// The date/time columns appear twice (local time, then local standard
/// time); the parser selects the second occurrence of each.
pub mod obs_column {
    pub const YEAR: &str = "Year Month Day Hour Minutes in YYYY";
    pub const MONTH: &str = "MM";
    pub const DAY: &str = "DD";
    pub const HOUR: &str = "HH24";
    pub const MINUTES_STANDARD: &str = "MI format in Local standard time";

    pub const AIR_TEMP: &str = "Air Temperature in degrees C";
    pub const WET_BULB: &str = "Wet bulb temperature in degrees C";
    pub const DEW_POINT: &str = "Dew point temperature in degrees C";
    pub const HUMIDITY: &str = "Relative humidity in percentage %";
    pub const WIND_SPEED_KMH: &str = "Wind speed in km/h";
    pub const WIND_SPEED_MS: &str = "Wind speed in m/s";
    pub const WIND_DIRECTION: &str = "Wind direction in degrees true";
    pub const PRESSURE: &str = "Station level pressure in hPa";
}

// =============================================================================
// Time and Unit Conversions
// =============================================================================

/// Nominal observation cadence of the BoM half-hourly files
pub const SAMPLES_PER_HOUR: usize = 2;

/// Minute-of-hour at which observations are taken and records stamped
pub const OBSERVATION_MINUTE: i64 = 50;

/// Wind speed conversion divisor, km/h to m/s
pub const KMH_TO_MS: f64 = 3.6;

/// Pressure conversion factor, hPa to Pa
pub const HPA_TO_PA: f64 = 100.0;

/// Diffuse irradiance below this threshold is clamped to zero (W/m2)
pub const DHI_CLAMP_THRESHOLD: f64 = -10.0;

// =============================================================================
// Defaults
// =============================================================================

/// Default time zone offset from UTC (Australian Eastern Standard Time)
pub const DEFAULT_TIMEZONE: f64 = 10.0;

/// Default maximum interpolation gap, hours
pub const DEFAULT_MAX_GAP_HOURS: usize = 2;

// =============================================================================
// Helper Functions
// =============================================================================

/// True if the given calendar year contains a Feb 29
pub fn is_leap_year(year: i32) -> bool {
    chrono::NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of hours in the given calendar year (8760 or 8784)
pub fn hours_in_year(year: i32) -> usize {
    if is_leap_year(year) { 8784 } else { 8760 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2019));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_hours_in_year() {
        assert_eq!(hours_in_year(2019), 8760);
        assert_eq!(hours_in_year(2020), 8784);
        assert_eq!(hours_in_year(1900), 8760);
    }

    #[test]
    fn test_grid_extent() {
        // Northernmost latitude and easternmost longitude still on the grid
        let max_lat = YLLCORNER + CELLSIZE * MAXROWS as f64;
        let max_lon = XLLCORNER + CELLSIZE * MAXCOLS as f64;
        assert!(max_lat > -10.0 && max_lat < -9.9);
        assert!(max_lon > 153.9 && max_lon < 154.1);
    }
}
