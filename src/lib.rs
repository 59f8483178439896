//! Weathermaker Library
//!
//! A Rust library for generating hourly TMY3 and EPW weather files from
//! Australian Bureau of Meteorology (BoM) data: half-hourly station
//! observations plus gridded solar irradiance estimates.
//!
//! This library provides tools for:
//! - Mapping a latitude/longitude onto the BoM solar grid cell index
//! - Resolving per-hour GHI/DNI readings from grid files or a remote trace
//! - Deriving diffuse horizontal irradiance via solar-zenith geometry
//! - Normalizing irregular observation series onto an exact 8760/8784-hour
//!   annual grid with documented sentinel values
//! - Emitting TMY3 and EPW files through a common writer contract

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod emitter;
        pub mod irradiance;
        pub mod observations;
        pub mod solar;
        pub mod station_details;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{GridCell, HourlyRecord, LatLong, Station};
pub use config::Config;

/// Result type alias for weathermaker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for weather file generation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Station details file error
    #[error("Station details error: {message}")]
    StationDetails { message: String },

    /// Observation data file error
    #[error("Observation data error in file '{file}': {message}")]
    ObservationData {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Point falls outside the solar grid extent
    #[error("point ({latitude:.4}, {longitude:.4}) is outside the solar grid")]
    PointOutsideGrid { latitude: f64, longitude: f64 },

    /// Cell index falls outside the solar grid extent
    #[error("cell ({row}, {col}) is outside the solar grid")]
    CellOutsideGrid { row: usize, col: usize },

    /// Grid file content error
    #[error("grid file '{file}': {message}")]
    GridData { file: String, message: String },

    /// Remote irradiance trace error
    #[error("irradiance trace '{url}': {message}")]
    TraceFetch {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Solar position computation error
    #[error("solar position: {message}")]
    SolarPosition { message: String },

    /// Output emission error
    #[error("output error for '{file}': {message}")]
    Emit { file: String, message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a station details error
    pub fn station_details(message: impl Into<String>) -> Self {
        Self::StationDetails {
            message: message.into(),
        }
    }

    /// Create an observation data error
    pub fn observation_data(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::ObservationData {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a grid data error
    pub fn grid_data(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GridData {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a trace fetch error
    pub fn trace_fetch(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::TraceFetch {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a solar position error
    pub fn solar_position(message: impl Into<String>) -> Self {
        Self::SolarPosition {
            message: message.into(),
        }
    }

    /// Create an output emission error
    pub fn emit(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Emit {
            file: file.into(),
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
