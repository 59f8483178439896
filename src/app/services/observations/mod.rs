//! Station observation ingestion and hourly normalization
//!
//! This module turns a BoM half-hourly observation export into the
//! canonical annual hourly series consumed by the output emitters.
//!
//! ## Architecture
//!
//! The pipeline is organized into two stages:
//! - [`parser`] - CSV decoding into a sparse timestamp-keyed series
//! - [`series`] - Bounded gap interpolation, hourly reindexing, sentinel
//!   fill and unit conversion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use weathermaker::app::services::observations;
//!
//! # fn example() -> weathermaker::Result<()> {
//! let raw = observations::load_observations(std::path::Path::new("HM01X_Data.txt"))?;
//! let series = observations::build_hourly_series(&raw, 2019, 2)?;
//! assert_eq!(series.len(), 8760);
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod series;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{ObservationSet, load_observations};
pub use series::build_hourly_series;
