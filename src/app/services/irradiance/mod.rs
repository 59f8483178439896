//! Per-hour GHI and DNI resolution
//!
//! Two interchangeable backends sit behind the [`IrradianceSource`]
//! contract: one reads BoM gridded data files from disk, the other
//! fetches a full-year hourly trace per variable over HTTP once and
//! answers lookups from the cached series. The rest of the pipeline
//! only depends on [`IrradianceSource::fetch`].
//!
//! ## Architecture
//!
//! - [`grid`] - Disk-backed lookup in BoM solar grid files
//! - [`trace`] - Network-backed lookup in fetched hourly traces

pub mod grid;
pub mod trace;

use crate::app::models::{GridCell, IrradianceSample, Station};
use crate::config::Config;
use crate::{Error, Result};
use chrono::NaiveDateTime;

// Re-export main types for easy access
pub use grid::GridSource;
pub use trace::TraceSource;

/// A source of hourly GHI/DNI samples for one run
///
/// `fetch` never fails for an individual unavailable hour: per-sample
/// problems degrade to zero or the -999 sentinel with a log line. Errors
/// are reserved for faults that invalidate the whole run, such as the
/// one-time trace download failing.
pub trait IrradianceSource {
    /// Resolve the irradiance pair for one UTC hour and grid cell
    fn fetch(&mut self, hour_utc: NaiveDateTime, cell: GridCell) -> Result<IrradianceSample>;
}

/// Select the irradiance backend from the run configuration
///
/// A gridded-data directory selects the disk backend; otherwise the
/// trace URL selects the network backend. Configuration validation
/// guarantees exactly one of the two is present.
pub fn select_source(config: &Config, station: &Station) -> Result<Box<dyn IrradianceSource>> {
    if let Some(grids) = &config.grids {
        return Ok(Box::new(GridSource::new(grids.clone())));
    }
    if let Some(base_url) = &config.trace_url {
        return Ok(Box::new(TraceSource::new(
            base_url.clone(),
            config.year,
            station.location,
            config.max_gap_hours,
        )));
    }
    Err(Error::configuration(
        "no irradiance source configured: supply a gridded data directory or a trace URL",
    ))
}
