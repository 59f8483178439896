//! Output file emission for the supported weather file formats
//!
//! One canonical emitter per format sits behind the [`FormatWriter`]
//! contract: a preamble written once, one data line per hourly record,
//! and an explicit finish. Output is staged in a temporary file in the
//! target directory and only moved into place by [`FormatWriter::finish`],
//! so an aborted run never leaves a partial output file behind.
//!
//! ## Architecture
//!
//! - [`tmy3`] - Typical Meteorological Year, version 3
//! - [`epw`] - EnergyPlus Weather

pub mod epw;
pub mod tmy3;

use crate::app::models::{HourlyRecord, OutputFormat, Station};
use crate::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

// Re-export main types for easy access
pub use epw::EpwWriter;
pub use tmy3::Tmy3Writer;

/// A sink for one output weather file
pub trait FormatWriter {
    /// Write the format's header lines for the station
    fn preamble(&mut self, station: &Station) -> Result<()>;

    /// Write one hourly data line
    fn record(&mut self, record: &HourlyRecord) -> Result<()>;

    /// Flush and move the staged file to its final path
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Create the emitter for the selected output format
pub fn create_writer(
    format: OutputFormat,
    path: &Path,
    year: i32,
    timezone: f64,
) -> Result<Box<dyn FormatWriter>> {
    match format {
        OutputFormat::Tmy3 => Ok(Box::new(Tmy3Writer::create(path, year, timezone)?)),
        OutputFormat::Epw => Ok(Box::new(EpwWriter::create(path, year, timezone)?)),
    }
}

/// Buffered, atomically-persisted output file
///
/// Lines accumulate in a temporary file beside the target; `persist`
/// moves it into place. Dropping without persisting removes the staging
/// file.
pub(crate) struct AtomicFile {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl AtomicFile {
    /// Stage a new output file next to `target`
    pub(crate) fn create(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| {
            Error::emit(
                target.display().to_string(),
                format!("cannot create staging file: {}", e),
            )
        })?;
        debug!(
            "Staging {} in {}",
            target.display(),
            temp.path().display()
        );
        Ok(Self {
            writer: BufWriter::new(temp),
            target: target.to_path_buf(),
        })
    }

    /// Append one line to the staged file
    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).map_err(|e| {
            Error::emit(
                self.target.display().to_string(),
                format!("write failed: {}", e),
            )
        })
    }

    /// Flush and move the staged file onto the target path
    pub(crate) fn persist(self) -> Result<()> {
        let target = self.target;
        let temp = self.writer.into_inner().map_err(|e| {
            Error::emit(
                target.display().to_string(),
                format!("flush failed: {}", e),
            )
        })?;
        temp.persist(&target).map_err(|e| {
            Error::emit(
                target.display().to_string(),
                format!("cannot move staged file into place: {}", e),
            )
        })?;
        debug!("Wrote {}", target.display());
        Ok(())
    }
}
