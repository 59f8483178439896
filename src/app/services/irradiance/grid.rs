//! Disk-backed irradiance lookup in BoM solar grid files
//!
//! One file per variable per hour, named
//! `<root>/<GHI|DNI>/<year>/solar_<ghi|dni>_<yyyymmdd>_<HH>UT.txt`.
//! Each file carries a six-line header followed by one line of
//! whitespace-separated integers per grid row, northernmost row first.

use super::IrradianceSource;
use crate::app::models::{GridCell, IrradianceSample, SampleOrigin, SolarVariable};
use crate::constants::GRID_HEADER_LINES;
use crate::{Error, Result};
use chrono::{NaiveDateTime, Timelike};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Irradiance source reading BoM gridded data from disk
///
/// A missing or malformed grid file degrades that hour's value to zero
/// with a logged error; the run continues. A -999 cell inside a healthy
/// file passes through as the missing-data sentinel.
#[derive(Debug, Clone)]
pub struct GridSource {
    /// Top of the gridded data tree
    root: PathBuf,
}

impl GridSource {
    /// Create a source over a gridded data tree
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Compute the grid file path for one variable and UTC hour
    fn grid_path(&self, variable: SolarVariable, hour_utc: NaiveDateTime) -> PathBuf {
        let leaf = format!(
            "solar_{}_{}_{:02}UT.txt",
            variable.file_tag(),
            hour_utc.format("%Y%m%d"),
            hour_utc.hour()
        );
        self.root
            .join(variable.dir_name())
            .join(hour_utc.format("%Y").to_string())
            .join(leaf)
    }

    /// Read one cell value, degrading any per-file problem to zero
    fn read_value(&self, variable: SolarVariable, hour_utc: NaiveDateTime, cell: GridCell) -> i32 {
        let path = self.grid_path(variable, hour_utc);
        match read_cell(&path, cell) {
            Ok(value) => value,
            Err(e) => {
                error!("{}", e);
                0
            }
        }
    }
}

impl IrradianceSource for GridSource {
    fn fetch(&mut self, hour_utc: NaiveDateTime, cell: GridCell) -> Result<IrradianceSample> {
        let ghi = self.read_value(SolarVariable::Ghi, hour_utc, cell);
        let dni = self.read_value(SolarVariable::Dni, hour_utc, cell);
        Ok(IrradianceSample {
            ghi,
            dni,
            origin: SampleOrigin::GridFile,
        })
    }
}

/// Extract the integer at `cell` from one grid file
fn read_cell(path: &Path, cell: GridCell) -> Result<i32> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::grid_data(path.display().to_string(), format!("cannot read: {}", e))
    })?;

    let line = contents
        .lines()
        .nth(cell.row + GRID_HEADER_LINES)
        .ok_or_else(|| {
            Error::grid_data(
                path.display().to_string(),
                format!("no data line for grid row {}", cell.row),
            )
        })?;

    let word = line.split_whitespace().nth(cell.col).ok_or_else(|| {
        Error::grid_data(
            path.display().to_string(),
            format!("no column {} in data line for grid row {}", cell.col, cell.row),
        )
    })?;

    word.parse::<i32>().map_err(|_| {
        Error::grid_data(
            path.display().to_string(),
            format!("invalid irradiance value '{}'", word),
        )
    })
}
