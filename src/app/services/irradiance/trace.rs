//! Network-backed irradiance lookup from fetched hourly traces
//!
//! For a fixed coordinate and calendar year, one CSV trace per variable
//! is fetched from `<base>/<ghi|dni>?year=<y>&lat=<lat>&lon=<lon>` the
//! first time a sample is requested, then every lookup is answered from
//! the cached series. Short gaps in a trace are interpolated once at
//! fetch time; hours the trace does not cover resolve to the -999
//! sentinel.

use super::IrradianceSource;
use crate::app::models::{GridCell, IrradianceSample, LatLong, SampleOrigin, SolarVariable};
use crate::app::services::observations::series::interpolate_gaps;
use crate::constants::sentinel;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use reqwest::blocking::Client;
use tracing::{debug, info};

/// Trace rows carry `YYYY-MM-DDTHH:MMZ` hourly UTC timestamps
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Irradiance source answering lookups from fetched hourly traces
///
/// The trace endpoint serves one coordinate per request, so the grid
/// cell argument of [`IrradianceSource::fetch`] is ignored: the
/// coordinate is fixed at construction. A failed download is fatal for
/// the run; per-hour coverage gaps are not.
pub struct TraceSource {
    client: Client,
    base_url: String,
    year: i32,
    location: LatLong,
    max_gap_hours: usize,
    cache: Option<TraceCache>,
}

/// Both variables' traces, downloaded once per run
struct TraceCache {
    ghi: TraceSeries,
    dni: TraceSeries,
}

/// One variable's hourly trace, slotted from its first timestamp
#[derive(Debug, Clone)]
struct TraceSeries {
    start: NaiveDateTime,
    values: Vec<Option<f64>>,
}

impl TraceSeries {
    /// Slot parsed rows onto an hourly axis and fill short gaps
    fn from_rows(mut rows: Vec<(NaiveDateTime, Option<f64>)>, max_gap_hours: usize) -> Self {
        rows.sort_by_key(|(timestamp, _)| *timestamp);

        let (Some((first, _)), Some((last, _))) = (rows.first(), rows.last()) else {
            return Self {
                start: NaiveDateTime::MIN,
                values: Vec::new(),
            };
        };

        let start = *first;
        let len = (*last - start).num_hours() as usize + 1;
        let mut values = vec![None; len];
        for (timestamp, value) in &rows {
            let offset = (*timestamp - start).num_hours();
            if (0..len as i64).contains(&offset) {
                values[offset as usize] = *value;
            }
        }

        // Traces are hourly, so the gap limit is one sample per hour.
        interpolate_gaps(&mut values, max_gap_hours);

        Self { start, values }
    }

    /// Look up the value for one UTC hour, if the trace covers it
    fn lookup(&self, hour_utc: NaiveDateTime) -> Option<f64> {
        let offset = (hour_utc - self.start).num_hours();
        if offset < 0 {
            return None;
        }
        self.values.get(offset as usize).copied().flatten()
    }
}

impl TraceSource {
    /// Create a source for one coordinate and year
    pub fn new(base_url: String, year: i32, location: LatLong, max_gap_hours: usize) -> Self {
        Self {
            client: Client::new(),
            base_url,
            year,
            location,
            max_gap_hours,
            cache: None,
        }
    }

    /// Download both traces on first use
    fn ensure_cache(&mut self) -> Result<&TraceCache> {
        if self.cache.is_none() {
            let ghi = self.download(SolarVariable::Ghi)?;
            let dni = self.download(SolarVariable::Dni)?;
            info!(
                "Cached {} GHI and {} DNI trace hours",
                ghi.values.len(),
                dni.values.len()
            );
            self.cache = Some(TraceCache { ghi, dni });
        }
        self.cache.as_ref().ok_or_else(|| {
            Error::trace_fetch(
                self.base_url.clone(),
                "trace cache unavailable".to_string(),
                None,
            )
        })
    }

    /// Fetch and parse one variable's trace
    fn download(&self, variable: SolarVariable) -> Result<TraceSeries> {
        let url = format!(
            "{}/{}?year={}&lat={}&lon={}",
            self.base_url.trim_end_matches('/'),
            variable.file_tag(),
            self.year,
            self.location.latitude,
            self.location.longitude
        );
        info!("Fetching {} trace from {}", variable, url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::trace_fetch(url.clone(), "request failed".to_string(), Some(e)))?
            .error_for_status()
            .map_err(|e| {
                Error::trace_fetch(
                    url.clone(),
                    "server returned an error status".to_string(),
                    Some(e),
                )
            })?;
        let body = response.text().map_err(|e| {
            Error::trace_fetch(
                url.clone(),
                "failed to read response body".to_string(),
                Some(e),
            )
        })?;

        let rows = parse_trace_csv(&body, &url)?;
        debug!("Fetched {} {} trace rows", rows.len(), variable);
        Ok(TraceSeries::from_rows(rows, self.max_gap_hours))
    }
}

impl IrradianceSource for TraceSource {
    fn fetch(&mut self, hour_utc: NaiveDateTime, _cell: GridCell) -> Result<IrradianceSample> {
        let (ghi, dni) = {
            let cache = self.ensure_cache()?;
            (cache.ghi.lookup(hour_utc), cache.dni.lookup(hour_utc))
        };

        let resolve = |value: Option<f64>, variable: SolarVariable| match value {
            Some(value) => value as i32,
            None => {
                debug!("no {} trace value for {}", variable, hour_utc);
                sentinel::IRRADIANCE
            }
        };

        Ok(IrradianceSample {
            ghi: resolve(ghi, SolarVariable::Ghi),
            dni: resolve(dni, SolarVariable::Dni),
            origin: SampleOrigin::HttpTrace,
        })
    }
}

/// Parse a `timestamp,irradiance` trace body; empty values are gaps
fn parse_trace_csv(body: &str, url: &str) -> Result<Vec<(NaiveDateTime, Option<f64>)>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            Error::trace_fetch(url.to_string(), format!("malformed trace row: {}", e), None)
        })?;
        let Some(timestamp_text) = record.get(0).filter(|text| !text.is_empty()) else {
            continue;
        };
        let timestamp = NaiveDateTime::parse_from_str(timestamp_text, TIMESTAMP_FORMAT)
            .map_err(|_| {
                Error::trace_fetch(
                    url.to_string(),
                    format!("invalid trace timestamp '{}'", timestamp_text),
                    None,
                )
            })?;
        let value = record
            .get(1)
            .filter(|text| !text.is_empty())
            .and_then(|text| text.parse::<f64>().ok());
        rows.push((timestamp, value));
    }
    Ok(rows)
}
