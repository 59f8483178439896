//! Command execution for the weathermaker CLI
//!
//! Wires the pipeline together: station metadata, the normalized hourly
//! series, the selected irradiance source and the output emitter, then
//! drives the per-hour loop with progress reporting.

use crate::app::models::{GridCell, HourlyRecord, Station};
use crate::app::services::emitter::{self, FormatWriter};
use crate::app::services::irradiance::{self, IrradianceSource};
use crate::app::services::observations;
use crate::app::services::{solar, station_details};
use crate::cli::args::Args;
use crate::config::Config;
use crate::constants::{OBSERVATION_MINUTE, hours_in_year};
use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info};

/// Everything the per-hour loop needs, assembled once at startup
///
/// Owns the memoizing irradiance source; no component keeps state of
/// its own outside this struct.
pub struct RunContext {
    /// Validated run configuration
    pub config: Config,

    /// Station metadata with CLI overrides applied
    pub station: Station,

    /// Grid cell for the observer location (unused by the trace source)
    pub cell: GridCell,

    /// Selected irradiance backend
    pub source: Box<dyn IrradianceSource>,
}

/// Outcome of one generation run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Data lines written to the output file
    pub hours_emitted: usize,

    /// Leap-day rows present in the series but skipped at emission
    pub hours_skipped: usize,

    /// Wall-clock duration of the run
    pub processing_time: std::time::Duration,
}

/// Run one weather file generation end to end
pub fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args);
    info!("Starting weathermaker");
    debug!("Command line arguments: {:?}", args);

    let config = args.validate()?;
    let context = build_context(config)?;
    let records = build_records(&context.config)?;

    info!("Generating a {} file", context.config.format);
    let mut writer = emitter::create_writer(
        context.config.format,
        &context.config.output,
        context.config.year,
        context.config.timezone,
    )?;
    writer.preamble(&context.station)?;

    let progress_bar = args.show_progress().then(|| {
        let pb = ProgressBar::new(records.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Processing hours");
        pb
    });

    let mut stats = emit_hours(context, records, writer, progress_bar.as_ref())?;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Processing complete");
    }

    stats.processing_time = start_time.elapsed();
    if !args.quiet {
        print_summary(&args, &stats);
    }
    Ok(stats)
}

/// Set up structured logging from the verbosity flags
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weathermaker={}", args.get_log_level())));

    // A second initialization (library callers, test harnesses) keeps
    // the first subscriber.
    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    let _ = result;
}

/// Load station metadata, apply overrides and select the irradiance source
pub fn build_context(config: Config) -> Result<RunContext> {
    let mut station = station_details::load_station(&config.hm_details, &config.station_code)?;

    // Startup overrides: an explicit coordinate renames the station to
    // the coordinate pair unless a name override is also given.
    if let Some(location) = config.latlong {
        station.location = location;
        station.name = format!("({:.2}, {:.2})", location.latitude, location.longitude);
    }
    if let Some(name) = &config.name {
        station.name = name.clone();
    }

    // The trace backend serves one fixed coordinate and never reads the
    // cell; only the file backend needs the observer on the grid.
    let cell = if config.grids.is_some() {
        station.location.to_cell()?
    } else {
        GridCell::new(0, 0)?
    };
    debug!("Observer location {} maps to cell {}", station.location, cell);

    let source = irradiance::select_source(&config, &station)?;
    Ok(RunContext {
        config,
        station,
        cell,
        source,
    })
}

/// Build the normalized hourly records for the configured year
fn build_records(config: &Config) -> Result<Vec<HourlyRecord>> {
    let raw = observations::load_observations(&config.hm_data)?;
    let series = observations::build_hourly_series(&raw, config.year, config.max_gap_hours)?;

    Ok(series
        .into_iter()
        .enumerate()
        .map(|(hour, weather)| HourlyRecord {
            hour,
            weather,
            ghi: 0,
            dni: 0,
            dhi: 0.0,
        })
        .collect())
}

/// Drive the per-hour loop: irradiance lookup, DHI derivation, emission
///
/// Leap-day rows stay in the working series (the row count assertion
/// includes them) but are not written to the file.
fn emit_hours(
    mut context: RunContext,
    records: Vec<HourlyRecord>,
    mut writer: Box<dyn FormatWriter>,
    progress_bar: Option<&ProgressBar>,
) -> Result<RunStats> {
    let start = NaiveDate::from_ymd_opt(context.config.year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            Error::configuration(format!("year {} is out of range", context.config.year))
        })?;
    let tz_offset = Duration::minutes((context.config.timezone * 60.0).round() as i64);

    debug_assert_eq!(records.len(), hours_in_year(context.config.year));

    let mut stats = RunStats::default();
    for mut record in records {
        if let Some(pb) = progress_bar {
            pb.inc(1);
        }

        let local: NaiveDateTime = start + Duration::hours(record.hour as i64);
        if local.month() == 2 && local.day() == 29 {
            stats.hours_skipped += 1;
            continue;
        }

        let hour_utc = local - tz_offset;
        let sample = context.source.fetch(hour_utc, context.cell)?;
        record.ghi = sample.ghi;
        record.dni = sample.dni;

        // Zenith is evaluated at the observation minute of the hour.
        let zenith = solar::zenith_angle(
            hour_utc + Duration::minutes(OBSERVATION_MINUTE),
            context.station.location,
            context.station.elevation,
        )?;
        record.dhi = solar::derive_dhi(record.ghi, record.dni, zenith);

        writer.record(&record)?;
        stats.hours_emitted += 1;
    }

    writer.finish()?;
    Ok(stats)
}

/// Print the end-of-run summary block
fn print_summary(args: &Args, stats: &RunStats) {
    println!("\n{}", "Weather file generated".bright_green().bold());
    println!(
        "  {} {}",
        "Output file:".bright_cyan(),
        args.out.display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Hours emitted:".bright_cyan(),
        stats.hours_emitted.to_string().bright_white().bold()
    );
    if stats.hours_skipped > 0 {
        println!(
            "  {} {}",
            "Leap-day hours skipped:".bright_cyan(),
            stats.hours_skipped.to_string().bright_white()
        );
    }
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(stats.processing_time).to_string().bright_white()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{IrradianceSample, LatLong, SampleOrigin, WeatherSample};
    use std::fs;
    use tempfile::TempDir;

    /// Source returning a constant sample for every hour
    struct ConstantSource {
        ghi: i32,
        dni: i32,
    }

    impl IrradianceSource for ConstantSource {
        fn fetch(&mut self, _hour_utc: NaiveDateTime, _cell: GridCell) -> Result<IrradianceSample> {
            Ok(IrradianceSample {
                ghi: self.ghi,
                dni: self.dni,
                origin: SampleOrigin::GridFile,
            })
        }
    }

    fn test_station() -> Station {
        Station::new(
            "070351".to_string(),
            "CANBERRA AIRPORT".to_string(),
            "ACT".to_string(),
            LatLong::new(-35.3088, 149.2004).unwrap(),
            577,
        )
        .unwrap()
    }

    fn test_context(dir: &TempDir, year: i32) -> RunContext {
        let config = Config {
            year,
            timezone: 10.0,
            output: dir.path().join("out.tmy3"),
            ..Default::default()
        };
        RunContext {
            config,
            station: test_station(),
            cell: GridCell::new(0, 0).unwrap(),
            source: Box::new(ConstantSource { ghi: 600, dni: 300 }),
        }
    }

    fn blank_records(year: i32) -> Vec<HourlyRecord> {
        (0..hours_in_year(year))
            .map(|hour| HourlyRecord {
                hour,
                weather: WeatherSample::from_values([0.0; 7]),
                ghi: 0,
                dni: 0,
                dhi: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_emit_hours_full_year() {
        let dir = TempDir::new().unwrap();
        let context = test_context(&dir, 2019);
        let path = context.config.output.clone();
        let writer = emitter::create_writer(context.config.format, &path, 2019, 10.0).unwrap();

        let stats = emit_hours(context, blank_records(2019), writer, None).unwrap();
        assert_eq!(stats.hours_emitted, 8760);
        assert_eq!(stats.hours_skipped, 0);
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 8760);
    }

    #[test]
    fn test_emit_hours_skips_leap_day() {
        let dir = TempDir::new().unwrap();
        let context = test_context(&dir, 2020);
        let path = context.config.output.clone();
        let writer = emitter::create_writer(context.config.format, &path, 2020, 10.0).unwrap();

        // The working series carries all 8784 rows; Feb 29 never reaches
        // the file.
        let stats = emit_hours(context, blank_records(2020), writer, None).unwrap();
        assert_eq!(stats.hours_emitted, 8760);
        assert_eq!(stats.hours_skipped, 24);
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 8760);
        assert!(!contents.contains("2020,2,29,"));
    }

    #[test]
    fn test_latlong_override_renames_station() {
        let dir = TempDir::new().unwrap();
        let details = dir.path().join("details.txt");
        let mut line = vec![b' '; 170];
        let mut put = |start: usize, text: &str| {
            for (i, byte) in text.bytes().enumerate() {
                line[start + i] = byte;
            }
        };
        put(0, "st,");
        put(3, "070351");
        put(15, "CANBERRA AIRPORT");
        put(72, "-35.3088");
        put(81, "149.2004");
        put(107, "ACT");
        put(111, "577.0");
        put(153, "  0");
        put(157, "  0");
        put(161, "  0");
        fs::write(&details, String::from_utf8(line).unwrap()).unwrap();

        let hm_data = dir.path().join("data.txt");
        fs::write(&hm_data, "").unwrap();
        let config = Config {
            trace_url: Some("http://example.invalid".to_string()),
            latlong: Some(LatLong::new(-35.0, 149.0).unwrap()),
            year: 2019,
            station_code: "070351".to_string(),
            hm_details: details,
            hm_data,
            output: dir.path().join("out.epw"),
            ..Default::default()
        };

        let context = build_context(config).unwrap();
        assert_eq!(context.station.name, "(-35.00, 149.00)");
        assert_eq!(context.station.location.latitude, -35.0);
    }
}
