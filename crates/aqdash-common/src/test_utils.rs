//! Test utilities and shared fixtures for the aqdash workspace.
//!
//! Builders for in-memory readings and on-disk CSV files that every crate's
//! unit and integration tests can share.

use crate::{Dataset, Reading, Variable};
use chrono::{Duration, NaiveDate};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Header of the canonical dataset layout, with the leading `No` and trailing
/// `station` columns the published files carry.
pub const CSV_HEADER: &str =
    "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

/// Initialize logging for tests. Safe to call repeatedly.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Builder for a single [`Reading`] with every measurement missing by default.
#[derive(Debug, Clone)]
pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    /// Starts a reading at the given hour.
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("fixture timestamp must be valid");
        Self {
            reading: Reading {
                year,
                month,
                day,
                hour,
                date,
                values: [None; 11],
                wd: None,
            },
        }
    }

    pub fn pm25(self, value: f64) -> Self {
        self.value(Variable::Pm25, value)
    }

    pub fn value(mut self, variable: Variable, value: f64) -> Self {
        self.reading.values[variable.index()] = Some(value);
        self
    }

    pub fn wd(mut self, label: &str) -> Self {
        self.reading.wd = Some(label.to_string());
        self
    }

    pub fn build(self) -> Reading {
        self.reading
    }
}

/// Wraps readings in a dataset with a dummy source path.
pub fn dataset(readings: Vec<Reading>) -> Dataset {
    Dataset::new("fixture.csv", readings)
}

/// Generates `days` full days of hourly readings starting at `start`.
///
/// `pm25(day_index, hour)` supplies the PM2.5 value; the other measurements
/// are smooth functions of time so correlations are well defined.
pub fn hourly_readings(
    start: NaiveDate,
    days: u32,
    pm25: impl Fn(u32, u32) -> f64,
) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(days as usize * 24);
    for day_index in 0..days {
        let date = start + Duration::days(i64::from(day_index));
        for hour in 0..24u32 {
            let t = f64::from(day_index * 24 + hour);
            let value = pm25(day_index, hour);
            let reading = ReadingBuilder::at(
                chrono::Datelike::year(&date),
                chrono::Datelike::month(&date),
                chrono::Datelike::day(&date),
                hour,
            )
            .pm25(value)
            .value(Variable::Pm10, value * 1.4 + 5.0)
            .value(Variable::So2, 8.0 + (t / 7.0).sin())
            .value(Variable::No2, 40.0 + value * 0.3)
            .value(Variable::Co, 900.0 + value * 10.0)
            .value(Variable::O3, 60.0 - value * 0.2 + (t / 5.0).cos())
            .value(Variable::Temp, 12.0 + 8.0 * (f64::from(hour) / 24.0 * std::f64::consts::TAU).sin())
            .value(Variable::Pres, 1012.0 + (t / 50.0).cos() * 6.0)
            .value(Variable::Dewp, -2.0 + (t / 30.0).sin() * 4.0)
            .value(Variable::Rain, if hour == 15 { 0.4 } else { 0.0 })
            .value(Variable::Wspm, 1.5 + (t / 11.0).sin().abs())
            .wd(crate::COMPASS_POINTS[(hour as usize) % 16])
            .build();
            readings.push(reading);
        }
    }
    readings
}

/// Formats readings as CSV rows in the [`CSV_HEADER`] layout.
pub fn to_csv(readings: &[Reading]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for (i, r) in readings.iter().enumerate() {
        let field = |v: Variable| r.value(v).map_or_else(|| "NA".to_string(), |x| x.to_string());
        let row = [
            (i + 1).to_string(),
            r.year.to_string(),
            r.month.to_string(),
            r.day.to_string(),
            r.hour.to_string(),
            field(Variable::Pm25),
            field(Variable::Pm10),
            field(Variable::So2),
            field(Variable::No2),
            field(Variable::Co),
            field(Variable::O3),
            field(Variable::Temp),
            field(Variable::Pres),
            field(Variable::Dewp),
            field(Variable::Rain),
            r.wd.clone().unwrap_or_else(|| "NA".to_string()),
            field(Variable::Wspm),
            "Guanyuan".to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// A CSV file in a temporary directory, removed on drop.
pub struct CsvFixture {
    dir: TempDir,
    path: PathBuf,
}

impl CsvFixture {
    /// Writes raw CSV text to `all_data.csv` in a fresh temporary directory.
    pub fn from_text(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("all_data.csv");
        let mut file = std::fs::File::create(&path).expect("Failed to create fixture CSV");
        file.write_all(contents.as_bytes())
            .expect("Failed to write fixture CSV");
        Self { dir, path }
    }

    /// Writes readings in the canonical layout.
    pub fn from_readings(readings: &[Reading]) -> Self {
        Self::from_text(&to_csv(readings))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Directory holding the fixture; handy as an output location.
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
