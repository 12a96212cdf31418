//! CSV loading of the hourly readings file.

use aqdash_common::{AqError, Dataset, Reading, Result, Variable};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Columns a dataset must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 16] = [
    "year", "month", "day", "hour", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES",
    "DEWP", "RAIN", "WSPM", "wd",
];

/// Field contents treated as a missing value.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

fn is_missing(field: &str) -> bool {
    MISSING_MARKERS.contains(&field.trim())
}

/// Header positions of the columns a [`Reading`] is built from.
#[derive(Debug, Clone)]
struct ColumnIndex {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    values: [usize; 11],
    wd: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| AqError::schema(name))
        };

        let year = position("year")?;
        let month = position("month")?;
        let day = position("day")?;
        let hour = position("hour")?;
        let mut values = [0; 11];
        for variable in Variable::ALL {
            values[variable.index()] = position(variable.column())?;
        }
        let wd = position("wd")?;

        Ok(Self {
            year,
            month,
            day,
            hour,
            values,
            wd,
        })
    }

    /// Builds a reading from one record; `row` is 1-based and excludes the header.
    fn parse_record(&self, record: &StringRecord, row: usize) -> Result<Reading> {
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        let year: i32 = parse_integer(field(self.year), row, "year")?;
        let month: u32 = parse_integer(field(self.month), row, "month")?;
        let day: u32 = parse_integer(field(self.day), row, "day")?;
        let hour: u32 = parse_integer(field(self.hour), row, "hour")?;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| {
                AqError::parse(row, "date", format!("{year}-{month}-{day} {hour}:00"))
            })?;

        let mut values = [None; 11];
        for variable in Variable::ALL {
            values[variable.index()] =
                parse_measurement(field(self.values[variable.index()]), row, variable.column())?;
        }

        let wd_field = field(self.wd);
        let wd = if is_missing(wd_field) {
            None
        } else {
            Some(wd_field.to_string())
        };

        Ok(Reading {
            year,
            month,
            day,
            hour,
            date,
            values,
            wd,
        })
    }
}

fn parse_integer<T: std::str::FromStr>(value: &str, row: usize, column: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AqError::parse(row, column, value))
}

fn parse_measurement(value: &str, row: usize, column: &str) -> Result<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }
    let parsed: f64 = value
        .parse()
        .map_err(|_| AqError::parse(row, column, value))?;
    if parsed.is_nan() {
        return Ok(None);
    }
    // Medians and correlations only work on finite numbers
    if parsed.is_infinite() {
        return Err(AqError::parse(row, column, value));
    }
    Ok(Some(parsed))
}

/// Reads the readings file into an immutable [`Dataset`].
///
/// Columns are matched by exact header name, so their order in the file does
/// not matter and extra columns (`No`, `station`, ...) are ignored.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader;

impl CsvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads the dataset at `path`.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AqError::file_not_found(path));
        }

        let file = std::fs::File::open(path)?;
        let dataset = self.load_from_reader(file, path)?;

        if let Some((first, last)) = dataset.date_span() {
            info!(
                rows = dataset.len(),
                first = %first,
                last = %last,
                "Loaded air quality readings"
            );
        }
        Ok(dataset)
    }

    /// Parses CSV text from any reader; `source` is recorded on the dataset.
    pub fn load_from_reader<R: Read>(&self, reader: R, source: &Path) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;
        debug!(columns = headers.len(), "Header validated");

        let mut readings = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            readings.push(columns.parse_record(&record, index + 1)?);
        }

        if readings.is_empty() {
            return Err(AqError::EmptyDataset {
                path: source.to_path_buf(),
            });
        }

        Ok(Dataset::new(source, readings))
    }
}
