use chrono::{NaiveDate, NaiveTime};
use rustc_hash::FxHashMap;

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DATE_COLUMN: &str = "Date";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to open data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing 'Date' column")]
    MissingDateColumn,
    #[error("Row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Row {row}: invalid value '{value}' for '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// One row of the usage table: a date and one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    values: FxHashMap<String, f64>,
}

impl Observation {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            values: FxHashMap::default(),
        }
    }

    pub fn with_value(mut self, series: impl Into<String>, value: f64) -> Self {
        self.set(series, value);
        self
    }

    pub fn set(&mut self, series: impl Into<String>, value: f64) {
        self.values.insert(series.into(), value);
    }

    /// NaN when the series has no value on this date.
    pub fn value(&self, series: &str) -> f64 {
        self.values.get(series).copied().unwrap_or(f64::NAN)
    }
}

pub fn date_to_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok())
}

pub fn load_csv(path: &Path) -> Result<Vec<Observation>, LoadError> {
    let file = File::open(path)?;
    let observations = from_reader(file)?;

    log::info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

/// Parses a `Date,<series>...` table. Empty cells read as missing values,
/// rows come back sorted by date.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Observation>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or(LoadError::MissingDateColumn)?;

    let mut observations = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: raw_date.to_string(),
        })?;

        let mut observation = Observation::new(date);

        for (col, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if col == date_idx || cell.is_empty() {
                continue;
            }

            let value = cell
                .parse::<f64>()
                .map_err(|_| LoadError::InvalidValue {
                    row,
                    column: header.to_string(),
                    value: cell.to_string(),
                })?;
            observation.set(header, value);
        }

        observations.push(observation);
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}
