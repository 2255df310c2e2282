//! Two-column time-series files
//!
//! Signals loaded from disk are CSV tables with a header row. The time
//! column must be named exactly `Time`; the first other column holds the
//! amplitude values. Extra columns are ignored.
//!
//! ```text
//! Time,Signal
//! 0.000,0.0
//! 0.001,0.0063
//! ...
//! ```

use crate::types::{SignalError, SignalResult};
use std::path::{Path, PathBuf};

/// Name of the required time column
pub const TIME_COLUMN: &str = "Time";

/// Header used for the value column when exporting
pub const VALUE_COLUMN: &str = "Amplitude";

/// A waveform read from a time-series file
#[derive(Debug, Clone, PartialEq)]
pub struct FileWaveform {
    /// Where the data came from
    pub path: PathBuf,
    /// Name of the value column
    pub value_column: String,
    /// Sample times in seconds, ascending
    pub times: Vec<f64>,
    /// Amplitude at each time
    pub values: Vec<f64>,
}

impl FileWaveform {
    /// Read a waveform from a CSV file
    pub fn read(path: impl AsRef<Path>) -> SignalResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(SignalError::FileFormat(format!(
                "expected at least two columns, found {}",
                headers.len()
            )));
        }
        let time_idx = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or_else(|| {
                SignalError::FileFormat(format!("missing '{}' column", TIME_COLUMN))
            })?;
        let value_idx = (0..headers.len())
            .find(|&i| i != time_idx)
            .ok_or_else(|| SignalError::FileFormat("missing value column".to_string()))?;
        let value_column = headers[value_idx].to_string();

        let mut samples: Vec<(f64, f64)> = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let t = parse_field(&record, time_idx, row)?;
            let v = parse_field(&record, value_idx, row)?;
            samples.push((t, v));
        }

        if samples.is_empty() {
            return Err(SignalError::FileFormat("file contains no data rows".to_string()));
        }

        // Interpolation needs ascending time; a stable sort keeps duplicate
        // timestamps in file order.
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (times, values) = samples.into_iter().unzip();

        Ok(Self {
            path: path.to_path_buf(),
            value_column,
            times,
            values,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First and last timestamp
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }
}

fn parse_field(record: &csv::StringRecord, idx: usize, row: usize) -> SignalResult<f64> {
    let field = record.get(idx).ok_or_else(|| {
        SignalError::FileFormat(format!("row {} is missing column {}", row + 1, idx + 1))
    })?;
    field.parse::<f64>().map_err(|_| {
        SignalError::FileFormat(format!(
            "row {}: '{}' is not a number",
            row + 1,
            field
        ))
    })
}

/// Write a `Time,Amplitude` CSV file
pub fn write_time_series(path: impl AsRef<Path>, times: &[f64], values: &[f64]) -> SignalResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([TIME_COLUMN, VALUE_COLUMN])?;
    for (t, v) in times.iter().zip(values.iter()) {
        writer.write_record([t.to_string(), v.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
