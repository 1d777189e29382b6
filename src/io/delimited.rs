//! Delimited text import and export of time-indexed tables.

use crate::core::TimeTable;
use crate::error::{ForecastError, Result};
use ::csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Options for reading and writing delimited files.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Name of the timestamp column (None: the first column)
    pub date_column: Option<String>,
    /// Explicit chrono format for timestamps, tried before the built-in ones
    pub date_format: Option<String>,
    pub delimiter: u8,
    /// Cell contents read as NaN, compared case-insensitively
    pub missing_tokens: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            date_column: None,
            date_format: None,
            delimiter: b',',
            missing_tokens: vec!["".to_string(), "NA".to_string(), "NaN".to_string()],
        }
    }
}

impl CsvOptions {
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = Some(name.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_missing_tokens(mut self, tokens: Vec<String>) -> Self {
        self.missing_tokens = tokens;
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.missing_tokens
            .iter()
            .any(|token| token.eq_ignore_ascii_case(cell))
    }
}

fn csv_err(err: ::csv::Error) -> ForecastError {
    if err.is_io_error() {
        ForecastError::Io(err.to_string())
    } else {
        ForecastError::Parse(err.to_string())
    }
}

/// Parse a timestamp cell.
///
/// Accepted: the explicit `format` (date-time or date only), RFC 3339,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM`,
/// `YYYY-MM-DD` and `YYYY-MM` (first of the month). Naive values are UTC.
pub fn parse_timestamp(cell: &str, format: Option<&str>) -> Result<DateTime<Utc>> {
    let cell = cell.trim();

    if let Some(format) = format {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cell, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return midnight(date);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cell, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return midnight(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", cell), "%Y-%m-%d") {
        return midnight(date);
    }

    Err(ForecastError::Parse(format!("unrecognized timestamp '{}'", cell)))
}

fn midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ForecastError::Parse(format!("invalid date {}", date)))
}

/// Read a table from delimited text with a header row.
///
/// One column holds timestamps; every other column is parsed as `f64`.
/// Rows are sorted by timestamp. Duplicate timestamps are rejected.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<TimeTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.is_empty() {
        return Err(ForecastError::Parse("missing header row".to_string()));
    }

    let date_idx = match &options.date_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::UnknownColumn(name.clone()))?,
        None => 0,
    };
    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows: Vec<(DateTime<Utc>, Vec<f64>)> = Vec::new();
    let mut record = StringRecord::new();
    let mut line = 1;
    while reader.read_record(&mut record).map_err(csv_err)? {
        line += 1;
        let ts = parse_timestamp(&record[date_idx], options.date_format.as_deref())
            .map_err(|e| ForecastError::Parse(format!("line {}: {}", line, e)))?;

        let mut values = Vec::with_capacity(names.len());
        for (i, cell) in record.iter().enumerate() {
            if i == date_idx {
                continue;
            }
            if options.is_missing(cell) {
                values.push(f64::NAN);
                continue;
            }
            let value = cell.parse::<f64>().map_err(|_| {
                ForecastError::Parse(format!(
                    "line {}: column '{}': '{}' is not a number",
                    line, &headers[i], cell
                ))
            })?;
            values.push(value);
        }
        rows.push((ts, values));
    }

    let sorted = rows.windows(2).all(|w| w[0].0 <= w[1].0);
    if !sorted {
        rows.sort_by_key(|(ts, _)| *ts);
    }
    debug!(rows = rows.len(), columns = names.len(), sorted, "read delimited table");

    let timestamps = rows.iter().map(|(ts, _)| *ts).collect();
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| (name, rows.iter().map(|(_, values)| values[j]).collect()))
        .collect();

    TimeTable::new(timestamps, columns)
}

/// Read a table from a file; see [`read_csv`].
pub fn read_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<TimeTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ForecastError::Io(format!("{}: {}", path.display(), e)))?;
    let mut table = read_csv(file, options)?;
    table.set_metadata("source".to_string(), path.display().to_string());
    Ok(table)
}

/// Write a table as delimited text.
///
/// Timestamps are RFC 3339 in UTC under the `date_column` header
/// (default `timestamp`); NaN is written as an empty cell.
pub fn write_csv<W: Write>(writer: W, table: &TimeTable, options: &CsvOptions) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let date_header = options.date_column.as_deref().unwrap_or("timestamp");
    let mut header = vec![date_header.to_string()];
    header.extend(table.names().iter().cloned());
    writer.write_record(&header).map_err(csv_err)?;

    let columns: Vec<&[f64]> = table.columns().map(|(_, values)| values).collect();
    for (i, ts) in table.timestamps().iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        for column in &columns {
            let v = column[i];
            row.push(if v.is_nan() { String::new() } else { v.to_string() });
        }
        writer.write_record(&row).map_err(csv_err)?;
    }

    writer.flush()?;
    debug!(rows = table.len(), columns = table.width(), "wrote delimited table");
    Ok(())
}

/// Write a table to a file; see [`write_csv`].
pub fn write_csv_path(path: impl AsRef<Path>, table: &TimeTable, options: &CsvOptions) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, table, options)
}
