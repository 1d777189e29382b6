//! Time-indexed table of named numeric columns.

use super::frequency::Frequency;
use super::series::Series;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A table of numeric columns indexed by strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    timestamps: Vec<DateTime<Utc>>,
    /// Column-major storage: columns[column][row]
    columns: Vec<Vec<f64>>,
    names: Vec<String>,
    metadata: HashMap<String, String>,
    frequency: Option<Frequency>,
}

/// Builder for constructing TimeTable.
#[derive(Debug, Clone, Default)]
pub struct TimeTableBuilder {
    timestamps: Vec<DateTime<Utc>>,
    columns: Vec<(String, Vec<f64>)>,
    metadata: HashMap<String, String>,
    frequency: Option<Frequency>,
}

impl TimeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    pub fn build(self) -> Result<TimeTable> {
        let mut table = TimeTable::new(self.timestamps, self.columns)?;
        table.metadata = self.metadata;
        table.frequency = self.frequency;
        Ok(table)
    }
}

impl TimeTable {
    /// Create a table from timestamps and named columns.
    pub fn new(timestamps: Vec<DateTime<Utc>>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            if column.len() != timestamps.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
            if names.contains(&name) {
                return Err(ForecastError::InvalidParameter(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            timestamps,
            columns: values,
            names,
            metadata: HashMap::new(),
            frequency: None,
        })
    }

    /// Create a single-column table.
    pub fn univariate(
        timestamps: Vec<DateTime<Utc>>,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self> {
        Self::new(timestamps, vec![(name.into(), values)])
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ForecastError::UnknownColumn(name.to_string()))
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    /// Values of the column at `index`.
    pub fn column_at(&self, index: usize) -> Result<&[f64]> {
        self.columns
            .get(index)
            .map(|v| v.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index,
                size: self.columns.len(),
            })
    }

    /// All columns as (name, values) pairs in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter().map(|c| c.as_slice()))
    }

    /// A named column together with the time index.
    pub fn series(&self, name: &str) -> Result<Series> {
        let values = self.column(name)?.to_vec();
        Series::new(name, self.timestamps.clone(), values)
    }

    /// Observation at `index` across all columns.
    pub fn row(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.columns.iter().map(|col| col[index]).collect())
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    /// Declared frequency, if any.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn set_frequency(&mut self, freq: Frequency) {
        self.frequency = Some(freq);
    }

    pub fn clear_frequency(&mut self) {
        self.frequency = None;
    }

    /// Infer the frequency from the timestamps, ignoring any declared one.
    pub fn infer_frequency(&self) -> Result<Frequency> {
        Frequency::infer(&self.timestamps)
    }

    /// Declared frequency, falling back to inference.
    pub fn native_frequency(&self) -> Result<Frequency> {
        match self.frequency {
            Some(freq) => Ok(freq),
            None => self.infer_frequency(),
        }
    }

    /// Copy of this table carrying new rows and the same names, metadata and frequency.
    pub(crate) fn with_parts(
        &self,
        timestamps: Vec<DateTime<Utc>>,
        columns: Vec<Vec<f64>>,
    ) -> TimeTable {
        TimeTable {
            timestamps,
            columns,
            names: self.names.clone(),
            metadata: self.metadata.clone(),
            frequency: self.frequency,
        }
    }

    /// Copy of this table with the given columns, keeping index and metadata.
    pub(crate) fn with_columns(&self, names: Vec<String>, columns: Vec<Vec<f64>>) -> TimeTable {
        TimeTable {
            timestamps: self.timestamps.clone(),
            columns,
            names,
            metadata: self.metadata.clone(),
            frequency: self.frequency,
        }
    }
}
