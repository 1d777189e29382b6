//! Grouped summaries over a time-indexed table.

use crate::core::TimeTable;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Rows of a table partitioned by a key derived from each timestamp.
///
/// Groups are ordered by key; rows inside a group keep table order.
#[derive(Debug, Clone)]
pub struct GroupedTable<K> {
    groups: Vec<(K, TimeTable)>,
}

/// One labeled row per group.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<K> {
    keys: Vec<K>,
    names: Vec<String>,
    /// Column-major storage: columns[column][group]
    columns: Vec<Vec<f64>>,
}

/// Group the rows of `table` by `key(timestamp)`.
///
/// # Example
/// ```
/// use chrono::{Datelike, Duration, TimeZone, Utc};
/// use forecast_diagnostics::core::TimeTable;
/// use forecast_diagnostics::transform::group_by;
///
/// let base = Utc.with_ymd_and_hms(2023, 12, 30, 0, 0, 0).unwrap();
/// let timestamps = (0..4).map(|i| base + Duration::days(i)).collect();
/// let table = TimeTable::univariate(timestamps, "y", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
///
/// let summary = group_by(&table, |t| t.year())
///     .summarize(|group| {
///         let total: f64 = group.column("y")?.iter().sum();
///         Ok(vec![("total".to_string(), total)])
///     })
///     .unwrap();
///
/// assert_eq!(summary.keys(), &[2023, 2024]);
/// assert_eq!(summary.column("total").unwrap(), &[3.0, 7.0]);
/// ```
pub fn group_by<K, F>(table: &TimeTable, key: F) -> GroupedTable<K>
where
    K: Ord,
    F: Fn(&DateTime<Utc>) -> K,
{
    let mut positions: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, t) in table.timestamps().iter().enumerate() {
        positions.entry(key(t)).or_default().push(i);
    }

    let groups = positions
        .into_iter()
        .map(|(k, rows)| {
            let columns = table
                .columns()
                .map(|(_, values)| rows.iter().map(|&i| values[i]).collect())
                .collect();
            let mut group = table.with_parts(rows.iter().map(|&i| table.timestamps()[i]).collect(), columns);
            group.clear_frequency();
            (k, group)
        })
        .collect();

    GroupedTable { groups }
}

impl<K> GroupedTable<K> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &TimeTable)> {
        self.groups.iter().map(|(k, t)| (k, t))
    }

    /// Apply `agg` to every group and assemble a labeled table.
    ///
    /// `agg` returns `(column name, value)` pairs. Columns appear in the order
    /// they are first produced; a group that does not produce a column gets
    /// NaN there.
    pub fn summarize<F>(self, mut agg: F) -> Result<Summary<K>>
    where
        F: FnMut(&TimeTable) -> Result<Vec<(String, f64)>>,
    {
        let n_groups = self.groups.len();
        let mut names: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut keys = Vec::with_capacity(n_groups);

        for (row, (key, group)) in self.groups.into_iter().enumerate() {
            let produced = agg(&group)?;
            for (i, (name, _)) in produced.iter().enumerate() {
                if produced[..i].iter().any(|(other, _)| other == name) {
                    return Err(ForecastError::InvalidParameter(format!(
                        "aggregation produced column '{}' twice",
                        name
                    )));
                }
            }

            for (name, value) in produced {
                let idx = match names.iter().position(|n| *n == name) {
                    Some(idx) => idx,
                    None => {
                        names.push(name);
                        columns.push(vec![f64::NAN; n_groups]);
                        columns.len() - 1
                    }
                };
                columns[idx][row] = value;
            }
            keys.push(key);
        }

        debug!(groups = keys.len(), columns = names.len(), "summarized groups");

        Ok(Summary {
            keys,
            names,
            columns,
        })
    }
}

impl<K> Summary<K> {
    /// Number of groups (rows).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| ForecastError::UnknownColumn(name.to_string()))
    }

    /// Values of every column for the group at `index`.
    pub fn row(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.columns.iter().map(|col| col[index]).collect())
    }
}

impl Summary<DateTime<Utc>> {
    /// Time-keyed summaries become a table indexed by the group keys.
    pub fn into_time_table(self) -> Result<TimeTable> {
        TimeTable::new(self.keys, self.names.into_iter().zip(self.columns).collect())
    }
}
