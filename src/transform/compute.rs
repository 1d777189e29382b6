//! Derived columns computed from a whole table.

use crate::core::TimeTable;
use crate::error::{ForecastError, Result};
use tracing::debug;

/// Apply `f` to `table` and merge the columns it returns.
///
/// A returned column whose name already exists replaces that column in
/// place; new names are appended in the order returned. Every other column
/// is left untouched. Returned columns must match the table length.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use forecast_diagnostics::core::TimeTable;
/// use forecast_diagnostics::transform::compute;
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..3).map(|i| base + Duration::days(i)).collect();
/// let table = TimeTable::univariate(timestamps, "y", vec![1.0, 2.0, 4.0]).unwrap();
///
/// let table = compute(&table, |t| {
///     let log: Vec<f64> = t.column("y")?.iter().map(|v| v.ln()).collect();
///     Ok(vec![("log_y".to_string(), log)])
/// })
/// .unwrap();
///
/// assert_eq!(table.names(), &["y".to_string(), "log_y".to_string()]);
/// ```
pub fn compute<F>(table: &TimeTable, f: F) -> Result<TimeTable>
where
    F: FnOnce(&TimeTable) -> Result<Vec<(String, Vec<f64>)>>,
{
    let produced = f(table)?;

    let mut names: Vec<String> = table.names().to_vec();
    let mut columns: Vec<Vec<f64>> = table.columns().map(|(_, v)| v.to_vec()).collect();
    let mut replaced = 0;
    let mut seen: Vec<&str> = Vec::with_capacity(produced.len());

    for (name, values) in &produced {
        if values.len() != table.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: table.len(),
                got: values.len(),
            });
        }
        if seen.contains(&name.as_str()) {
            return Err(ForecastError::InvalidParameter(format!(
                "computed column '{}' returned twice",
                name
            )));
        }
        seen.push(name);
    }

    for (name, values) in produced {
        match names.iter().position(|n| *n == name) {
            Some(idx) => {
                columns[idx] = values;
                replaced += 1;
            }
            None => {
                names.push(name);
                columns.push(values);
            }
        }
    }

    debug!(
        replaced,
        added = names.len() - table.width(),
        "computed columns"
    );

    Ok(table.with_columns(names, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn table() -> TimeTable {
        TimeTable::new(
            timestamps(3),
            vec![
                ("a".to_string(), vec![1.0, 2.0, 3.0]),
                ("b".to_string(), vec![4.0, 5.0, 6.0]),
                ("c".to_string(), vec![7.0, 8.0, 9.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn replaces_same_named_columns_in_place() {
        let result = compute(&table(), |t| {
            let doubled = t.column("b")?.iter().map(|v| v * 2.0).collect();
            Ok(vec![("b".to_string(), doubled)])
        })
        .unwrap();

        assert_eq!(result.names(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(result.column("a").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(result.column("b").unwrap(), &[8.0, 10.0, 12.0]);
        assert_eq!(result.column("c").unwrap(), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn appends_new_columns_in_returned_order() {
        let result = compute(&table(), |t| {
            let sum: Vec<f64> = t
                .column("a")?
                .iter()
                .zip(t.column("c")?)
                .map(|(a, c)| a + c)
                .collect();
            Ok(vec![
                ("z".to_string(), sum),
                ("a".to_string(), vec![0.0; 3]),
                ("y".to_string(), vec![1.0; 3]),
            ])
        })
        .unwrap();

        assert_eq!(result.width(), 5);
        assert_eq!(&result.names()[3..], &["z".to_string(), "y".to_string()]);
        assert_eq!(result.column("z").unwrap(), &[8.0, 10.0, 12.0]);
        assert_eq!(result.column("a").unwrap(), &[0.0, 0.0, 0.0]);
        assert_eq!(result.timestamps(), table().timestamps());
    }

    #[test]
    fn rejects_wrong_length() {
        let result = compute(&table(), |_| Ok(vec![("d".to_string(), vec![1.0])]));
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn rejects_duplicate_outputs() {
        let result = compute(&table(), |_| {
            Ok(vec![("d".to_string(), vec![1.0; 3]), ("d".to_string(), vec![2.0; 3])])
        });
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn original_table_is_untouched() {
        let original = table();
        let _ = compute(&original, |_| Ok(vec![("a".to_string(), vec![0.0; 3])])).unwrap();
        assert_eq!(original.column("a").unwrap(), &[1.0, 2.0, 3.0]);
    }
}
