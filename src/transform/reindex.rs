//! Reindexing a table onto a regular time grid.
//!
//! The grid follows the table's native frequency and is anchored on its
//! first timestamp, so existing rows keep their values. Grid positions
//! without a row are filled with NaN.

use crate::core::{Frequency, TimeTable};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// How far to extend the range past its bounds.
///
/// Positive steps extend the upper bound, negative steps extend the lower
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A multiple of the table's native frequency.
    Periods(i64),
    /// Calendar duration.
    Duration(Duration),
}

impl Step {
    pub fn periods(n: i64) -> Self {
        Step::Periods(n)
    }

    pub fn duration(d: Duration) -> Self {
        Step::Duration(d)
    }

    fn extend(
        self,
        freq: &Frequency,
        lo: DateTime<Utc>,
        hi: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Step::Periods(n) if n > 0 => Ok((lo, freq.advance(hi, n)?)),
            Step::Periods(n) if n < 0 => Ok((freq.advance(lo, n)?, hi)),
            Step::Periods(_) => Ok((lo, hi)),
            Step::Duration(d) => {
                let shift = |t: DateTime<Utc>| {
                    t.checked_add_signed(d).ok_or_else(|| {
                        ForecastError::TimestampError(format!("{} + {} overflows", t, d))
                    })
                };
                if d > Duration::zero() {
                    Ok((lo, shift(hi)?))
                } else if d < Duration::zero() {
                    Ok((shift(lo)?, hi))
                } else {
                    Ok((lo, hi))
                }
            }
        }
    }
}

/// Reindex `table` over a regular date range.
///
/// * `start` / `end` override the table's first and last timestamps.
/// * `step` extends the upper (positive) or lower (negative) bound.
/// * With no arguments at all the range is extended by one native step forward.
///   If a bound is given and `step` is `None`, nothing is extended.
///
/// Rows outside the final range are dropped; new positions hold NaN.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use forecast_diagnostics::core::TimeTable;
/// use forecast_diagnostics::transform::reindex;
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..3).map(|i| base + Duration::days(i)).collect();
/// let table = TimeTable::univariate(timestamps, "y", vec![1.0, 2.0, 3.0]).unwrap();
///
/// let extended = reindex(&table, None, None, None).unwrap();
/// assert_eq!(extended.len(), 4);
/// assert!(extended.column("y").unwrap()[3].is_nan());
/// ```
pub fn reindex(
    table: &TimeTable,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    step: Option<Step>,
) -> Result<TimeTable> {
    let (anchor, last) = match (table.timestamps().first(), table.timestamps().last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(ForecastError::EmptyData),
    };
    let freq = table.native_frequency()?;

    let step = match (start, end, step) {
        (None, None, None) => Some(Step::Periods(1)),
        (_, _, step) => step,
    };

    let (mut lo, mut hi) = (start.unwrap_or(anchor), end.unwrap_or(last));
    if let Some(step) = step {
        (lo, hi) = step.extend(&freq, lo, hi)?;
    }
    if lo > hi {
        return Err(ForecastError::InvalidParameter(format!(
            "range start {} is after range end {}",
            lo, hi
        )));
    }

    let grid = regular_grid(&freq, anchor, lo, hi)?;

    let positions: HashMap<DateTime<Utc>, usize> = table
        .timestamps()
        .iter()
        .enumerate()
        .map(|(i, &t)| (t, i))
        .collect();
    let columns: Vec<Vec<f64>> = table
        .columns()
        .map(|(_, values)| {
            grid.iter()
                .map(|t| positions.get(t).map_or(f64::NAN, |&i| values[i]))
                .collect()
        })
        .collect();

    debug!(
        freq = %freq,
        rows_in = table.len(),
        rows_out = grid.len(),
        start = %lo,
        end = %hi,
        "reindexed table"
    );

    let mut result = table.with_parts(grid, columns);
    result.set_frequency(freq);
    Ok(result)
}

/// Every `anchor + k * freq` that falls inside `[lo, hi]`.
fn regular_grid(
    freq: &Frequency,
    anchor: DateTime<Utc>,
    lo: DateTime<Utc>,
    hi: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>> {
    let approx = approx_seconds(freq);
    if approx <= 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "frequency {} must be positive",
            freq
        )));
    }

    // Jump close to `lo`, then settle on the first grid point >= lo.
    let mut k = ((lo - anchor).num_seconds() as f64 / approx).floor() as i64 - 1;
    while freq.advance(anchor, k)? < lo {
        k += 1;
    }
    while freq.advance(anchor, k - 1)? >= lo {
        k -= 1;
    }

    let mut grid = Vec::new();
    loop {
        let t = freq.advance(anchor, k)?;
        if t > hi {
            break;
        }
        grid.push(t);
        k += 1;
    }
    Ok(grid)
}

fn approx_seconds(freq: &Frequency) -> f64 {
    const SECONDS_PER_MONTH: f64 = 2_629_746.0;
    match freq {
        Frequency::Fixed(step) => step.num_milliseconds() as f64 / 1000.0,
        Frequency::Months(n) | Frequency::MonthEnds(n) => f64::from(*n) * SECONDS_PER_MONTH,
    }
}
