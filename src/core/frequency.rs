//! Sampling frequency of a regular time index.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use std::fmt;

/// Fixed spacing between consecutive timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Exact spacing (seconds, minutes, hours, days, weeks).
    Fixed(Duration),
    /// Calendar months anchored on a day of month (monthly, quarterly, yearly).
    Months(u32),
    /// Calendar months anchored on the last day of the month.
    MonthEnds(u32),
}

impl Frequency {
    pub fn hourly() -> Self {
        Frequency::Fixed(Duration::hours(1))
    }

    pub fn daily() -> Self {
        Frequency::Fixed(Duration::days(1))
    }

    pub fn weekly() -> Self {
        Frequency::Fixed(Duration::weeks(1))
    }

    pub fn monthly() -> Self {
        Frequency::Months(1)
    }

    pub fn quarterly() -> Self {
        Frequency::Months(3)
    }

    pub fn yearly() -> Self {
        Frequency::Months(12)
    }

    /// Move `timestamp` by `periods` steps of this frequency (negative goes back).
    pub fn advance(&self, timestamp: DateTime<Utc>, periods: i64) -> Result<DateTime<Utc>> {
        let overflow = || {
            ForecastError::TimestampError(format!(
                "moving {} by {} periods of {} overflows",
                timestamp, periods, self
            ))
        };

        match *self {
            Frequency::Fixed(step) => {
                let periods = i32::try_from(periods).map_err(|_| overflow())?;
                let delta = step.checked_mul(periods).ok_or_else(overflow)?;
                timestamp.checked_add_signed(delta).ok_or_else(overflow)
            }
            Frequency::Months(n) => {
                let months = i64::from(n).checked_mul(periods).ok_or_else(overflow)?;
                shift_months(timestamp, months).ok_or_else(overflow)
            }
            Frequency::MonthEnds(n) => {
                let months = i64::from(n).checked_mul(periods).ok_or_else(overflow)?;
                let shifted = shift_months(first_of_month(timestamp), months).ok_or_else(overflow)?;
                let last = last_day_of_month(shifted.year(), shifted.month()).ok_or_else(overflow)?;
                shifted.with_day(last).ok_or_else(overflow)
            }
        }
    }

    /// Infer the frequency of strictly increasing timestamps.
    ///
    /// Every consecutive gap must agree: either an identical duration, or an
    /// identical number of calendar months with a shared day-of-month (or
    /// month-end) anchor and time of day.
    pub fn infer(timestamps: &[DateTime<Utc>]) -> Result<Self> {
        if timestamps.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: timestamps.len(),
            });
        }

        let first_gap = timestamps[1] - timestamps[0];
        if first_gap <= Duration::zero() {
            return Err(ForecastError::FrequencyInference(
                "timestamps must be strictly increasing".to_string(),
            ));
        }

        // Calendar anchors win over equal day gaps (Jul 1, Aug 1, Sep 1 is monthly).
        if let Some(freq) = calendar_months(timestamps)? {
            return Ok(freq);
        }
        if timestamps.windows(2).all(|w| w[1] - w[0] == first_gap) {
            return Ok(Frequency::Fixed(first_gap));
        }

        Err(ForecastError::FrequencyInference(
            "irregular spacing".to_string(),
        ))
    }
}

/// Month-based frequency when every timestamp shares a time of day, a
/// day-of-month (or month-end) anchor and a constant month gap.
fn calendar_months(timestamps: &[DateTime<Utc>]) -> Result<Option<Frequency>> {
    let time_of_day = timestamps[0].time();
    if timestamps.iter().any(|t| t.time() != time_of_day) {
        return Ok(None);
    }

    let month_gap = month_index(&timestamps[1]) - month_index(&timestamps[0]);
    let regular_months = month_gap > 0
        && timestamps
            .windows(2)
            .all(|w| month_index(&w[1]) - month_index(&w[0]) == month_gap);
    if !regular_months {
        return Ok(None);
    }
    let step = u32::try_from(month_gap)
        .map_err(|_| ForecastError::FrequencyInference("month step too large".to_string()))?;

    if timestamps.iter().all(is_month_end) {
        return Ok(Some(Frequency::MonthEnds(step)));
    }
    let day = timestamps[0].day();
    if timestamps.iter().all(|t| t.day() == day) {
        return Ok(Some(Frequency::Months(step)));
    }
    Ok(None)
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Fixed(step) => {
                let secs = step.num_seconds();
                if secs % 604_800 == 0 {
                    write!(f, "{}W", secs / 604_800)
                } else if secs % 86_400 == 0 {
                    write!(f, "{}D", secs / 86_400)
                } else if secs % 3_600 == 0 {
                    write!(f, "{}h", secs / 3_600)
                } else if secs % 60 == 0 {
                    write!(f, "{}min", secs / 60)
                } else {
                    write!(f, "{}s", secs)
                }
            }
            Frequency::Months(n) => write!(f, "{}MS", n),
            Frequency::MonthEnds(n) => write!(f, "{}ME", n),
        }
    }
}

fn month_index(timestamp: &DateTime<Utc>) -> i64 {
    i64::from(timestamp.year()) * 12 + i64::from(timestamp.month0())
}

fn shift_months(timestamp: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        timestamp.checked_add_months(magnitude)
    } else {
        timestamp.checked_sub_months(magnitude)
    }
}

fn first_of_month(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    // Day 1 exists in every month.
    timestamp.with_day(1).unwrap_or(timestamp)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(|d| d.day())
}

fn is_month_end(timestamp: &DateTime<Utc>) -> bool {
    last_day_of_month(timestamp.year(), timestamp.month()) == Some(timestamp.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn infers_fixed_spacing() {
        let timestamps: Vec<_> = (0..5).map(|i| ymd(2024, 1, 1) + Duration::days(i)).collect();
        assert_eq!(Frequency::infer(&timestamps).unwrap(), Frequency::daily());
    }

    #[test]
    fn infers_month_start_and_quarterly() {
        let monthly = vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1), ymd(2024, 4, 1)];
        assert_eq!(Frequency::infer(&monthly).unwrap(), Frequency::monthly());

        let quarterly = vec![ymd(2023, 1, 1), ymd(2023, 4, 1), ymd(2023, 7, 1), ymd(2023, 10, 1)];
        assert_eq!(Frequency::infer(&quarterly).unwrap(), Frequency::quarterly());

        let yearly = vec![ymd(2023, 7, 1), ymd(2024, 7, 1), ymd(2025, 7, 1)];
        assert_eq!(Frequency::infer(&yearly).unwrap(), Frequency::yearly());
    }

    #[test]
    fn equal_day_gaps_on_calendar_anchors_are_months() {
        // 31-day gaps
        let monthly = vec![ymd(2024, 7, 1), ymd(2024, 8, 1), ymd(2024, 9, 1)];
        assert_eq!(Frequency::infer(&monthly).unwrap(), Frequency::monthly());

        // 365-day gaps
        let yearly = vec![ymd(2021, 7, 1), ymd(2022, 7, 1), ymd(2023, 7, 1)];
        assert_eq!(Frequency::infer(&yearly).unwrap(), Frequency::yearly());

        // 92-day gaps
        let quarterly = vec![ymd(2024, 7, 1), ymd(2024, 10, 1)];
        assert_eq!(Frequency::infer(&quarterly).unwrap(), Frequency::quarterly());

        let ends = vec![ymd(2024, 7, 31), ymd(2024, 8, 31)];
        assert_eq!(Frequency::infer(&ends).unwrap(), Frequency::MonthEnds(1));
    }

    #[test]
    fn day_steps_across_month_boundaries_stay_fixed() {
        let daily = vec![ymd(2024, 1, 31), ymd(2024, 2, 1), ymd(2024, 2, 2)];
        assert_eq!(Frequency::infer(&daily).unwrap(), Frequency::daily());

        let weekly = vec![ymd(2024, 1, 28), ymd(2024, 2, 4)];
        assert_eq!(Frequency::infer(&weekly).unwrap(), Frequency::weekly());

        let hourly: Vec<_> = (0..30).map(|i| ymd(2024, 1, 31) + Duration::hours(i)).collect();
        assert_eq!(Frequency::infer(&hourly).unwrap(), Frequency::hourly());
    }

    #[test]
    fn infers_month_ends() {
        let ends = vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 31), ymd(2024, 4, 30)];
        assert_eq!(Frequency::infer(&ends).unwrap(), Frequency::MonthEnds(1));
    }

    #[test]
    fn rejects_irregular_spacing() {
        let timestamps = vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 5)];
        assert!(matches!(
            Frequency::infer(&timestamps),
            Err(ForecastError::FrequencyInference(_))
        ));
        assert!(matches!(
            Frequency::infer(&timestamps[..1]),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn advances_fixed_and_calendar_steps() {
        let start = ymd(2024, 1, 31);
        assert_eq!(Frequency::daily().advance(start, 1).unwrap(), ymd(2024, 2, 1));
        assert_eq!(Frequency::daily().advance(start, -31).unwrap(), ymd(2023, 12, 31));
        assert_eq!(Frequency::MonthEnds(1).advance(start, 1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(Frequency::MonthEnds(1).advance(start, 2).unwrap(), ymd(2024, 3, 31));
        assert_eq!(Frequency::MonthEnds(1).advance(start, -2).unwrap(), ymd(2023, 11, 30));
        assert_eq!(Frequency::quarterly().advance(ymd(2024, 1, 1), -1).unwrap(), ymd(2023, 10, 1));
    }

    #[test]
    fn displays_compact_codes() {
        assert_eq!(Frequency::daily().to_string(), "1D");
        assert_eq!(Frequency::hourly().to_string(), "1h");
        assert_eq!(Frequency::weekly().to_string(), "1W");
        assert_eq!(Frequency::quarterly().to_string(), "3MS");
    }
}
