//! Property-based tests for metrics, reindexing and autocorrelation.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use forecast_diagnostics::core::{Frequency, TimeTable};
use forecast_diagnostics::transform::{compute, reindex, Step};
use forecast_diagnostics::utils::{mae, mape, mase, mse, rmse};
use forecast_diagnostics::validation::{acf, pacf, AcfMethod};
use forecast_diagnostics::ForecastError;
use proptest::prelude::*;

fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n).map(|i| base + Duration::hours(i as i64)).collect()
}

fn make_table(values: &[f64]) -> TimeTable {
    TimeTable::univariate(make_timestamps(values.len()), "y", values.to_vec()).unwrap()
}

/// Observed/predicted pairs of equal length.
fn pair_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(-1000.0..1000.0_f64, len),
            prop::collection::vec(-1000.0..1000.0_f64, len),
        )
    })
}

/// Strictly positive observed values, so MAPE stays finite.
fn positive_pair_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(1.0..1000.0_f64, len),
            prop::collection::vec(1.0..1000.0_f64, len),
        )
    })
}

/// Series with non-zero variance.
fn varying_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(-100.0..100.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.01;
            }
            v
        })
    })
}

// =============================================================================
// Property: metric ordering and identities
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn rmse_dominates_mae((actual, predicted) in pair_strategy(1, 60)) {
        let mae = mae(&actual, &predicted).unwrap();
        let rmse = rmse(&actual, &predicted).unwrap();
        prop_assert!(mae >= 0.0);
        prop_assert!(rmse + 1e-9 >= mae, "rmse {} < mae {}", rmse, mae);
    }

    #[test]
    fn rmse_is_sqrt_of_mse((actual, predicted) in pair_strategy(1, 60)) {
        let mse = mse(&actual, &predicted).unwrap();
        let rmse = rmse(&actual, &predicted).unwrap();
        prop_assert!((rmse * rmse - mse).abs() <= 1e-9 * mse.max(1.0));
    }

    #[test]
    fn identical_inputs_have_zero_error((actual, _) in positive_pair_strategy(1, 60)) {
        prop_assert_eq!(mae(&actual, &actual).unwrap(), 0.0);
        prop_assert_eq!(mse(&actual, &actual).unwrap(), 0.0);
        prop_assert_eq!(rmse(&actual, &actual).unwrap(), 0.0);
        prop_assert_eq!(mape(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn mape_is_scale_invariant(
        (actual, predicted) in positive_pair_strategy(1, 60),
        scale in 0.01..100.0_f64
    ) {
        let base = mape(&actual, &predicted).unwrap();
        let scaled_actual: Vec<f64> = actual.iter().map(|v| v * scale).collect();
        let scaled_predicted: Vec<f64> = predicted.iter().map(|v| v * scale).collect();
        let scaled = mape(&scaled_actual, &scaled_predicted).unwrap();
        prop_assert!((base - scaled).abs() <= 1e-9 * base.max(1.0));
    }

    #[test]
    fn nan_pairs_do_not_change_metrics(
        (actual, predicted) in pair_strategy(1, 40),
        gaps in prop::collection::vec(any::<bool>(), 40)
    ) {
        let mut padded_actual = Vec::new();
        let mut padded_predicted = Vec::new();
        for (i, (a, p)) in actual.iter().zip(predicted.iter()).enumerate() {
            if gaps[i] {
                padded_actual.push(f64::NAN);
                padded_predicted.push(*p);
            }
            padded_actual.push(*a);
            padded_predicted.push(*p);
        }
        prop_assert_eq!(mae(&actual, &predicted).unwrap(), mae(&padded_actual, &padded_predicted).unwrap());
        prop_assert_eq!(rmse(&actual, &predicted).unwrap(), rmse(&padded_actual, &padded_predicted).unwrap());
    }

    #[test]
    fn mase_is_never_implemented((actual, predicted) in pair_strategy(0, 20)) {
        prop_assert!(matches!(mase(&actual, &predicted), Err(ForecastError::NotImplemented(_))));
    }
}

// =============================================================================
// Property: reindexing
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn default_reindex_adds_one_empty_row(values in varying_values_strategy(2, 50)) {
        let table = make_table(&values);
        let extended = reindex(&table, None, None, None).unwrap();

        prop_assert_eq!(extended.len(), values.len() + 1);
        let column = extended.column("y").unwrap();
        prop_assert_eq!(&column[..values.len()], values.as_slice());
        prop_assert!(column[values.len()].is_nan());
    }

    #[test]
    fn periods_step_adds_that_many_rows(
        values in varying_values_strategy(2, 40),
        periods in -10i64..10
    ) {
        let table = make_table(&values);
        let extended = reindex(&table, None, None, Some(Step::periods(periods))).unwrap();

        prop_assert_eq!(extended.len(), values.len() + periods.unsigned_abs() as usize);
        let column = extended.column("y").unwrap();
        let nan_count = column.iter().filter(|v| v.is_nan()).count();
        prop_assert_eq!(nan_count, periods.unsigned_abs() as usize);
        if periods < 0 {
            prop_assert!(column[0].is_nan());
        }
    }

    #[test]
    fn explicit_bounds_truncate(
        values in varying_values_strategy(4, 40),
        cut in 0usize..1000
    ) {
        let n = values.len();
        let lo = cut % (n / 2);
        let hi = n - 1 - cut % (n / 2);
        let table = make_table(&values);
        let ts = table.timestamps().to_vec();

        let window = reindex(&table, Some(ts[lo]), Some(ts[hi]), None).unwrap();
        prop_assert_eq!(window.len(), hi - lo + 1);
        prop_assert_eq!(window.column("y").unwrap(), &values[lo..=hi]);
    }

    #[test]
    fn compute_keeps_other_columns(values in varying_values_strategy(1, 40)) {
        let table = make_table(&values);
        let result = compute(&table, |t| {
            let doubled = t.column("y")?.iter().map(|v| v * 2.0).collect();
            Ok(vec![("double".to_string(), doubled)])
        })
        .unwrap();

        prop_assert_eq!(result.column("y").unwrap(), values.as_slice());
        prop_assert_eq!(result.width(), 2);
    }
}

// =============================================================================
// Property: calendar-anchored grids
// =============================================================================

/// Monthly, quarterly or yearly index anchored on a fixed day and hour.
fn calendar_grid_strategy() -> impl Strategy<Value = (Vec<DateTime<Utc>>, u32)> {
    (
        1990i32..2040,
        1u32..=12,
        1u32..=27,
        0u32..24,
        prop::sample::select(vec![1u32, 3, 12]),
        2usize..30,
    )
        .prop_map(|(year, month, day, hour, step, n)| {
            let base = Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
            let timestamps = (0..n as u32)
                .map(|i| base.checked_add_months(Months::new(step * i)).unwrap())
                .collect();
            (timestamps, step)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn calendar_grids_infer_month_steps((timestamps, step) in calendar_grid_strategy()) {
        let n = timestamps.len();
        let table = TimeTable::univariate(timestamps.clone(), "y", vec![1.0; n]).unwrap();
        prop_assert_eq!(table.infer_frequency().unwrap(), Frequency::Months(step));

        let extended = reindex(&table, None, None, None).unwrap();
        let expected = timestamps[0].checked_add_months(Months::new(step * n as u32)).unwrap();
        prop_assert_eq!(extended.len(), n + 1);
        prop_assert_eq!(*extended.timestamps().last().unwrap(), expected);
        prop_assert_eq!(&extended.timestamps()[..n], timestamps.as_slice());
    }
}

// =============================================================================
// Property: autocorrelation estimates
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn acf_is_bounded_and_starts_at_one(values in varying_values_strategy(5, 120)) {
        let r = acf(&values, 10, AcfMethod::Direct).unwrap();
        prop_assert!((r[0] - 1.0).abs() < 1e-12);
        for v in r.iter().filter(|v| v.is_finite()) {
            prop_assert!(v.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn fft_and_direct_agree(values in varying_values_strategy(5, 120)) {
        let direct = acf(&values, 20, AcfMethod::Direct).unwrap();
        let fft = acf(&values, 20, AcfMethod::Fft).unwrap();
        for (d, f) in direct.iter().zip(fft.iter()) {
            prop_assert!((d.is_nan() && f.is_nan()) || (d - f).abs() < 1e-9);
        }
    }

    #[test]
    fn pacf_lag_one_matches_acf(values in varying_values_strategy(10, 120)) {
        let r = acf(&values, 1, AcfMethod::Direct).unwrap();
        let p = pacf(&values, 4).unwrap();
        prop_assert!((p[1] - r[1]).abs() < 1e-12);
        for v in &p {
            prop_assert!(v.abs() <= 1.0 + 1e-9);
        }
    }
}
