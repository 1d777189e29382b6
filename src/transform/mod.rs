//! Table transformations: reindexing, grouped summaries and derived columns.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use forecast_diagnostics::core::TimeTable;
//! use forecast_diagnostics::transform::{reindex, Step};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps = (0..4).map(|i| base + Duration::hours(i)).collect();
//! let table = TimeTable::univariate(timestamps, "load", vec![3.0, 4.0, 5.0, 4.5]).unwrap();
//!
//! // Make room for a six-hour forecast
//! let horizon = reindex(&table, None, None, Some(Step::periods(6))).unwrap();
//! assert_eq!(horizon.len(), 10);
//! ```

pub mod compute;
pub mod group;
pub mod reindex;

pub use compute::compute;
pub use group::{group_by, GroupedTable, Summary};
pub use reindex::{reindex, Step};
