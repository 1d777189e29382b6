//! Core data structures for time-indexed tables.

mod frequency;
mod series;
mod time_table;

pub use frequency::Frequency;
pub use series::{AlignedPair, Series};
pub use time_table::{TimeTable, TimeTableBuilder};
