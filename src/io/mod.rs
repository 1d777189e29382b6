//! Flat-file loading and saving of time-indexed tables.
//!
//! # Example
//!
//! ```
//! use forecast_diagnostics::io::{read_csv, CsvOptions};
//!
//! let data = "month,passengers\n1949-01,112\n1949-02,118\n1949-03,132\n";
//! let table = read_csv(data.as_bytes(), &CsvOptions::default()).unwrap();
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.native_frequency().unwrap().to_string(), "1MS");
//! ```

mod delimited;

pub use delimited::{
    parse_timestamp, read_csv, read_csv_path, write_csv, write_csv_path, CsvOptions,
};
