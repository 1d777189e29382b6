//! Regularizing a gappy table and making room for a forecast horizon.
//!
//! Run with: cargo run --example reindex

use chrono::{Duration, TimeZone, Utc};
use forecast_diagnostics::core::{Frequency, TimeTable};
use forecast_diagnostics::io::{read_csv, write_csv, CsvOptions};
use forecast_diagnostics::transform::{reindex, Step};
use tracing_subscriber::EnvFilter;

const DATA: &str = "\
date,visitors
2024-03-01,120
2024-03-02,131
2024-03-04,127
2024-03-05,
2024-03-06,140
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table = read_csv(DATA.as_bytes(), &CsvOptions::default()).unwrap();
    println!("Loaded {} rows, frequency: {:?}", table.len(), table.infer_frequency().ok());

    // Spell out the daily grid, extend one week, and drop the first day
    let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
    let mut daily = table.clone();
    daily.set_frequency(Frequency::daily());
    let horizon = reindex(&daily, Some(start), None, Some(Step::periods(7))).unwrap();
    print_table(&horizon);

    // Duration steps extend the bounds by wall-clock time instead
    let shifted = reindex(&daily, None, None, Some(Step::duration(Duration::days(-2)))).unwrap();
    println!("\nTwo days earlier: {} rows starting {}", shifted.len(), shifted.timestamps()[0]);

    let mut out = Vec::new();
    write_csv(&mut out, &horizon, &CsvOptions::default().with_date_column("date")).unwrap();
    println!("\n{}", String::from_utf8_lossy(&out));
}

fn print_table(table: &TimeTable) {
    println!("\n{:<12} {:>10}", "date", "visitors");
    let values = table.column("visitors").unwrap();
    for (ts, v) in table.timestamps().iter().zip(values) {
        println!("{:<12} {:>10}", ts.format("%Y-%m-%d"), v);
    }
}
