//! A single named column with its time index.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One named column of a time-indexed table.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

/// Two series joined on their shared timestamps with missing pairs dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub timestamps: Vec<DateTime<Utc>>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl Series {
    pub fn new(
        name: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::TimestampError(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            timestamps,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Inner join on timestamps, keeping only positions where both values are present.
    pub fn align(&self, other: &Series) -> AlignedPair {
        let lookup: HashMap<DateTime<Utc>, f64> = other
            .timestamps
            .iter()
            .copied()
            .zip(other.values.iter().copied())
            .collect();

        let mut pair = AlignedPair {
            timestamps: Vec::with_capacity(self.len()),
            left: Vec::with_capacity(self.len()),
            right: Vec::with_capacity(self.len()),
        };

        for (&t, &l) in self.timestamps.iter().zip(self.values.iter()) {
            if let Some(&r) = lookup.get(&t) {
                if !l.is_nan() && !r.is_nan() {
                    pair.timestamps.push(t);
                    pair.left.push(l);
                    pair.right.push(r);
                }
            }
        }

        pair
    }
}
