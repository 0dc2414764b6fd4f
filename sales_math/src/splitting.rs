//! Chronological train/test splitting
//!
//! Time-ordered data must never be shuffled before splitting; the split
//! point is a floor of the training fraction, and everything after it is
//! the held-out tail.

use crate::{MathError, Result};

/// Index of the first held-out element for a chronological split.
///
/// Uses an integer floor, so a 10-element series at 0.8 trains on the
/// first 8 and a 9-element series on the first 7.
pub fn split_index(len: usize, train_fraction: f64) -> Result<usize> {
    if !(0.0..1.0).contains(&train_fraction) || train_fraction == 0.0 {
        return Err(MathError::InvalidParameter(format!(
            "Train fraction must be in (0, 1), got {}",
            train_fraction
        )));
    }
    Ok((len as f64 * train_fraction).floor() as usize)
}

/// Split a slice chronologically into (train, test).
pub fn chronological_split<T>(items: &[T], train_fraction: f64) -> Result<(&[T], &[T])> {
    let split = split_index(items.len(), train_fraction)?;
    Ok(items.split_at(split))
}
