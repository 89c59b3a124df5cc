//! Reservoir-state aggregation.
//!
//! The first `startup` states of a trajectory reflect un-settled transient
//! dynamics before the recurrent memory has warmed up and are discarded.
//! Joining two documents' trajectories is a plain ordered concatenation;
//! document boundaries are the caller's responsibility.

use crate::errors::{EchoError, Result};

/// Drop the first `startup` states of a trajectory.
///
/// `startup == 0` returns the sequence unchanged. `startup >= len` is a
/// configuration error: nothing would remain for aggregation.
pub fn discard_startup(mut states: Vec<Vec<f64>>, startup: usize) -> Result<Vec<Vec<f64>>> {
    if startup >= states.len() {
        return Err(EchoError::Config(format!(
            "startup ({}) must be < sequence length ({})",
            startup,
            states.len()
        )));
    }
    states.drain(0..startup);
    Ok(states)
}

/// Concatenate two trajectories for joint analysis, first then second.
pub fn join(mut first: Vec<Vec<f64>>, second: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    first.extend(second);
    first
}

/// Collapse a trajectory into one document-level vector by averaging each
/// reservoir unit over time.
pub fn time_average(states: &[Vec<f64>]) -> Result<Vec<f64>> {
    let first = states
        .first()
        .ok_or_else(|| EchoError::Data("cannot average an empty trajectory".into()))?;

    let width = first.len();
    let mut mean = vec![0.0f64; width];
    for s in states {
        if s.len() != width {
            return Err(EchoError::DimensionMismatch { expected: width, got: s.len() });
        }
        for (m, &v) in mean.iter_mut().zip(s.iter()) {
            *m += v;
        }
    }
    let n = states.len() as f64;
    for m in mean.iter_mut() {
        *m /= n;
    }
    Ok(mean)
}
