//! Asymmetric empirical confidence band.
//!
//! For every step the band is the narrowest integer interval [lower, upper]
//! with lower <= mean <= upper that holds at least `confidence` of the trials.
//! Copy counts are capped and skewed, so the band is generally not symmetric
//! around the mean.

use crate::{
    error::{SimError, SimResult},
    matrix::CountMatrix,
    types::Step,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Vec<u32>,
    pub upper: Vec<u32>,
}

/// Compute the band for every step of `samples`.
pub fn estimate_band(samples: &CountMatrix, confidence: f64) -> SimResult<Band> {
    check_confidence(confidence)?;
    if samples.trials() == 0 {
        return Err(SimError::invalid_parameter("trials", 0, "must be > 0"));
    }

    let mut band = Band {
        lower: Vec::with_capacity(samples.steps()),
        upper: Vec::with_capacity(samples.steps()),
    };
    let mut sorted: Vec<u32> = Vec::with_capacity(samples.trials());
    for step in 0..samples.steps() {
        sorted.clear();
        sorted.extend(samples.column(step));
        let (lower, upper) = column_bounds(&mut sorted, confidence, step)?;
        band.lower.push(lower);
        band.upper.push(upper);
    }
    Ok(band)
}

pub fn check_confidence(confidence: f64) -> SimResult<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(SimError::invalid_parameter(
            "confidence",
            confidence,
            "must lie strictly between 0 and 1",
        ));
    }
    Ok(())
}

/// Bounds for one step. `values` is reordered in place.
///
/// Candidates are uppers in [ceil(mean), max] and lowers in [min, floor(mean)].
/// Uppers are scanned ascending and, for each, lowers descending: the first
/// feasible lower is the narrowest for that upper, so the overall winner is the
/// minimum width with ties going to the lowest upper.
fn column_bounds(values: &mut [u32], confidence: f64, step: Step) -> SimResult<(u32, u32)> {
    values.sort_unstable();
    let n = values.len();
    let (min, max) = match (values.first(), values.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return Err(SimError::BandInvariant { step }),
    };
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n as f64;
    let upper_start = mean.ceil() as u32;
    let lower_end = mean.floor() as u32;

    // Number of samples <= x, and < x.
    let at_most = |x: u32| values.partition_point(|&v| v <= x);
    let below = |x: u32| values.partition_point(|&v| v < x);

    let mut best: Option<(u32, u32)> = None;
    for upper in upper_start..=max {
        let covered_to_upper = at_most(upper);
        for lower in (min..=lower_end).rev() {
            let covered = covered_to_upper - below(lower);
            if covered as f64 / n as f64 >= confidence {
                let narrower = best.map_or(true, |(l, u)| upper - lower < u - l);
                if narrower {
                    best = Some((lower, upper));
                }
                break;
            }
        }
    }
    best.ok_or(SimError::BandInvariant { step })
}
