//! Copy-count analysis — turns a loot matrix into per-pull curves.
//!
//! For a tracked outcome this derives the capped cumulative copy count of
//! every trial, then per step: P(exactly k copies), P(at least k copies),
//! the mean copy count and its confidence band.

use crate::{
    band::{estimate_band, Band},
    config::{Outcome, WishConfig},
    error::{SimError, SimResult},
    matrix::{CountMatrix, LootMatrix},
    types::LootCode,
};
use serde::{Deserialize, Serialize};

/// Copies tracked per target. Seven copies is a fully upgraded character.
pub const DEFAULT_MAX_COPIES: u32 = 7;

/// Outcomes tracked by a standard analysis, in report order.
pub const TRACKED_OUTCOMES: [Outcome; 2] = [Outcome::FourBannerWanted, Outcome::FiveBanner];

/// Running count of `code` per trial, capped at `max_copies`.
pub fn cumulative_counts(
    loot: &LootMatrix,
    code: LootCode,
    max_copies: u32,
) -> SimResult<CountMatrix> {
    if max_copies == 0 {
        return Err(SimError::invalid_parameter("max_copies", max_copies, "must be > 0"));
    }
    let mut counts = CountMatrix::new(loot.trials(), loot.steps());
    for trial in 0..loot.trials() {
        let mut running = 0u32;
        for (cell, &c) in counts.row_mut(trial).iter_mut().zip(loot.row(trial)) {
            if c == code {
                running += 1;
            }
            *cell = running.min(max_copies);
        }
    }
    Ok(counts)
}

/// Per-step distribution of copy counts for one tracked outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyCurves {
    pub max_copies: u32,
    /// `exact[k - 1][t]` = P(count == k after pull t + 1).
    pub exact:      Vec<Vec<f64>>,
    /// `at_least[k - 1][t]` = P(count >= k after pull t + 1).
    pub at_least:   Vec<Vec<f64>>,
    pub mean:       Vec<f64>,
    pub band:       Band,
}

impl CopyCurves {
    pub fn compute(counts: &CountMatrix, max_copies: u32, confidence: f64) -> SimResult<Self> {
        if max_copies == 0 {
            return Err(SimError::invalid_parameter("max_copies", max_copies, "must be > 0"));
        }
        let band = estimate_band(counts, confidence)?;

        let n = counts.trials() as f64;
        let levels = max_copies as usize;
        let steps = counts.steps();
        let mut exact = vec![Vec::with_capacity(steps); levels];
        let mut at_least = vec![Vec::with_capacity(steps); levels];
        let mut mean = Vec::with_capacity(steps);
        let mut histogram = vec![0u64; levels + 1];

        for step in 0..steps {
            histogram.fill(0);
            let mut total = 0u64;
            for c in counts.column(step) {
                // Counts above the cap only appear in hand-built matrices.
                histogram[(c as usize).min(levels)] += 1;
                total += u64::from(c);
            }
            mean.push(total as f64 / n);

            let mut tail = 0u64;
            for k in (1..=levels).rev() {
                tail += histogram[k];
                exact[k - 1].push(histogram[k] as f64 / n);
                at_least[k - 1].push(tail as f64 / n);
            }
        }

        Ok(Self { max_copies, exact, at_least, mean, band })
    }

    pub fn steps(&self) -> usize {
        self.mean.len()
    }

    /// Constellation label for holding `copies` copies: one copy is C0.
    pub fn label(copies: u32) -> String {
        format!("C{}", copies.saturating_sub(1))
    }
}

/// Curves for one tracked outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCurves {
    pub outcome: Outcome,
    pub curves:  CopyCurves,
}

/// Full analysis of a run: one set of curves per tracked outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishAnalysis {
    pub trials:       usize,
    pub chain_length: usize,
    pub confidence:   f64,
    pub targets:      Vec<TargetCurves>,
}

impl WishAnalysis {
    pub fn from_loot(
        loot: &LootMatrix,
        config: &WishConfig,
        max_copies: u32,
        confidence: f64,
    ) -> SimResult<Self> {
        let targets = TRACKED_OUTCOMES
            .iter()
            .map(|&outcome| -> SimResult<TargetCurves> {
                let counts = cumulative_counts(loot, config.loot.code(outcome), max_copies)?;
                let curves = CopyCurves::compute(&counts, max_copies, confidence)?;
                log::debug!(
                    "{}: final mean copies {:.3}",
                    outcome.name(),
                    curves.mean.last().copied().unwrap_or(0.0)
                );
                Ok(TargetCurves { outcome, curves })
            })
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            trials: loot.trials(),
            chain_length: loot.steps(),
            confidence,
            targets,
        })
    }

    pub fn target(&self, outcome: Outcome) -> Option<&CopyCurves> {
        self.targets.iter().find(|t| t.outcome == outcome).map(|t| &t.curves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_run_and_cap() {
        let loot = LootMatrix::from_rows(1, 6, vec![5, 1, 5, 5, 2, 5]).unwrap();
        let counts = cumulative_counts(&loot, 5, 3).unwrap();
        assert_eq!(counts.row(0), &[1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn zero_cap_rejected() {
        let loot = LootMatrix::from_rows(1, 1, vec![5]).unwrap();
        assert!(cumulative_counts(&loot, 5, 0).is_err());
    }

    #[test]
    fn exact_and_at_least_agree() {
        let counts = CountMatrix::from_rows(4, 2, vec![0, 1, 1, 1, 1, 2, 0, 2]).unwrap();
        let curves = CopyCurves::compute(&counts, 2, 0.5).unwrap();

        assert_eq!(curves.exact[0], vec![0.5, 0.5]);
        assert_eq!(curves.exact[1], vec![0.0, 0.5]);
        assert_eq!(curves.at_least[0], vec![0.5, 1.0]);
        assert_eq!(curves.at_least[1], vec![0.0, 0.5]);
        assert_eq!(curves.mean, vec![0.5, 1.5]);
    }

    #[test]
    fn labels_use_constellation_numbering() {
        assert_eq!(CopyCurves::label(1), "C0");
        assert_eq!(CopyCurves::label(7), "C6");
    }
}
