//! Dense trials × steps matrices.
//!
//! Row i is trial i, column t is step t. Storage is row-major so a whole
//! trial's chain is contiguous.

use crate::types::{LootCode, Step, TrialIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix<T> {
    trials: usize,
    steps:  usize,
    data:   Vec<T>,
}

/// Outcome codes per (trial, step). Produced once by the simulator.
pub type LootMatrix = Matrix<LootCode>;

/// Capped cumulative copy counts per (trial, step).
pub type CountMatrix = Matrix<u32>;

impl<T: Copy + Default> Matrix<T> {
    pub fn new(trials: usize, steps: usize) -> Self {
        Self {
            trials,
            steps,
            data: vec![T::default(); trials * steps],
        }
    }
}

impl<T: Copy> Matrix<T> {
    /// Build from row-major data. Returns None if the length does not match.
    pub fn from_rows(trials: usize, steps: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == trials * steps).then_some(Self { trials, steps, data })
    }

    pub fn trials(&self) -> usize { self.trials }
    pub fn steps(&self)  -> usize { self.steps }

    pub fn row(&self, trial: TrialIndex) -> &[T] {
        &self.data[trial * self.steps..(trial + 1) * self.steps]
    }

    pub fn row_mut(&mut self, trial: TrialIndex) -> &mut [T] {
        &mut self.data[trial * self.steps..(trial + 1) * self.steps]
    }

    /// Values of one step across all trials, in trial order.
    pub fn column(&self, step: Step) -> impl Iterator<Item = T> + '_ {
        self.data.iter().skip(step).step_by(self.steps).copied()
    }

    /// Overwrite column `step` from a per-trial slice.
    pub fn write_column(&mut self, step: Step, values: &[T]) {
        debug_assert_eq!(values.len(), self.trials);
        for (trial, &v) in values.iter().enumerate() {
            self.data[trial * self.steps + step] = v;
        }
    }

    pub fn as_slice(&self) -> &[T] { &self.data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_reads_across_rows() {
        let m = Matrix::from_rows(3, 2, vec![1u32, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.column(0).collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(m.row(1), &[3, 4]);
    }

    #[test]
    fn write_column_touches_one_step() {
        let mut m: Matrix<u8> = Matrix::new(2, 3);
        m.write_column(1, &[7, 9]);
        assert_eq!(m.as_slice(), &[0, 7, 0, 0, 9, 0]);
    }

    #[test]
    fn from_rows_rejects_bad_length() {
        assert!(Matrix::from_rows(2, 2, vec![0u8; 3]).is_none());
    }
}
