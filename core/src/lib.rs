//! Monte Carlo simulator for pity-based wish banners.
//!
//! `simulator` produces a trials × pulls loot matrix, `analysis` derives
//! capped copy counts and their per-pull distribution, and `band` finds the
//! narrowest integer band around the mean copy count.

pub mod analysis;
pub mod band;
pub mod config;
pub mod error;
pub mod matrix;
pub mod report;
pub mod rng;
pub mod simulator;
pub mod types;
