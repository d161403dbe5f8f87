//! Shared primitive types used across the simulator.

/// A draw index within a chain. Step 0 is the first pull.
pub type Step = usize;

/// Index of an independent trial (one simulated player).
pub type TrialIndex = usize;

/// Integer tag stored in each loot matrix cell.
pub type LootCode = u8;

/// Sentinel stored in `last_win` for a tier that has not been won yet.
/// With this sentinel, `t - last_win` yields `t + 1` on a fresh chain.
pub const NEVER_WON: i64 = -1;
