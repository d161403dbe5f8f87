//! The chain simulator — advances every trial one pull at a time, in lockstep.
//!
//! EXECUTION ORDER per step (fixed, documented, never reordered):
//!   1. One uniform per trial for the five-star roll.
//!   2. One banner draw per five-star winner, ascending trial index.
//!   3. One uniform per trial for the four-star roll. Every trial consumes
//!      a draw, but only trials without a five-star this step can win.
//!   4. One banner draw per four-star winner.
//!   5. One wanted draw per four-star winner.
//!   6. Everyone left over gets a three-star.
//!
//! RULES:
//!   - All randomness flows through the run's single DrawRng.
//!   - A banner draw is consumed even when the guarantee already decides it.
//!   - State arrays are allocated once per run and updated in place.

use crate::{
    config::{TierConfig, WishConfig},
    error::{SimError, SimResult},
    matrix::LootMatrix,
    rng::DrawRng,
    types::{LootCode, Step, TrialIndex, NEVER_WON},
};

/// Log a progress line every this many steps.
pub const PROGRESS_INTERVAL: Step = 100;

/// Pity bookkeeping for one tier across all trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTrack {
    /// Step of the most recent win, or NEVER_WON.
    pub last_win:  Vec<i64>,
    /// True when the next win of this tier must be the banner variant.
    pub guarantee: Vec<bool>,
}

impl TierTrack {
    fn new(trials: usize) -> Self {
        Self {
            last_win:  vec![NEVER_WON; trials],
            guarantee: vec![false; trials],
        }
    }

    /// Pulls since the last win, counting the pull at `step`.
    pub fn elapsed(&self, trial: TrialIndex, step: Step) -> i64 {
        step as i64 - self.last_win[trial]
    }
}

/// Per-trial state for both tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainState {
    pub five_star: TierTrack,
    pub four_star: TierTrack,
}

impl ChainState {
    pub fn new(trials: usize) -> Self {
        Self {
            five_star: TierTrack::new(trials),
            four_star: TierTrack::new(trials),
        }
    }

    pub fn trials(&self) -> usize {
        self.five_star.last_win.len()
    }
}

pub struct ChainSimulator {
    config:    WishConfig,
    rng:       DrawRng,
    state:     ChainState,
    next_step: Step,
    // Scratch buffers reused every step.
    draws:     Vec<f64>,
    resolved:  Vec<bool>,
    winners:   Vec<TrialIndex>,
    banner:    Vec<bool>,
    column:    Vec<LootCode>,
}

impl ChainSimulator {
    pub fn new(trials: usize, config: WishConfig, seed: u64) -> SimResult<Self> {
        if trials == 0 {
            return Err(SimError::invalid_parameter("trials", trials, "must be > 0"));
        }
        config.validate()?;
        Ok(Self {
            config,
            rng: DrawRng::new(seed),
            state: ChainState::new(trials),
            next_step: 0,
            draws: vec![0.0; trials],
            resolved: vec![false; trials],
            winners: Vec::new(),
            banner: Vec::new(),
            column: vec![0; trials],
        })
    }

    pub fn state(&self) -> &ChainState { &self.state }

    /// For tests and what-if tooling that needs to seed a particular state.
    pub fn state_mut(&mut self) -> &mut ChainState { &mut self.state }

    /// Index of the step the next call to `step()` will simulate.
    pub fn next_step(&self) -> Step { self.next_step }

    /// Simulate one pull for every trial. Returns that step's codes.
    pub fn step(&mut self) -> &[LootCode] {
        let t = self.next_step;
        let loot = self.config.loot;
        self.resolved.fill(false);

        // Five-star.
        self.rng.fill_uniform(&mut self.draws);
        collect_winners(
            &self.config.five_star,
            &self.state.five_star,
            t,
            &self.draws,
            &self.resolved,
            &mut self.winners,
        );
        resolve_banner(
            &self.config.five_star,
            &mut self.state.five_star,
            t,
            &self.winners,
            &mut self.rng,
            &mut self.banner,
        );
        for (&trial, &is_banner) in self.winners.iter().zip(&self.banner) {
            self.column[trial] = if is_banner { loot.five_banner } else { loot.five_offbanner };
            self.resolved[trial] = true;
        }

        // Four-star, on a fresh draw.
        self.rng.fill_uniform(&mut self.draws);
        collect_winners(
            &self.config.four_star,
            &self.state.four_star,
            t,
            &self.draws,
            &self.resolved,
            &mut self.winners,
        );
        resolve_banner(
            &self.config.four_star,
            &mut self.state.four_star,
            t,
            &self.winners,
            &mut self.rng,
            &mut self.banner,
        );
        for (&trial, &is_banner) in self.winners.iter().zip(&self.banner) {
            let wanted = self.rng.chance(self.config.four_star_wanted);
            self.column[trial] = match (is_banner, wanted) {
                (true, true)  => loot.four_banner_wanted,
                (true, false) => loot.four_banner_unwanted,
                (false, _)    => loot.four_offbanner,
            };
            self.resolved[trial] = true;
        }

        for (code, &done) in self.column.iter_mut().zip(&self.resolved) {
            if !done {
                *code = loot.three;
            }
        }

        self.next_step += 1;
        &self.column
    }

    /// Simulate `chain_length` further steps into a fresh loot matrix.
    pub fn run(&mut self, chain_length: usize) -> SimResult<LootMatrix> {
        if chain_length == 0 {
            return Err(SimError::invalid_parameter("chain_length", chain_length, "must be > 0"));
        }
        let mut loot = LootMatrix::new(self.state.trials(), chain_length);
        for local in 0..chain_length {
            let column = self.step();
            loot.write_column(local, column);
            if (local + 1) % PROGRESS_INTERVAL == 0 {
                log::debug!("simulated {}/{chain_length} steps", local + 1);
            }
        }
        Ok(loot)
    }
}

/// Simulate `trials` independent chains of `chain_length` pulls.
///
/// All inputs are validated before any draw is taken.
pub fn simulate(
    trials: usize,
    chain_length: usize,
    config: &WishConfig,
    seed: u64,
) -> SimResult<LootMatrix> {
    let mut sim = ChainSimulator::new(trials, config.clone(), seed)?;
    log::info!("Simulating {trials} trials x {chain_length} pulls (seed {seed})");
    let loot = sim.run(chain_length)?;
    log::info!("Simulation done");
    Ok(loot)
}

fn collect_winners(
    tier: &TierConfig,
    track: &TierTrack,
    step: Step,
    draws: &[f64],
    resolved: &[bool],
    winners: &mut Vec<TrialIndex>,
) {
    winners.clear();
    for (trial, (&u, &done)) in draws.iter().zip(resolved).enumerate() {
        if !done && u < tier.win_probability(track.elapsed(trial, step)) {
            winners.push(trial);
        }
    }
}

/// Decide banner vs off-banner for each winner and update the pity track.
fn resolve_banner(
    tier: &TierConfig,
    track: &mut TierTrack,
    step: Step,
    winners: &[TrialIndex],
    rng: &mut DrawRng,
    banner: &mut Vec<bool>,
) {
    banner.clear();
    for &trial in winners {
        // Draw first so the stream advances whether or not it matters.
        let is_banner = rng.chance(tier.banner) || track.guarantee[trial];
        track.guarantee[trial] = !is_banner;
        track.last_win[trial] = step as i64;
        banner.push(is_banner);
    }
}
