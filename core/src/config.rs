//! Banner configuration — pity curves, banner odds and the loot code table.
//!
//! The shape of the mechanism is fixed (two escalating tiers, a banner coin
//! flip, a guarantee after an off-banner win). Only the constants live here.
//! Defaults follow the published character-banner rates
//! (https://www.hoyolab.com/article/497840).

use crate::{
    error::{SimError, SimResult},
    types::LootCode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pity parameters for one escalating tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Per-draw win probability before pity kicks in.
    pub base:       f64,
    /// 1-based pull count (since the last win) at which escalation starts.
    pub pity_start: u32,
    /// Probability added per pull from `pity_start` onwards.
    pub pity_slope: f64,
    /// Odds that a non-guaranteed win is the banner variant.
    pub banner:     f64,
}

impl TierConfig {
    /// Win probability for a draw `elapsed` pulls after the last win.
    ///
    /// `elapsed` is 1 on the pull right after a win (and on the first pull of
    /// a fresh chain). Pulls up to `pity_start - 1` get exactly `base`; pull
    /// `pity_start` gets `base + pity_slope`, and so on. Not clamped at 1.0.
    pub fn win_probability(&self, elapsed: i64) -> f64 {
        let pity_factor = (elapsed - (i64::from(self.pity_start) - 1)).max(0);
        self.base + pity_factor as f64 * self.pity_slope
    }

    fn validate(&self, tier: &str) -> SimResult<()> {
        check_probability(&format!("{tier}.base"), self.base)?;
        check_probability(&format!("{tier}.banner"), self.banner)?;
        if self.pity_start == 0 {
            return Err(SimError::invalid_config(
                format!("{tier}.pity_start"),
                "must be at least 1",
            ));
        }
        if !self.pity_slope.is_finite() || self.pity_slope < 0.0 {
            return Err(SimError::invalid_config(
                format!("{tier}.pity_slope"),
                format!("must be a finite value >= 0, got {}", self.pity_slope),
            ));
        }
        Ok(())
    }
}

/// The six mutually exclusive results of a single pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Three,
    FourBannerWanted,
    FourBannerUnwanted,
    FourOffbanner,
    FiveBanner,
    FiveOffbanner,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::Three,
        Outcome::FourBannerWanted,
        Outcome::FourBannerUnwanted,
        Outcome::FourOffbanner,
        Outcome::FiveBanner,
        Outcome::FiveOffbanner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Three              => "three",
            Self::FourBannerWanted   => "four_banner_wanted",
            Self::FourBannerUnwanted => "four_banner_unwanted",
            Self::FourOffbanner      => "four_offbanner",
            Self::FiveBanner         => "five_banner",
            Self::FiveOffbanner      => "five_offbanner",
        }
    }
}

/// Integer code written into the loot matrix for each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootTable {
    pub three:                LootCode,
    pub four_banner_wanted:   LootCode,
    pub four_banner_unwanted: LootCode,
    pub four_offbanner:       LootCode,
    pub five_banner:          LootCode,
    pub five_offbanner:       LootCode,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            three:                1,
            four_banner_wanted:   2,
            four_banner_unwanted: 3,
            four_offbanner:       4,
            five_banner:          5,
            five_offbanner:       6,
        }
    }
}

impl LootTable {
    pub fn code(&self, outcome: Outcome) -> LootCode {
        match outcome {
            Outcome::Three              => self.three,
            Outcome::FourBannerWanted   => self.four_banner_wanted,
            Outcome::FourBannerUnwanted => self.four_banner_unwanted,
            Outcome::FourOffbanner      => self.four_offbanner,
            Outcome::FiveBanner         => self.five_banner,
            Outcome::FiveOffbanner      => self.five_offbanner,
        }
    }

    /// Reverse lookup. None for a code that is not in the table.
    pub fn outcome(&self, code: LootCode) -> Option<Outcome> {
        Outcome::ALL.into_iter().find(|o| self.code(*o) == code)
    }

    fn validate(&self) -> SimResult<()> {
        for (i, a) in Outcome::ALL.iter().enumerate() {
            for b in &Outcome::ALL[i + 1..] {
                if self.code(*a) == self.code(*b) {
                    return Err(SimError::invalid_config(
                        format!("loot.{}", b.name()),
                        format!("code {} already used by loot.{}", self.code(*b), a.name()),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Complete, immutable configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishConfig {
    /// Tier A: the rarer tier.
    pub five_star:        TierConfig,
    /// Tier B: the common-rare tier.
    pub four_star:        TierConfig,
    /// Odds that a banner four-star is the one specific character wanted.
    pub four_star_wanted: f64,
    #[serde(default)]
    pub loot:             LootTable,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            five_star: TierConfig {
                base:       0.006,
                pity_start: 74,
                pity_slope: 0.06,
                banner:     0.5,
            },
            four_star: TierConfig {
                base:       0.051,
                pity_start: 9,
                pity_slope: 0.51,
                banner:     0.5,
            },
            four_star_wanted: 1.0 / 3.0,
            loot: LootTable::default(),
        }
    }
}

impl WishConfig {
    /// Load a config from a JSON file.
    /// In tests, use WishConfig::default().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: WishConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed constants before any simulation work starts.
    pub fn validate(&self) -> SimResult<()> {
        self.five_star.validate("five_star")?;
        self.four_star.validate("four_star")?;
        check_probability("four_star_wanted", self.four_star_wanted)?;
        self.loot.validate()
    }
}

fn check_probability(field: &str, p: f64) -> SimResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::invalid_config(
            field,
            format!("must be a probability in [0, 1], got {p}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_base_until_pity_start() {
        let tier = WishConfig::default().five_star;
        for elapsed in 1..tier.pity_start as i64 {
            assert_eq!(tier.win_probability(elapsed), tier.base, "elapsed={elapsed}");
        }
    }

    #[test]
    fn probability_rises_linearly_from_pity_start() {
        let tier = WishConfig::default().five_star;
        let start = tier.pity_start as i64;
        let p0 = tier.win_probability(start);
        let p1 = tier.win_probability(start + 1);
        assert!((p0 - (tier.base + tier.pity_slope)).abs() < 1e-12);
        assert!((p1 - p0 - tier.pity_slope).abs() < 1e-12);
    }

    #[test]
    fn probability_is_not_clamped_above_one() {
        let tier = WishConfig::default().four_star;
        assert!(tier.win_probability(20) > 1.0);
    }

    #[test]
    fn probability_is_non_decreasing() {
        let tier = WishConfig::default().four_star;
        let mut prev = tier.win_probability(0);
        for elapsed in 1..50 {
            let p = tier.win_probability(elapsed);
            assert!(p >= prev);
            prev = p;
        }
    }

    #[test]
    fn default_config_is_valid() {
        WishConfig::default().validate().unwrap();
    }

    #[test]
    fn negative_base_is_rejected() {
        let mut config = WishConfig::default();
        config.five_star.base = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("five_star.base"), "{err}");
    }

    #[test]
    fn zero_pity_start_is_rejected() {
        let mut config = WishConfig::default();
        config.four_star.pity_start = 0;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn negative_slope_is_rejected() {
        let mut config = WishConfig::default();
        config.four_star.pity_slope = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_loot_codes_are_rejected() {
        let mut config = WishConfig::default();
        config.loot.five_offbanner = config.loot.five_banner;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("loot.five_offbanner"), "{err}");
    }

    #[test]
    fn loot_table_round_trips_every_outcome() {
        let table = LootTable::default();
        for outcome in Outcome::ALL {
            assert_eq!(table.outcome(table.code(outcome)), Some(outcome));
        }
        assert_eq!(table.outcome(0), None);
    }

    #[test]
    fn config_parses_without_loot_table() {
        let json = r#"{
            "five_star": { "base": 0.006, "pity_start": 74, "pity_slope": 0.06, "banner": 0.5 },
            "four_star": { "base": 0.051, "pity_start": 9, "pity_slope": 0.51, "banner": 0.5 },
            "four_star_wanted": 0.5
        }"#;
        let config: WishConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.loot, LootTable::default());
        assert_eq!(config.four_star_wanted, 0.5);
    }
}
