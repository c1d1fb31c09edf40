//! Night threat model.
//!
//! During the night the Boom Sprout probes the shelter at a fixed cadence.
//! Each probe turns the visible game counters into a damage chance and a
//! deterministic roll; the probe lands when the roll is below the chance.
//! No random number generator is involved, so replaying the same inputs
//! always gives the same night.

use crate::config::ThreatConfig;

/// Multipliers for the deterministic roll, in the order
/// `cycle_tick, day, hearts, threat, trust`.
const ROLL_WEIGHTS: [u64; 5] = [37, 53, 19, 11, 7];

/// Everything that shapes the damage chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceInputs {
    /// Current shelter score.
    pub shelter_score: u32,
    /// Current day number.
    pub day: u32,
    /// Accumulated Boom Sprout threat.
    pub threat: u32,
    /// Whether the sky wyrm is out.
    pub boss_active: bool,
    /// Whether easy mode is on.
    pub easy_mode: bool,
    /// Remaining adaptive grace nights.
    pub grace_nights: u32,
}

/// Everything that feeds the deterministic roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollInputs {
    /// Tick within the cycle.
    pub cycle_tick: u32,
    /// Current day number.
    pub day: u32,
    /// Current hearts.
    pub hearts: u32,
    /// Accumulated Boom Sprout threat.
    pub threat: u32,
    /// Current buddy trust.
    pub trust: u32,
}

/// The outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreatCheck {
    /// Damage chance in percent.
    pub chance: u32,
    /// Roll in `[0, 100)`.
    pub roll: u32,
    /// Whether the probe landed.
    pub hit: bool,
}

/// Stateless threat formulas over a [`ThreatConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatModel {
    config: ThreatConfig,
}

impl ThreatModel {
    /// Wrap a threat configuration.
    pub const fn new(config: ThreatConfig) -> Self {
        Self { config }
    }

    /// Base chance from the shelter score alone.
    pub fn base_chance(&self, shelter_score: u32) -> u32 {
        self.config
            .score_bands
            .iter()
            .filter(|band| shelter_score >= band.min_score)
            .max_by_key(|band| band.min_score)
            .map_or(self.config.fallback_chance, |band| band.chance)
    }

    /// Damage chance in percent, clamped to the configured bounds.
    pub fn chance(&self, inputs: &ChanceInputs) -> u32 {
        let cfg = &self.config;
        let days_past_first = inputs.day.saturating_sub(1).min(cfg.day_cap);
        let threat = inputs.threat.min(cfg.threat_cap);

        let mut pressure = i64::from(self.base_chance(inputs.shelter_score));
        pressure = pressure.saturating_add(i64::from(days_past_first.saturating_mul(cfg.per_day)));
        pressure = pressure.saturating_add(i64::from(threat.saturating_mul(cfg.per_threat)));
        if inputs.boss_active {
            pressure = pressure.saturating_add(i64::from(cfg.boss_bonus));
        }

        let mut relief = 0_i64;
        if inputs.easy_mode {
            relief = relief.saturating_add(i64::from(cfg.easy_relief));
        }
        if inputs.day <= cfg.early_day_limit {
            relief = relief.saturating_add(i64::from(cfg.early_day_relief));
        }
        relief = relief.saturating_add(
            i64::from(inputs.grace_nights).saturating_mul(i64::from(cfg.grace_relief)),
        );

        let clamped = pressure
            .saturating_sub(relief)
            .clamp(i64::from(cfg.min_chance), i64::from(cfg.max_chance));
        u32::try_from(clamped).unwrap_or(cfg.max_chance)
    }

    /// Deterministic roll in `[0, 100)`.
    pub fn roll(inputs: &RollInputs) -> u32 {
        let terms = [
            inputs.cycle_tick,
            inputs.day,
            inputs.hearts,
            inputs.threat,
            inputs.trust,
        ];
        let sum = terms
            .iter()
            .zip(ROLL_WEIGHTS)
            .fold(0_u64, |acc, (term, weight)| {
                acc.wrapping_add(u64::from(*term).wrapping_mul(weight))
            });
        u32::try_from(sum.checked_rem(100).unwrap_or(0)).unwrap_or(0)
    }

    /// Run one probe.
    pub fn check(&self, chance: &ChanceInputs, roll: &RollInputs) -> ThreatCheck {
        let chance = self.chance(chance);
        let roll = Self::roll(roll);
        ThreatCheck {
            chance,
            roll,
            hit: roll < chance,
        }
    }

    /// Ticks until the next probe. Shrinks as the days go by.
    pub fn cooldown(&self, day: u32, easy_mode: bool) -> u32 {
        let cfg = &self.config;
        let base = if easy_mode {
            cfg.easy_cooldown_ticks
        } else {
            cfg.cooldown_ticks
        };
        let reduction = day
            .checked_div(cfg.cooldown_day_divisor)
            .unwrap_or(0)
            .min(cfg.cooldown_max_reduction);
        base.saturating_sub(reduction).max(cfg.cooldown_floor)
    }

    /// Whether the sky wyrm comes out on the night of `day`.
    pub fn is_boss_night(&self, day: u32) -> bool {
        day.checked_rem(self.config.boss_every_days)
            .is_some_and(|rem| rem == 0)
    }

    /// Whether a probe at `shelter_score` earns the boss reward.
    pub const fn earns_boss_reward(&self, shelter_score: u32) -> bool {
        shelter_score >= self.config.boss_reward_score
    }
}

impl Default for ThreatModel {
    fn default() -> Self {
        Self::new(ThreatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(shelter_score: u32, day: u32) -> ChanceInputs {
        ChanceInputs {
            shelter_score,
            day,
            threat: 0,
            boss_active: false,
            easy_mode: false,
            grace_nights: 0,
        }
    }

    #[test]
    fn score_bands() {
        let model = ThreatModel::default();
        assert_eq!(model.base_chance(100), 6);
        assert_eq!(model.base_chance(80), 6);
        assert_eq!(model.base_chance(79), 14);
        assert_eq!(model.base_chance(60), 14);
        assert_eq!(model.base_chance(40), 26);
        assert_eq!(model.base_chance(20), 40);
        assert_eq!(model.base_chance(19), 55);
        assert_eq!(model.base_chance(0), 55);
    }

    #[test]
    fn chance_formula() {
        let model = ThreatModel::default();
        // 26 + 4 * 2 + 3 * 3 + 12
        let chance = model.chance(&ChanceInputs {
            threat: 3,
            boss_active: true,
            ..inputs(45, 5)
        });
        assert_eq!(chance, 55);
    }

    #[test]
    fn early_days_are_gentler() {
        let model = ThreatModel::default();
        assert_eq!(model.chance(&inputs(0, 1)), 45);
        assert_eq!(model.chance(&inputs(0, 2)), 47);
        assert_eq!(model.chance(&inputs(0, 3)), 59);
    }

    #[test]
    fn chance_clamped() {
        let model = ThreatModel::default();
        let worst = ChanceInputs {
            threat: 50,
            boss_active: true,
            ..inputs(0, 40)
        };
        assert_eq!(model.chance(&worst), 75);

        let best = ChanceInputs {
            easy_mode: true,
            grace_nights: 3,
            ..inputs(100, 1)
        };
        assert_eq!(model.chance(&best), 4);
    }

    #[test]
    fn easy_mode_and_grace_strictly_lower_chance() {
        let model = ThreatModel::default();
        let base = inputs(30, 6);
        let normal = model.chance(&base);
        let easy = model.chance(&ChanceInputs {
            easy_mode: true,
            ..base
        });
        let easy_grace = model.chance(&ChanceInputs {
            easy_mode: true,
            grace_nights: 1,
            ..base
        });
        let easy_more_grace = model.chance(&ChanceInputs {
            easy_mode: true,
            grace_nights: 2,
            ..base
        });
        assert!(easy < normal);
        assert!(easy_grace < easy);
        assert!(easy_more_grace < easy_grace);
    }

    #[test]
    fn roll_formula() {
        let roll = ThreatModel::roll(&RollInputs {
            cycle_tick: 110,
            day: 3,
            hearts: 3,
            threat: 1,
            trust: 50,
        });
        // 4070 + 159 + 57 + 11 + 350 = 4647
        assert_eq!(roll, 47);
    }

    #[test]
    fn check_hits_below_chance() {
        let model = ThreatModel::default();
        let roll = RollInputs {
            cycle_tick: 110,
            day: 3,
            hearts: 3,
            threat: 1,
            trust: 50,
        };
        let exposed = model.check(
            &ChanceInputs {
                threat: 1,
                ..inputs(0, 3)
            },
            &roll,
        );
        assert_eq!(exposed.chance, 62);
        assert!(exposed.hit);

        let sheltered = model.check(
            &ChanceInputs {
                threat: 1,
                ..inputs(90, 3)
            },
            &roll,
        );
        assert!(!sheltered.hit);
    }

    #[test]
    fn cooldown_shrinks_with_days() {
        let model = ThreatModel::default();
        assert_eq!(model.cooldown(1, false), 10);
        assert_eq!(model.cooldown(3, false), 9);
        assert_eq!(model.cooldown(12, false), 6);
        assert_eq!(model.cooldown(90, false), 6);
        assert_eq!(model.cooldown(1, true), 14);
        assert_eq!(model.cooldown(90, true), 10);
    }

    #[test]
    fn cooldown_respects_floor() {
        let model = ThreatModel::new(ThreatConfig {
            cooldown_ticks: 5,
            ..ThreatConfig::default()
        });
        assert_eq!(model.cooldown(30, false), 4);
    }

    #[test]
    fn boss_every_third_day() {
        let model = ThreatModel::default();
        let nights: Vec<u32> = (1..=9).filter(|day| model.is_boss_night(*day)).collect();
        assert_eq!(nights, vec![3, 6, 9]);
    }
}
