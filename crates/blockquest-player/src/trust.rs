//! Buddy trust, hint charges, and adaptive grace.
//!
//! Trust is a `[0, 100]` scalar that rises with constructive play (building
//! near home, crafting, surviving nights in a good shelter) and falls when
//! the player gets hurt or rescued. It gates how many hints the buddy can
//! give each day.
//!
//! Adaptive grace softens the game after repeated failure: two or more
//! rescues in a row raise the grace-night counter (which the threat model
//! subtracts from the damage chance) and bank a grace shield that absorbs
//! the next hit. Grace nights tick down at every sunrise that was not itself
//! preceded by a rescue.

use serde::Deserialize;
use tracing::debug;

/// A trust band: at or above `min_trust`, the buddy gets `charges` hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HintBand {
    /// Lowest trust in the band.
    pub min_trust: u32,
    /// Hint charges granted at sunrise.
    pub charges: u32,
}

/// Tuning for the trust system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Trust at the start of a new game.
    pub starting_trust: u32,
    /// Gain for a structural placement near home.
    pub placement_gain: i32,
    /// Chebyshev radius around the anchor that counts as "near home".
    pub placement_radius: u32,
    /// Gain for a successful craft.
    pub craft_gain: i32,
    /// Flat sunrise gain after a night without rescue.
    pub sunrise_base_gain: i32,
    /// Extra sunrise gain per this many shelter-score points.
    pub sunrise_score_divisor: u32,
    /// Loss per threat hit.
    pub damage_penalty: i32,
    /// Loss per rescue.
    pub rescue_penalty: i32,
    /// Hint bands, checked highest first.
    pub hint_bands: Vec<HintBand>,
    /// Below this trust the buddy stays quiet.
    pub hint_min_trust: u32,
    /// Trust needed before the buddy hands over a torch.
    pub torch_gift_min_trust: u32,
    /// A safety below this triggers a hint.
    pub hint_safety_threshold: u32,
    /// A light level below this triggers a hint.
    pub hint_light_threshold: u32,
    /// Fewer torches than this triggers a hint.
    pub low_torch_threshold: u32,
    /// Consecutive rescues that start adaptive grace.
    pub grace_rescue_streak: u32,
    /// Cap on grace nights.
    pub max_grace_nights: u32,
    /// Cap on banked grace shields.
    pub max_grace_shields: u32,
    /// Torches gifted when grace kicks in.
    pub grace_torch_gift: u32,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            starting_trust: 50,
            placement_gain: 2,
            placement_radius: 2,
            craft_gain: 3,
            sunrise_base_gain: 2,
            sunrise_score_divisor: 25,
            damage_penalty: 4,
            rescue_penalty: 12,
            hint_bands: vec![
                HintBand {
                    min_trust: 75,
                    charges: 3,
                },
                HintBand {
                    min_trust: 50,
                    charges: 2,
                },
                HintBand {
                    min_trust: 25,
                    charges: 1,
                },
            ],
            hint_min_trust: 20,
            torch_gift_min_trust: 40,
            hint_safety_threshold: 50,
            hint_light_threshold: 30,
            low_torch_threshold: 2,
            grace_rescue_streak: 2,
            max_grace_nights: 3,
            max_grace_shields: 2,
            grace_torch_gift: 1,
        }
    }
}

impl TrustConfig {
    /// Hint charges for `trust`, from the highest matching band.
    pub fn charges_for(&self, trust: u32) -> u32 {
        self.hint_bands
            .iter()
            .filter(|band| trust >= band.min_trust)
            .map(|band| band.charges)
            .max()
            .unwrap_or(0)
    }
}

/// What the shelter and pack look like when a hint is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintContext {
    /// Current enclosure safety.
    pub safety: u32,
    /// Current light quality.
    pub light: u32,
    /// Torches in the inventory.
    pub torches: u32,
}

/// A delivered hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// The buddy hands over this many torches.
    TorchGift(u32),
    /// The buddy warns that the walls need work.
    PatchWalls,
    /// The buddy warns that the shelter is too dark.
    AddLight,
}

/// What a rescue did to the trust state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescueGrace {
    /// Whether the grace counter went up.
    pub grace_raised: bool,
    /// Torches the buddy gifts to help.
    pub torch_gift: u32,
}

/// Trust, hints, and grace bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustSystem {
    trust: u32,
    hint_charges: u32,
    consecutive_rescues: u32,
    grace_nights: u32,
    grace_shields: u32,
}

impl TrustSystem {
    /// Fresh trust for a new game.
    pub fn new(config: &TrustConfig) -> Self {
        let trust = config.starting_trust.min(100);
        Self {
            trust,
            hint_charges: config.charges_for(trust),
            consecutive_rescues: 0,
            grace_nights: 0,
            grace_shields: 0,
        }
    }

    /// Rebuild from persisted values. Trust is clamped; shields start empty.
    pub fn from_parts(
        trust: u32,
        hint_charges: u32,
        consecutive_rescues: u32,
        grace_nights: u32,
    ) -> Self {
        Self {
            trust: trust.min(100),
            hint_charges,
            consecutive_rescues,
            grace_nights,
            grace_shields: 0,
        }
    }

    /// Current trust.
    pub const fn trust(&self) -> u32 {
        self.trust
    }

    /// Hints left today.
    pub const fn hint_charges(&self) -> u32 {
        self.hint_charges
    }

    /// Rescues since the last clean sunrise.
    pub const fn consecutive_rescues(&self) -> u32 {
        self.consecutive_rescues
    }

    /// Remaining adaptive grace nights.
    pub const fn grace_nights(&self) -> u32 {
        self.grace_nights
    }

    /// Banked grace shields.
    pub const fn grace_shields(&self) -> u32 {
        self.grace_shields
    }

    /// Shift trust by `delta`, clamped to `[0, 100]`. Returns the new trust.
    pub fn adjust(&mut self, delta: i32) -> u32 {
        let next = i64::from(self.trust)
            .saturating_add(i64::from(delta))
            .clamp(0, 100);
        self.trust = u32::try_from(next).unwrap_or(0);
        self.trust
    }

    /// Trust gain for a structural placement; only counts near home.
    pub fn on_placement(&mut self, config: &TrustConfig, near_home: bool) {
        if near_home {
            self.adjust(config.placement_gain);
        }
    }

    /// Trust gain for a successful craft.
    pub fn on_craft(&mut self, config: &TrustConfig) {
        self.adjust(config.craft_gain);
    }

    /// Trust loss for a threat hit.
    pub fn on_damage(&mut self, config: &TrustConfig) {
        self.adjust(config.damage_penalty.saturating_neg());
    }

    /// Record a rescue, possibly starting adaptive grace.
    pub fn on_rescue(&mut self, config: &TrustConfig) -> RescueGrace {
        self.adjust(config.rescue_penalty.saturating_neg());
        self.consecutive_rescues = self.consecutive_rescues.saturating_add(1);

        if self.consecutive_rescues < config.grace_rescue_streak.max(1) {
            return RescueGrace {
                grace_raised: false,
                torch_gift: 0,
            };
        }

        self.grace_nights = self
            .grace_nights
            .saturating_add(1)
            .min(config.max_grace_nights);
        self.grace_shields = self
            .grace_shields
            .saturating_add(1)
            .min(config.max_grace_shields);
        debug!(
            consecutive_rescues = self.consecutive_rescues,
            grace_nights = self.grace_nights,
            grace_shields = self.grace_shields,
            "Adaptive grace raised"
        );
        RescueGrace {
            grace_raised: true,
            torch_gift: config.grace_torch_gift,
        }
    }

    /// Sunrise bookkeeping. Returns the trust gained.
    ///
    /// After a night without rescue: trust grows with shelter quality, the
    /// rescue streak resets, and one grace night is used up. Hint charges are
    /// recomputed from the resulting trust either way.
    pub fn on_sunrise(&mut self, config: &TrustConfig, shelter_score: u32, rescued: bool) -> u32 {
        let before = self.trust;
        if !rescued {
            let score_bonus = shelter_score
                .checked_div(config.sunrise_score_divisor)
                .unwrap_or(0);
            let gain = config
                .sunrise_base_gain
                .saturating_add(i32::try_from(score_bonus).unwrap_or(i32::MAX));
            self.adjust(gain);
            self.consecutive_rescues = 0;
            self.grace_nights = self.grace_nights.saturating_sub(1);
        }
        self.hint_charges = config.charges_for(self.trust);
        self.trust.saturating_sub(before)
    }

    /// Use a banked shield. Returns whether one was available.
    pub const fn consume_shield(&mut self) -> bool {
        if self.grace_shields == 0 {
            return false;
        }
        self.grace_shields = self.grace_shields.saturating_sub(1);
        true
    }

    /// Try to deliver a hint, spending one charge if one is given.
    pub fn deliver_hint(&mut self, config: &TrustConfig, context: HintContext) -> Option<Hint> {
        if self.hint_charges == 0 || self.trust < config.hint_min_trust {
            return None;
        }

        let low_torches = context.torches < config.low_torch_threshold;
        let weak_walls = context.safety < config.hint_safety_threshold;
        let too_dark = context.light < config.hint_light_threshold;

        let hint = if low_torches && self.trust >= config.torch_gift_min_trust {
            Hint::TorchGift(1)
        } else if weak_walls {
            Hint::PatchWalls
        } else if too_dark || low_torches {
            Hint::AddLight
        } else {
            return None;
        };

        self.hint_charges = self.hint_charges.saturating_sub(1);
        Some(hint)
    }
}
