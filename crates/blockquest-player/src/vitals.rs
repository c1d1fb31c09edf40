//! Hearts, stars, and the rescue rule.
//!
//! Hearts live in `[1, max_hearts]` between operations. A hit that would
//! take the last heart triggers a rescue instead: hearts refill, one star is
//! forfeited (never below zero), and the caller is told so it can update its
//! counters and trust.

use serde::Deserialize;

/// Tuning for hearts and stars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    /// Heart capacity (default: 3).
    pub max_hearts: u32,
    /// Hearts lost per threat hit (default: 1).
    pub damage_per_hit: u32,
    /// Hearts restored at sunrise (default: 1).
    pub sunrise_heal: u32,
    /// Stars forfeited on rescue (default: 1).
    pub rescue_star_penalty: u32,
    /// Stars per unlock tier (default: 4).
    pub stars_per_tier: u32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            max_hearts: 3,
            damage_per_hit: 1,
            sunrise_heal: 1,
            rescue_star_penalty: 1,
            stars_per_tier: 4,
        }
    }
}

/// What a threat hit did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Hearts dropped but the player is still standing.
    Hurt {
        /// Hearts remaining.
        hearts_left: u32,
    },
    /// Hearts ran out and the player was rescued.
    Rescued {
        /// Stars actually lost (may be less than the penalty at zero stars).
        stars_lost: u32,
    },
}

/// Hearts and stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    /// Current hearts.
    pub hearts: u32,
    /// Stars earned.
    pub stars: u32,
}

impl Vitals {
    /// Full hearts, no stars.
    pub const fn new(config: &VitalsConfig) -> Self {
        Self {
            hearts: config.max_hearts,
            stars: 0,
        }
    }

    /// Unlock tier: `1 + stars / stars_per_tier`.
    pub const fn unlock_tier(&self, config: &VitalsConfig) -> u32 {
        let per_tier = if config.stars_per_tier == 0 {
            1
        } else {
            config.stars_per_tier
        };
        // per_tier >= 1, so the division cannot fail.
        match self.stars.checked_div(per_tier) {
            Some(tier) => tier.saturating_add(1),
            None => 1,
        }
    }

    /// Apply one threat hit.
    pub fn take_hit(&mut self, config: &VitalsConfig) -> HitOutcome {
        self.hearts = self.hearts.saturating_sub(config.damage_per_hit);
        if self.hearts == 0 {
            let stars_lost = self.rescue(config);
            HitOutcome::Rescued { stars_lost }
        } else {
            HitOutcome::Hurt {
                hearts_left: self.hearts,
            }
        }
    }

    /// Refill hearts and forfeit stars. Returns the stars actually lost.
    pub fn rescue(&mut self, config: &VitalsConfig) -> u32 {
        self.hearts = config.max_hearts.max(1);
        let before = self.stars;
        self.stars = self.stars.saturating_sub(config.rescue_star_penalty);
        before.saturating_sub(self.stars)
    }

    /// Sunrise heal, capped at `max_hearts`.
    pub fn heal(&mut self, config: &VitalsConfig) {
        self.hearts = self
            .hearts
            .saturating_add(config.sunrise_heal)
            .min(config.max_hearts.max(1));
    }

    /// Add stars.
    pub const fn award_stars(&mut self, stars: u32) {
        self.stars = self.stars.saturating_add(stars);
    }
}
