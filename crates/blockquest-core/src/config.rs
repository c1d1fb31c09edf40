//! Configuration loading and typed config structures for Block Quest.
//!
//! The canonical configuration lives in `blockquest-config.yaml` at the
//! project root. Every section is optional: anything left out falls back to
//! the reference tuning, so an empty file (or no file at all) plays the
//! standard game.
//!
//! Environment override, applied by [`GameConfig::from_file`] only:
//! - `BLOCKQUEST_EASY_MODE=1` (or `true`) starts new games in easy mode.

use std::collections::BTreeMap;
use std::path::Path;

use blockquest_player::{TrustConfig, VitalsConfig};
use blockquest_types::ItemKind;
use blockquest_world::{MIN_WORLD_SIDE, ShelterConfig};
use serde::Deserialize;

/// Environment variable that forces easy mode for new games.
pub const EASY_MODE_ENV: &str = "BLOCKQUEST_EASY_MODE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but do not describe a playable game.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `blockquest-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Grid size, home anchor, and starting pack.
    #[serde(default)]
    pub world: WorldConfig,

    /// Day/night phase lengths.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Hearts, stars, and unlock tiers.
    #[serde(default)]
    pub player: VitalsConfig,

    /// Shelter evaluator weights.
    #[serde(default)]
    pub shelter: ShelterConfig,

    /// Night threat tuning.
    #[serde(default)]
    pub threat: ThreatConfig,

    /// Buddy trust, hints, and adaptive grace.
    #[serde(default)]
    pub trust: TrustConfig,

    /// Star rewards and mining yields.
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Glowmew gift cadence.
    #[serde(default)]
    pub companion: CompanionConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path, then apply
    /// the environment override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. The environment is not read.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as null rather than an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width < MIN_WORLD_SIDE || world.height < MIN_WORLD_SIDE {
            return Err(invalid(format!(
                "world must be at least {MIN_WORLD_SIDE}x{MIN_WORLD_SIDE}, got {}x{}",
                world.width, world.height
            )));
        }
        let (ax, ay) = world.anchor();
        if ax >= world.width || ay >= world.height {
            return Err(invalid(format!(
                "anchor ({ax}, {ay}) is outside the {}x{} world",
                world.width, world.height
            )));
        }
        if let Some((item, _)) = world.starting_inventory.iter().find(|(_, count)| **count == 0) {
            return Err(invalid(format!("starting inventory lists {item:?} with a zero count")));
        }

        let cycle = &self.cycle;
        if cycle.day_ticks == 0 || cycle.dusk_ticks == 0 || cycle.night_ticks == 0 || cycle.dawn_ticks == 0 {
            return Err(invalid("every phase must last at least one tick".to_owned()));
        }
        if cycle.cycle_length().is_none() {
            return Err(invalid("cycle length overflows".to_owned()));
        }

        if self.player.max_hearts == 0 {
            return Err(invalid("player.max_hearts must be at least 1".to_owned()));
        }

        let threat = &self.threat;
        if threat.min_chance > threat.max_chance || threat.max_chance > 100 {
            return Err(invalid(format!(
                "threat chance bounds must satisfy min <= max <= 100, got {}..={}",
                threat.min_chance, threat.max_chance
            )));
        }
        if threat.boss_every_days == 0 {
            return Err(invalid("threat.boss_every_days must be at least 1".to_owned()));
        }

        if self.companion.gift_interval == 0 || self.companion.easy_gift_interval == 0 {
            return Err(invalid("gift intervals must be at least 1 tick".to_owned()));
        }
        Ok(())
    }

    /// Gift interval for the given difficulty.
    pub const fn gift_interval(&self, easy_mode: bool) -> u32 {
        if easy_mode {
            self.companion.easy_gift_interval
        } else {
            self.companion.gift_interval
        }
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

/// Grid size, home anchor, and new-game setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Columns in the grid.
    pub width: u32,
    /// Rows in the grid (row 0 is the sky).
    pub height: u32,
    /// Home anchor column. Defaults to `width / 2`.
    pub anchor_x: Option<u32>,
    /// Home anchor row.
    pub anchor_y: u32,
    /// Items held at the start of a new game.
    pub starting_inventory: BTreeMap<ItemKind, u32>,
    /// Whether new games start in easy mode.
    pub easy_mode: bool,
}

impl WorldConfig {
    /// The home anchor as `(x, y)`.
    pub fn anchor(&self) -> (u32, u32) {
        let x = self
            .anchor_x
            .unwrap_or_else(|| self.width.checked_div(2).unwrap_or(0));
        (x, self.anchor_y)
    }

    /// Apply `BLOCKQUEST_EASY_MODE` if set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_easy_mode_override(std::env::var(EASY_MODE_ENV).ok().as_deref());
    }

    /// Apply an easy mode flag value. Unrecognised values are ignored.
    pub fn apply_easy_mode_override(&mut self, value: Option<&str>) {
        let Some(val) = value.map(str::trim) else {
            return;
        };
        if val == "1" || val.eq_ignore_ascii_case("true") {
            self.easy_mode = true;
        } else if val == "0" || val.eq_ignore_ascii_case("false") {
            self.easy_mode = false;
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 10,
            anchor_x: None,
            anchor_y: 2,
            starting_inventory: BTreeMap::from([(ItemKind::Dirt, 8), (ItemKind::Stone, 2)]),
            easy_mode: false,
        }
    }
}

/// Phase lengths in ticks. A cycle runs DAY, DUSK, NIGHT, DAWN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Ticks of daylight.
    pub day_ticks: u32,
    /// Ticks of dusk.
    pub dusk_ticks: u32,
    /// Ticks of night.
    pub night_ticks: u32,
    /// Ticks of dawn.
    pub dawn_ticks: u32,
}

impl CycleConfig {
    /// Total ticks in one cycle, or `None` on overflow.
    pub fn cycle_length(&self) -> Option<u32> {
        self.day_ticks
            .checked_add(self.dusk_ticks)?
            .checked_add(self.night_ticks)?
            .checked_add(self.dawn_ticks)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            day_ticks: 80,
            dusk_ticks: 20,
            night_ticks: 60,
            dawn_ticks: 20,
        }
    }
}

/// A shelter-score band: at or above `min_score`, the base chance is `chance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScoreBand {
    /// Lowest shelter score in the band.
    pub min_score: u32,
    /// Base damage chance in percent.
    pub chance: u32,
}

/// Night threat tuning. All chances are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Base chance by shelter score, checked highest band first.
    pub score_bands: Vec<ScoreBand>,
    /// Base chance when the score is below every band.
    pub fallback_chance: u32,
    /// Added per day survived past the first.
    pub per_day: u32,
    /// Days counted toward `per_day`.
    pub day_cap: u32,
    /// Added per point of accumulated threat.
    pub per_threat: u32,
    /// Threat points counted toward `per_threat`.
    pub threat_cap: u32,
    /// Added while the sky wyrm is out.
    pub boss_bonus: u32,
    /// Removed in easy mode.
    pub easy_relief: u32,
    /// Removed during the first days.
    pub early_day_relief: u32,
    /// Last day that gets `early_day_relief`.
    pub early_day_limit: u32,
    /// Removed per adaptive grace night.
    pub grace_relief: u32,
    /// Lowest possible chance.
    pub min_chance: u32,
    /// Highest possible chance.
    pub max_chance: u32,
    /// Ticks between checks in normal mode.
    pub cooldown_ticks: u32,
    /// Ticks between checks in easy mode.
    pub easy_cooldown_ticks: u32,
    /// Days per tick shaved off the cooldown.
    pub cooldown_day_divisor: u32,
    /// Most ticks ever shaved off the cooldown.
    pub cooldown_max_reduction: u32,
    /// Shortest cooldown.
    pub cooldown_floor: u32,
    /// The sky wyrm comes out on days divisible by this.
    pub boss_every_days: u32,
    /// Shelter score that earns the boss reward.
    pub boss_reward_score: u32,
    /// Threat added when night falls.
    pub nightfall_threat: u32,
    /// Threat added per hit.
    pub hit_threat: u32,
    /// Threat removed at sunrise.
    pub sunrise_decay: u32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            score_bands: vec![
                ScoreBand {
                    min_score: 80,
                    chance: 6,
                },
                ScoreBand {
                    min_score: 60,
                    chance: 14,
                },
                ScoreBand {
                    min_score: 40,
                    chance: 26,
                },
                ScoreBand {
                    min_score: 20,
                    chance: 40,
                },
            ],
            fallback_chance: 55,
            per_day: 2,
            day_cap: 10,
            per_threat: 3,
            threat_cap: 10,
            boss_bonus: 12,
            easy_relief: 15,
            early_day_relief: 10,
            early_day_limit: 2,
            grace_relief: 8,
            min_chance: 4,
            max_chance: 75,
            cooldown_ticks: 10,
            easy_cooldown_ticks: 14,
            cooldown_day_divisor: 3,
            cooldown_max_reduction: 4,
            cooldown_floor: 4,
            boss_every_days: 3,
            boss_reward_score: 60,
            nightfall_threat: 1,
            hit_threat: 1,
            sunrise_decay: 1,
        }
    }
}

/// Star rewards and mining yields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// Stars for a night survived without rescue.
    pub night_stars: u32,
    /// Extra star for crafting during the cycle.
    pub craft_bonus_stars: u32,
    /// Stars for holding out against the sky wyrm.
    pub boss_stars: u32,
    /// Stone yields a bonus crystal when `(x + y + day + tick) % this == 0`.
    pub crystal_bonus_modulus: u32,
    /// Stone yielded per mine while holding a pickaxe.
    pub pickaxe_stone_yield: u32,
    /// Unlock tier at which torches become placeable.
    pub torch_unlock_tier: u32,
    /// Safety that latches the shelter milestone.
    pub shelter_milestone_safety: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            night_stars: 1,
            craft_bonus_stars: 1,
            boss_stars: 3,
            crystal_bonus_modulus: 5,
            pickaxe_stone_yield: 2,
            torch_unlock_tier: 2,
            shelter_milestone_safety: 45,
        }
    }
}

/// Glowmew gift cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Gift cooldown at the start of a new game.
    pub first_gift_ticks: u32,
    /// Ticks between gifts in normal mode.
    pub gift_interval: u32,
    /// Ticks between gifts in easy mode.
    pub easy_gift_interval: u32,
    /// Items per gift.
    pub gift_amount: u32,
    /// Items per gift when trust is at least `generous_trust`.
    pub generous_amount: u32,
    /// Trust that makes gifts generous.
    pub generous_trust: u32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            first_gift_ticks: 12,
            gift_interval: 24,
            easy_gift_interval: 18,
            gift_amount: 1,
            generous_amount: 2,
            generous_trust: 75,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.anchor(), (6, 2));
        assert_eq!(config.cycle.cycle_length(), Some(180));
        assert_eq!(config.player.max_hearts, 3);
        assert_eq!(config.threat.max_chance, 75);
        assert_eq!(config.trust.starting_trust, 50);
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
world:
  width: 16
  starting_inventory:
    WOOD: 4
cycle:
  night_ticks: 30
threat:
  boss_every_days: 2
";
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.world.width, 16);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.world.anchor(), (8, 2));
        assert_eq!(config.world.starting_inventory.get(&ItemKind::Wood), Some(&4));
        assert_eq!(config.cycle.cycle_length(), Some(150));
        assert_eq!(config.threat.boss_every_days, 2);
        assert_eq!(config.threat.min_chance, 4);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(GameConfig::parse("").is_ok());
    }

    #[test]
    fn parse_keeps_the_yaml_easy_mode() {
        assert!(!GameConfig::parse("").unwrap().world.easy_mode);
        let config = GameConfig::parse("world:\n  easy_mode: true\n").unwrap();
        assert!(config.world.easy_mode);
    }

    #[test]
    fn easy_mode_override_values() {
        let mut world = WorldConfig::default();
        world.apply_easy_mode_override(Some(" TRUE "));
        assert!(world.easy_mode);
        world.apply_easy_mode_override(Some("maybe"));
        assert!(world.easy_mode);
        world.apply_easy_mode_override(None);
        assert!(world.easy_mode);
        world.apply_easy_mode_override(Some("0"));
        assert!(!world.easy_mode);
    }

    #[test]
    fn zero_phase_rejected() {
        let result = GameConfig::parse("cycle:\n  dusk_ticks: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn tiny_world_rejected() {
        let result = GameConfig::parse("world:\n  width: 3\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn anchor_outside_world_rejected() {
        let result = GameConfig::parse("world:\n  anchor_x: 40\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn inverted_chance_bounds_rejected() {
        let result = GameConfig::parse("threat:\n  min_chance: 80\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = GameConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("blockquest-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
