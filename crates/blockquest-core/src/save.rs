//! Text save format.
//!
//! A save is three sections joined by `|`:
//!
//! 1. tile ordinals, comma-separated, row-major;
//! 2. inventory as `KIND:count` tokens joined by `;` (empty when the pack is
//!    empty);
//! 3. comma-separated scalars: 28 required fields followed by the optional
//!    trailing fields `shelter_milestone`, `rescued_this_cycle`, and the
//!    percent-escaped status message.
//!
//! Restoring is a validating parse. Tier, phase, and shelter metrics are
//! written for readability but recomputed from the primary fields on load.
//! Grace shields are session-only and come back as zero.

use blockquest_player::{Inventory, PlayerError, TrustSystem, Vitals};
use blockquest_types::{BlockKind, InputMode, ItemKind, PLACEABLES, StatusTone};
use blockquest_world::{ShelterReport, TileWorld, WorldError};

use crate::clock::{ClockError, DayCycleClock};
use crate::config::GameConfig;
use crate::state::{Counters, EngineState, Status};

/// Required scalar fields, in payload order.
pub const SCALAR_FIELDS: [&str; 28] = [
    "mode",
    "selected",
    "hearts",
    "stars",
    "tier",
    "day",
    "cycle_tick",
    "phase",
    "easy_mode",
    "shelter_score",
    "crafted_this_cycle",
    "boss_event_active",
    "boss_reward_pending",
    "onboarding_complete",
    "nights_survived",
    "boom_sprout_threat",
    "glowmew_gift_moments",
    "sky_wyrm_events",
    "rescued_count",
    "blocks_mined",
    "blocks_placed",
    "gift_cooldown_ticks",
    "night_damage_cooldown",
    "buddy_trust",
    "buddy_hint_charges",
    "consecutive_rescues",
    "adaptive_grace_nights",
    "status_tone",
];

/// Status line used when an older save carries no message.
pub const RESTORED_MESSAGE: &str = "Welcome back!";

const SECTION_SEPARATOR: char = '|';

/// Errors that can occur while restoring a save.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// The payload does not have exactly three sections.
    #[error("expected 3 sections, found {found}")]
    SectionCount {
        /// Sections present.
        found: usize,
    },

    /// A tile token is not a known block ordinal.
    #[error("tile {index} has invalid ordinal {token:?}")]
    BadTile {
        /// Row-major tile index.
        index: usize,
        /// The offending token.
        token: String,
    },

    /// An inventory token is malformed, unknown, or zero.
    #[error("invalid inventory token {0:?}")]
    BadInventoryToken(String),

    /// Fewer than the 28 required scalars.
    #[error("expected at least {expected} scalar fields, found {found}")]
    ScalarCount {
        /// Required count.
        expected: usize,
        /// Fields present.
        found: usize,
    },

    /// A scalar is not a non-negative integer.
    #[error("field {field} is not a number: {value:?}")]
    BadScalar {
        /// Field name.
        field: &'static str,
        /// Raw text.
        value: String,
    },

    /// A scalar parsed but is outside its allowed range.
    #[error("field {field} is out of range: {value}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Parsed value.
        value: u32,
    },

    /// The tiles do not fit the configured grid.
    #[error("world rejected: {0}")]
    World(#[from] WorldError),

    /// The inventory could not be rebuilt.
    #[error("inventory rejected: {0}")]
    Player(#[from] PlayerError),

    /// Day or cycle tick do not fit the configured cycle.
    #[error("clock rejected: {0}")]
    Clock(#[from] ClockError),
}

/// Serializer and validating parser for the save payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveCodec;

impl SaveCodec {
    /// Encode `state` as a save payload.
    pub fn serialize(state: &EngineState, config: &GameConfig) -> String {
        let tiles = state
            .world
            .tiles()
            .iter()
            .map(|block| block.ordinal().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let inventory = state
            .inventory
            .iter()
            .map(|(item, count)| format!("{}:{count}", item.token()))
            .collect::<Vec<_>>()
            .join(";");

        let counters = &state.counters;
        let scalars: [u32; 28] = [
            u32::from(state.mode.ordinal()),
            u32::try_from(state.selected).unwrap_or(0),
            state.vitals.hearts,
            state.vitals.stars,
            state.unlock_tier(config),
            state.clock.day(),
            state.clock.cycle_tick(),
            u32::from(state.clock.phase().ordinal()),
            u32::from(state.easy_mode),
            state.shelter.score,
            u32::from(state.crafted_this_cycle),
            u32::from(state.boss_active),
            u32::from(state.boss_reward_pending),
            u32::from(state.onboarding_complete),
            counters.nights_survived,
            counters.boom_sprout_threat,
            counters.glowmew_gift_moments,
            counters.sky_wyrm_events,
            counters.rescued_count,
            counters.blocks_mined,
            counters.blocks_placed,
            state.gift_cooldown,
            state.night_damage_cooldown,
            state.trust.trust(),
            state.trust.hint_charges(),
            state.trust.consecutive_rescues(),
            state.trust.grace_nights(),
            u32::from(state.status.tone.ordinal()),
        ];
        let mut fields: Vec<String> = scalars.iter().map(ToString::to_string).collect();
        fields.push(u32::from(state.shelter_milestone).to_string());
        fields.push(u32::from(state.rescued_this_cycle).to_string());
        fields.push(escape_message(&state.status.message));

        format!("{tiles}{SECTION_SEPARATOR}{inventory}{SECTION_SEPARATOR}{}", fields.join(","))
    }

    /// Decode and validate a save payload against `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SaveError`] found. Nothing is partially applied.
    pub fn restore(text: &str, config: &GameConfig) -> Result<EngineState, SaveError> {
        let sections: Vec<&str> = text
            .trim_end_matches(['\n', '\r'])
            .split(SECTION_SEPARATOR)
            .collect();
        let [tile_section, inventory_section, scalar_section] = sections.as_slice() else {
            return Err(SaveError::SectionCount {
                found: sections.len(),
            });
        };

        let world = parse_tiles(tile_section, config)?;
        let inventory = parse_inventory(inventory_section)?;

        let raw: Vec<&str> = scalar_section.split(',').collect();
        if raw.len() < SCALAR_FIELDS.len() {
            return Err(SaveError::ScalarCount {
                expected: SCALAR_FIELDS.len(),
                found: raw.len(),
            });
        }
        let mut fields = ScalarReader::new(&raw);

        let mode = fields.ordinal(InputMode::from_ordinal)?;
        let selected = fields.bounded(len_u32(PLACEABLES.len()).saturating_sub(1))?;
        let hearts = fields.number()?;
        if hearts == 0 || hearts > config.player.max_hearts {
            return Err(SaveError::OutOfRange {
                field: "hearts",
                value: hearts,
            });
        }
        let stars = fields.number()?;
        let _tier = fields.number()?;
        let day = fields.number()?;
        let cycle_tick = fields.number()?;
        let _phase = fields.bounded(3)?;
        let easy_mode = fields.flag()?;
        let _shelter_score = fields.bounded(100)?;
        let crafted_this_cycle = fields.flag()?;
        let boss_active = fields.flag()?;
        let boss_reward_pending = fields.flag()?;
        let onboarding_complete = fields.flag()?;
        let counters = Counters {
            nights_survived: fields.number()?,
            boom_sprout_threat: fields.number()?,
            glowmew_gift_moments: fields.number()?,
            sky_wyrm_events: fields.number()?,
            rescued_count: fields.number()?,
            blocks_mined: fields.number()?,
            blocks_placed: fields.number()?,
        };
        let gift_cooldown = fields.number()?;
        let night_damage_cooldown = fields.number()?;
        let trust = fields.bounded(100)?;
        let hint_charges = fields.bounded(config.trust.charges_for(100))?;
        let consecutive_rescues = fields.number()?;
        let grace_nights = fields.bounded(config.trust.max_grace_nights)?;
        let tone = fields.ordinal(StatusTone::from_ordinal)?;

        let shelter_milestone = fields.optional_flag("shelter_milestone")?.unwrap_or(false);
        let rescued_this_cycle = fields.optional_flag("rescued_this_cycle")?.unwrap_or(false);
        let message = fields
            .rest()
            .map_or_else(|| RESTORED_MESSAGE.to_owned(), unescape_message);

        let clock = DayCycleClock::from_parts(day, cycle_tick, &config.cycle)?;

        Ok(EngineState {
            world,
            inventory,
            clock,
            vitals: Vitals { hearts, stars },
            trust: TrustSystem::from_parts(trust, hint_charges, consecutive_rescues, grace_nights),
            mode,
            selected: usize::try_from(selected).unwrap_or(0),
            easy_mode,
            shelter: ShelterReport::default(),
            crafted_this_cycle,
            boss_active,
            boss_reward_pending,
            onboarding_complete,
            shelter_milestone,
            rescued_this_cycle,
            counters,
            gift_cooldown,
            night_damage_cooldown,
            status: Status::new(tone, message),
        })
    }
}

fn parse_tiles(section: &str, config: &GameConfig) -> Result<TileWorld, SaveError> {
    let tiles = section
        .split(',')
        .enumerate()
        .map(|(index, token)| {
            token
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(BlockKind::from_ordinal)
                .ok_or_else(|| SaveError::BadTile {
                    index,
                    token: token.to_owned(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TileWorld::from_tiles(config.world.width, config.world.height, tiles)?)
}

fn parse_inventory(section: &str) -> Result<Inventory, SaveError> {
    if section.trim().is_empty() {
        return Ok(Inventory::new());
    }
    let entries = section
        .split(';')
        .map(|token| {
            let bad = || SaveError::BadInventoryToken(token.to_owned());
            let (kind, count) = token.split_once(':').ok_or_else(bad)?;
            let item = ItemKind::from_token(kind.trim()).ok_or_else(bad)?;
            let count = count.trim().parse::<u32>().map_err(|_err| bad())?;
            if count == 0 {
                return Err(bad());
            }
            Ok((item, count))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Inventory::from_entries(entries)?)
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Walks the scalar fields in order, naming each one in its errors.
struct ScalarReader<'a> {
    raw: &'a [&'a str],
    position: usize,
}

impl<'a> ScalarReader<'a> {
    const fn new(raw: &'a [&'a str]) -> Self {
        Self { raw, position: 0 }
    }

    fn name(&self) -> &'static str {
        SCALAR_FIELDS.get(self.position).copied().unwrap_or("trailing")
    }

    fn take(&mut self) -> Option<&'a str> {
        let value = self.raw.get(self.position).copied();
        self.position = self.position.saturating_add(1);
        value
    }

    fn parse(&mut self, field: &'static str) -> Result<Option<u32>, SaveError> {
        let Some(value) = self.take() else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_err| SaveError::BadScalar {
                field,
                value: value.to_owned(),
            })
    }

    fn number(&mut self) -> Result<u32, SaveError> {
        let field = self.name();
        self.parse(field)?.ok_or(SaveError::ScalarCount {
            expected: SCALAR_FIELDS.len(),
            found: self.raw.len(),
        })
    }

    fn bounded(&mut self, max: u32) -> Result<u32, SaveError> {
        let field = self.name();
        let value = self.number()?;
        if value > max {
            return Err(SaveError::OutOfRange { field, value });
        }
        Ok(value)
    }

    fn flag(&mut self) -> Result<bool, SaveError> {
        Ok(self.bounded(1)? == 1)
    }

    fn ordinal<T>(&mut self, decode: impl Fn(u8) -> Option<T>) -> Result<T, SaveError> {
        let field = self.name();
        let value = self.number()?;
        u8::try_from(value)
            .ok()
            .and_then(decode)
            .ok_or(SaveError::OutOfRange { field, value })
    }

    fn optional_flag(&mut self, field: &'static str) -> Result<Option<bool>, SaveError> {
        match self.parse(field)? {
            None => Ok(None),
            Some(value @ 0..=1) => Ok(Some(value == 1)),
            Some(value) => Err(SaveError::OutOfRange { field, value }),
        }
    }

    /// The status message field, if present. Anything after it is ignored.
    fn rest(&mut self) -> Option<&'a str> {
        self.take()
    }
}

/// Percent-escape the characters that would break the payload structure.
pub fn escape_message(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for ch in message.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            ',' => escaped.push_str("%2C"),
            '|' => escaped.push_str("%7C"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Inverse of [`escape_message`]. Unknown escapes are kept as written.
pub fn unescape_message(escaped: &str) -> String {
    let mut message = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('%') {
        let (head, tail) = rest.split_at(pos);
        message.push_str(head);
        let decoded = match tail.get(1..3) {
            Some("25") => Some('%'),
            Some("2C" | "2c") => Some(','),
            Some("7C" | "7c") => Some('|'),
            _ => None,
        };
        if let Some(ch) = decoded {
            message.push(ch);
            rest = tail.get(3..).unwrap_or_default();
        } else {
            message.push('%');
            rest = tail.get(1..).unwrap_or_default();
        }
    }
    message.push_str(rest);
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn played_state(config: &GameConfig) -> EngineState {
        let mut state = EngineState::fresh(config).unwrap();
        state.world.mine(1, 6).unwrap();
        state.inventory.add(ItemKind::Wood, 3).unwrap();
        state.inventory.add(ItemKind::Torch, 2).unwrap();
        state.clock = DayCycleClock::from_parts(4, 123, &config.cycle).unwrap();
        state.vitals = Vitals { hearts: 2, stars: 5 };
        state.trust = TrustSystem::from_parts(81, 3, 1, 2);
        state.mode = InputMode::Place;
        state.selected = 4;
        state.easy_mode = true;
        state.crafted_this_cycle = true;
        state.boss_active = true;
        state.boss_reward_pending = true;
        state.onboarding_complete = true;
        state.shelter_milestone = true;
        state.rescued_this_cycle = true;
        state.counters = Counters {
            nights_survived: 3,
            boom_sprout_threat: 2,
            glowmew_gift_moments: 7,
            sky_wyrm_events: 1,
            rescued_count: 1,
            blocks_mined: 12,
            blocks_placed: 9,
        };
        state.gift_cooldown = 17;
        state.night_damage_cooldown = 6;
        state.status = Status::new(StatusTone::Celebrate, "50% done, keep going | you rock");
        state
    }

    #[test]
    fn round_trip_keeps_persisted_fields() {
        let config = GameConfig::default();
        let state = played_state(&config);
        let payload = SaveCodec::serialize(&state, &config);
        let restored = SaveCodec::restore(&payload, &config).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn payload_layout() {
        let config = GameConfig::default();
        let state = EngineState::fresh(&config).unwrap();
        let payload = SaveCodec::serialize(&state, &config);
        let sections: Vec<&str> = payload.split('|').collect();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].split(',').count(), 120);
        assert_eq!(sections[1], "DIRT:8;STONE:2");
        let scalars: Vec<&str> = sections[2].split(',').collect();
        assert_eq!(scalars.len(), 31);
        // mode, selected, hearts, stars, tier, day, cycle tick, phase
        assert_eq!(&scalars[..8], &["0", "0", "3", "0", "1", "1", "0", "0"]);
    }

    #[test]
    fn grace_shields_are_not_persisted() {
        let config = GameConfig::default();
        let mut state = EngineState::fresh(&config).unwrap();
        state.trust.on_rescue(&config.trust);
        state.trust.on_rescue(&config.trust);
        assert_eq!(state.trust.grace_shields(), 1);
        let restored =
            SaveCodec::restore(&SaveCodec::serialize(&state, &config), &config).unwrap();
        assert_eq!(restored.trust.grace_shields(), 0);
        assert_eq!(restored.trust.grace_nights(), 1);
    }

    #[test]
    fn missing_trailing_fields_use_defaults() {
        let config = GameConfig::default();
        let state = played_state(&config);
        let payload = SaveCodec::serialize(&state, &config);
        let legacy: Vec<&str> = payload.rsplitn(2, '|').collect();
        let scalars: Vec<&str> = legacy[0].split(',').take(28).collect();
        let truncated = format!("{}|{}", legacy[1], scalars.join(","));

        let restored = SaveCodec::restore(&truncated, &config).unwrap();
        assert!(!restored.shelter_milestone);
        assert!(!restored.rescued_this_cycle);
        assert_eq!(restored.status.message, RESTORED_MESSAGE);
        assert_eq!(restored.status.tone, StatusTone::Celebrate);
        assert_eq!(restored.counters, state.counters);
    }

    #[test]
    fn extra_trailing_fields_ignored() {
        let config = GameConfig::default();
        let state = played_state(&config);
        let payload = format!("{},9,9,9", SaveCodec::serialize(&state, &config));
        assert_eq!(SaveCodec::restore(&payload, &config).unwrap(), state);
    }

    #[test]
    fn truncated_payload_rejected() {
        let config = GameConfig::default();
        let state = played_state(&config);
        let payload = SaveCodec::serialize(&state, &config);
        let cut = payload.get(..payload.len() / 2).unwrap();
        assert!(SaveCodec::restore(cut, &config).is_err());
        assert!(SaveCodec::restore("", &config).is_err());
        assert!(matches!(
            SaveCodec::restore("garbage", &config),
            Err(SaveError::SectionCount { found: 1 })
        ));
    }

    fn with_scalar(payload: &str, index: usize, value: &str) -> String {
        let (head, scalars) = payload.rsplit_once('|').unwrap();
        let mut fields: Vec<&str> = scalars.split(',').collect();
        fields[index] = value;
        format!("{head}|{}", fields.join(","))
    }

    #[test]
    fn out_of_range_scalars_rejected() {
        let config = GameConfig::default();
        let payload = SaveCodec::serialize(&played_state(&config), &config);
        let cases = [
            (0, "2"),   // mode
            (1, "5"),   // selected
            (2, "0"),   // hearts
            (2, "4"),   // hearts above max
            (5, "0"),   // day
            (6, "180"), // cycle tick
            (7, "4"),   // phase
            (8, "2"),   // easy mode flag
            (23, "101"), // trust
            (24, "999"), // hint charges above the top band
            (26, "4"),  // grace nights above the cap
            (26, "1000"), // grace nights
            (27, "5"),  // tone
            (28, "3"),  // shelter milestone flag
            (3, "-1"),  // stars
            (14, "x"),  // nights survived
        ];
        for (index, value) in cases {
            let broken = with_scalar(&payload, index, value);
            assert!(
                SaveCodec::restore(&broken, &config).is_err(),
                "field {index} = {value} should be rejected"
            );
        }
    }

    #[test]
    fn bad_tiles_rejected() {
        let config = GameConfig::default();
        let payload = SaveCodec::serialize(&played_state(&config), &config);
        let bad_ordinal = payload.replacen("3,", "7,", 1);
        assert!(matches!(
            SaveCodec::restore(&bad_ordinal, &config),
            Err(SaveError::BadTile { .. })
        ));

        let short = payload.replacen("0,", "", 1);
        assert!(matches!(
            SaveCodec::restore(&short, &config),
            Err(SaveError::World(WorldError::TileCountMismatch { .. }))
        ));
    }

    #[test]
    fn bad_inventory_rejected() {
        let config = GameConfig::default();
        let payload = SaveCodec::serialize(&EngineState::fresh(&config).unwrap(), &config);
        for replacement in ["GOLD:3;STONE:2", "DIRT:0;STONE:2", "DIRT;STONE:2", "DIRT:-1"] {
            let broken = payload.replacen("DIRT:8;STONE:2", replacement, 1);
            assert!(
                matches!(
                    SaveCodec::restore(&broken, &config),
                    Err(SaveError::BadInventoryToken(_))
                ),
                "{replacement} should be rejected"
            );
        }
    }

    #[test]
    fn empty_inventory_round_trips() {
        let config = GameConfig::default();
        let mut state = EngineState::fresh(&config).unwrap();
        state.inventory = Inventory::new();
        let payload = SaveCodec::serialize(&state, &config);
        assert!(payload.contains("||"));
        assert!(SaveCodec::restore(&payload, &config).unwrap().inventory.is_empty());
    }

    #[test]
    fn message_escaping() {
        let message = "100%, done|really %2C";
        let escaped = escape_message(message);
        assert!(!escaped.contains(','));
        assert!(!escaped.contains('|'));
        assert_eq!(unescape_message(&escaped), message);
        assert_eq!(unescape_message("50%"), "50%");
        assert_eq!(unescape_message("%zz"), "%zz");
    }
}
