//! Engine state and its read-only snapshot.
//!
//! [`EngineState`] is everything the game needs to continue: the grid, the
//! pack, the clock, hearts and stars, trust, and the bookkeeping counters.
//! The engine owns it exclusively. Hosts only ever see an
//! [`EngineSnapshot`], an owned copy that serializes to JSON.

use std::collections::BTreeMap;

use blockquest_player::{Inventory, TrustSystem, Vitals};
use blockquest_types::{InputMode, ItemKind, PLACEABLES, Phase, StatusTone};
use blockquest_world::{ShelterReport, TileWorld, create_starting_world};
use serde::Serialize;

use crate::clock::DayCycleClock;
use crate::config::GameConfig;
use crate::error::EngineError;

/// Status line shown on a brand-new game.
pub const NEW_GAME_MESSAGE: &str = "Build a cozy shelter before night!";

/// Lifetime counters. Only `boom_sprout_threat` ever goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counters {
    /// Nights survived without a rescue.
    pub nights_survived: u32,
    /// Accumulated Boom Sprout threat. Rises each night and on hits,
    /// decays at sunrise.
    pub boom_sprout_threat: u32,
    /// Gifts brought by Glowmew.
    pub glowmew_gift_moments: u32,
    /// Nights the sky wyrm came out.
    pub sky_wyrm_events: u32,
    /// Times the player was rescued.
    pub rescued_count: u32,
    /// Blocks mined.
    pub blocks_mined: u32,
    /// Blocks placed.
    pub blocks_placed: u32,
}

/// Last user-facing feedback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Status {
    /// Mood, for coloring.
    pub tone: StatusTone,
    /// Text.
    pub message: String,
}

impl Status {
    /// Build a status line.
    pub fn new(tone: StatusTone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
        }
    }
}

/// Complete mutable game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    /// The tile grid.
    pub world: TileWorld,
    /// The player's pack.
    pub inventory: Inventory,
    /// Day number and cycle position.
    pub clock: DayCycleClock,
    /// Hearts and stars.
    pub vitals: Vitals,
    /// Buddy trust, hints, and grace.
    pub trust: TrustSystem,
    /// What a tap does.
    pub mode: InputMode,
    /// Index into [`PLACEABLES`] of the selected item.
    pub selected: usize,
    /// Easy mode.
    pub easy_mode: bool,
    /// Latest shelter evaluation. Derived.
    pub shelter: ShelterReport,
    /// The player crafted something since the last sunrise.
    pub crafted_this_cycle: bool,
    /// The sky wyrm is out tonight.
    pub boss_active: bool,
    /// The shelter held up well enough against the sky wyrm.
    pub boss_reward_pending: bool,
    /// Mined, placed, and built a safe shelter at least once.
    pub onboarding_complete: bool,
    /// Shelter safety has reached the milestone at least once.
    pub shelter_milestone: bool,
    /// A rescue happened since the last sunrise.
    pub rescued_this_cycle: bool,
    /// Lifetime counters.
    pub counters: Counters,
    /// Day ticks until Glowmew's next gift.
    pub gift_cooldown: u32,
    /// Night ticks until the next threat probe.
    pub night_damage_cooldown: u32,
    /// Last feedback line.
    pub status: Status,
}

impl EngineState {
    /// State for a brand-new game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configured world, clock, or starting
    /// inventory cannot be built.
    pub fn fresh(config: &GameConfig) -> Result<Self, EngineError> {
        let world = create_starting_world(config.world.width, config.world.height)?;
        let inventory = Inventory::from_entries(
            config
                .world
                .starting_inventory
                .iter()
                .map(|(item, count)| (*item, *count)),
        )?;
        let clock = DayCycleClock::new(&config.cycle)?;

        Ok(Self {
            world,
            inventory,
            clock,
            vitals: Vitals::new(&config.player),
            trust: TrustSystem::new(&config.trust),
            mode: InputMode::Mine,
            selected: 0,
            easy_mode: config.world.easy_mode,
            shelter: ShelterReport::default(),
            crafted_this_cycle: false,
            boss_active: false,
            boss_reward_pending: false,
            onboarding_complete: false,
            shelter_milestone: false,
            rescued_this_cycle: false,
            counters: Counters::default(),
            gift_cooldown: config.companion.first_gift_ticks,
            night_damage_cooldown: 0,
            status: Status::new(StatusTone::Info, NEW_GAME_MESSAGE),
        })
    }

    /// Current unlock tier.
    pub const fn unlock_tier(&self, config: &GameConfig) -> u32 {
        self.vitals.unlock_tier(&config.player)
    }

    /// Whether `item` can be selected at the current tier.
    pub const fn is_unlocked(&self, item: ItemKind, config: &GameConfig) -> bool {
        match item {
            ItemKind::Torch => self.unlock_tier(config) >= config.rewards.torch_unlock_tier,
            _ => true,
        }
    }

    /// Placeables available at the current tier, in cycle order.
    pub fn unlocked_placeables(&self, config: &GameConfig) -> Vec<ItemKind> {
        PLACEABLES
            .into_iter()
            .filter(|item| self.is_unlocked(*item, config))
            .collect()
    }

    /// The selected placeable.
    pub fn selected_item(&self) -> ItemKind {
        PLACEABLES
            .get(self.selected)
            .copied()
            .unwrap_or(ItemKind::Dirt)
    }

    /// Owned, serializable copy for hosts.
    pub fn snapshot(&self, config: &GameConfig) -> EngineSnapshot {
        EngineSnapshot {
            width: self.world.width(),
            height: self.world.height(),
            mode: self.mode,
            selected_placeable: self.selected_item(),
            unlocked_placeables: self.unlocked_placeables(config),
            hearts: self.vitals.hearts,
            max_hearts: config.player.max_hearts,
            stars: self.vitals.stars,
            unlock_tier: self.unlock_tier(config),
            day_number: self.clock.day(),
            cycle_tick: self.clock.cycle_tick(),
            cycle_length: self.clock.cycle_length(),
            phase: self.clock.phase(),
            easy_mode: self.easy_mode,
            shelter_safety: self.shelter.safety,
            shelter_light: self.shelter.light,
            shelter_score: self.shelter.score,
            crafted_this_cycle: self.crafted_this_cycle,
            boss_event_active: self.boss_active,
            boss_reward_pending: self.boss_reward_pending,
            onboarding_complete: self.onboarding_complete,
            shelter_milestone: self.shelter_milestone,
            rescued_this_cycle: self.rescued_this_cycle,
            counters: self.counters,
            buddy_trust: self.trust.trust(),
            buddy_hint_charges: self.trust.hint_charges(),
            consecutive_rescues: self.trust.consecutive_rescues(),
            adaptive_grace_nights: self.trust.grace_nights(),
            grace_shield_charges: self.trust.grace_shields(),
            gift_cooldown_ticks: self.gift_cooldown,
            night_damage_cooldown: self.night_damage_cooldown,
            inventory: self.inventory.as_map().clone(),
            status_tone: self.status.tone,
            status_message: self.status.message.clone(),
        }
    }
}

/// Read-only copy of the engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// What a tap does.
    pub mode: InputMode,
    /// Item placed by a tap in place mode.
    pub selected_placeable: ItemKind,
    /// Items the player may select.
    pub unlocked_placeables: Vec<ItemKind>,
    /// Current hearts.
    pub hearts: u32,
    /// Heart capacity.
    pub max_hearts: u32,
    /// Stars earned.
    pub stars: u32,
    /// `1 + stars / stars_per_tier`.
    pub unlock_tier: u32,
    /// Day, starting at 1.
    pub day_number: u32,
    /// Tick within the cycle.
    pub cycle_tick: u32,
    /// Ticks per cycle.
    pub cycle_length: u32,
    /// Current phase.
    pub phase: Phase,
    /// Easy mode.
    pub easy_mode: bool,
    /// Enclosure safety.
    pub shelter_safety: u32,
    /// Light quality.
    pub shelter_light: u32,
    /// Composite shelter score.
    pub shelter_score: u32,
    /// Crafted since the last sunrise.
    pub crafted_this_cycle: bool,
    /// The sky wyrm is out.
    pub boss_event_active: bool,
    /// The sky wyrm reward will be paid at sunrise.
    pub boss_reward_pending: bool,
    /// First milestones done.
    pub onboarding_complete: bool,
    /// Safe-shelter milestone latched.
    pub shelter_milestone: bool,
    /// Rescued since the last sunrise.
    pub rescued_this_cycle: bool,
    /// Lifetime counters.
    #[serde(flatten)]
    pub counters: Counters,
    /// Buddy trust.
    pub buddy_trust: u32,
    /// Hints left today.
    pub buddy_hint_charges: u32,
    /// Rescues since the last clean sunrise.
    pub consecutive_rescues: u32,
    /// Remaining grace nights.
    pub adaptive_grace_nights: u32,
    /// Banked grace shields.
    pub grace_shield_charges: u32,
    /// Day ticks until the next gift.
    pub gift_cooldown_ticks: u32,
    /// Night ticks until the next threat probe.
    pub night_damage_cooldown: u32,
    /// Held items.
    pub inventory: BTreeMap<ItemKind, u32>,
    /// Feedback mood.
    pub status_tone: StatusTone,
    /// Feedback text.
    pub status_message: String,
}

impl EngineSnapshot {
    /// Pretty-printed JSON for logs and host tooling.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; in practice this does not fail.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
