//! The game engine.
//!
//! [`Engine`] composes the grid, pack, clock, shelter evaluator, threat
//! model, and trust system, and is the only thing that mutates game state.
//! Hosts drive it through two surfaces:
//!
//! - the tick loop: [`Engine::tick`] at a fixed cadence;
//! - the action API: mining, placing, crafting, and the toggles. Actions
//!   return `false` and leave the state untouched (apart from a warning
//!   status) when refused.
//!
//! After every tick and every action the shelter metrics and onboarding
//! milestones are recomputed, so a snapshot is always consistent.

use blockquest_player::{Hint, HintContext, HitOutcome, RecipeBook, craft as craft_recipe};
use blockquest_types::{BlockKind, InputMode, ItemKind, PLACEABLES, Phase, StatusTone};
use blockquest_world::{ShelterEvaluator, WorldError};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{ActionError, EngineError};
use crate::save::SaveCodec;
use crate::state::{EngineSnapshot, EngineState, Status};
use crate::store::{ProgressManager, SaveStore, StoreError};
use crate::threat::{ChanceInputs, RollInputs, ThreatModel};

/// The game engine. See the module docs.
#[derive(Debug, Clone)]
pub struct Engine {
    config: GameConfig,
    state: EngineState,
    shelter: ShelterEvaluator,
    threat: ThreatModel,
    recipes: RecipeBook,
}

impl Engine {
    /// Start a new game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let state = EngineState::fresh(&config)?;
        let engine = Self::assemble(config, state);
        info!(
            width = engine.state.world.width(),
            height = engine.state.world.height(),
            easy_mode = engine.state.easy_mode,
            "New game started"
        );
        Ok(engine)
    }

    /// Continue from a save payload, or start fresh if it does not parse.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only if the configuration is invalid; a bad
    /// payload is not an error.
    pub fn from_payload(config: GameConfig, payload: &str) -> Result<Self, EngineError> {
        config.validate()?;
        match SaveCodec::restore(payload, &config) {
            Ok(state) => {
                let engine = Self::assemble(config, state);
                info!(
                    day = engine.state.clock.day(),
                    stars = engine.state.vitals.stars,
                    "Game restored"
                );
                Ok(engine)
            }
            Err(err) => {
                warn!(%err, "Save payload rejected, starting a fresh world");
                Self::new(config)
            }
        }
    }

    /// Continue from whatever `progress` holds, or start a new game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration is invalid.
    pub fn resume<S: SaveStore>(
        config: GameConfig,
        progress: &ProgressManager<S>,
    ) -> Result<Self, EngineError> {
        match progress.load() {
            Some(payload) => Self::from_payload(config, &payload),
            None => Self::new(config),
        }
    }

    fn assemble(config: GameConfig, state: EngineState) -> Self {
        let (ax, ay) = config.world.anchor();
        let shelter = ShelterEvaluator::new(
            i32::try_from(ax).unwrap_or(0),
            i32::try_from(ay).unwrap_or(0),
            config.shelter.clone(),
        );
        let threat = ThreatModel::new(config.threat.clone());
        let mut engine = Self {
            config,
            state,
            shelter,
            threat,
            recipes: RecipeBook::standard(),
        };
        engine.refresh_derived();
        engine
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        let step = match self.state.clock.advance() {
            Ok(step) => step,
            Err(err) => {
                warn!(%err, "Clock cannot advance");
                return;
            }
        };

        let sunrise_stars = if step.sunrise { self.sunrise() } else { 0 };

        if step.phase_changed() {
            self.enter_phase(step.current, sunrise_stars);
        }

        match step.current {
            Phase::Day => self.gift_tick(),
            Phase::Night => self.night_tick(),
            Phase::Dusk | Phase::Dawn => {}
        }

        self.refresh_derived();
    }

    /// Sunrise bookkeeping. Returns the stars earned.
    fn sunrise(&mut self) -> u32 {
        let rewards = &self.config.rewards;
        let rescued = self.state.rescued_this_cycle;
        let mut stars: u32 = 0;

        if !rescued {
            self.state.counters.nights_survived =
                self.state.counters.nights_survived.saturating_add(1);
            stars = stars.saturating_add(rewards.night_stars);
        }
        let trust_gained =
            self.state
                .trust
                .on_sunrise(&self.config.trust, self.state.shelter.score, rescued);

        if self.state.crafted_this_cycle {
            stars = stars.saturating_add(rewards.craft_bonus_stars);
        }
        self.state.crafted_this_cycle = false;

        if self.state.boss_reward_pending {
            stars = stars.saturating_add(rewards.boss_stars);
        }
        self.state.boss_active = false;
        self.state.boss_reward_pending = false;

        self.state.vitals.award_stars(stars);
        self.state.vitals.heal(&self.config.player);
        self.state.counters.boom_sprout_threat = self
            .state
            .counters
            .boom_sprout_threat
            .saturating_sub(self.config.threat.sunrise_decay);
        self.state.gift_cooldown = self.config.gift_interval(self.state.easy_mode);
        self.state.rescued_this_cycle = false;

        info!(
            day = self.state.clock.day(),
            stars,
            total_stars = self.state.vitals.stars,
            trust = self.state.trust.trust(),
            trust_gained,
            rescued,
            "Sunrise"
        );
        stars
    }

    fn enter_phase(&mut self, phase: Phase, sunrise_stars: u32) {
        let day = self.state.clock.day();
        debug!(day, ?phase, "Phase started");
        match phase {
            Phase::Day => {
                self.state.status = if sunrise_stars > 0 {
                    Status::new(
                        StatusTone::Celebrate,
                        format!("Sunrise! Day {day}. +{sunrise_stars} stars"),
                    )
                } else {
                    Status::new(StatusTone::Info, format!("Sunrise! Day {day}. You made it."))
                };
            }
            Phase::Dusk => {
                self.state.status =
                    Status::new(StatusTone::Warning, "Dusk is here. Prepare your shelter!");
                self.deliver_hint();
            }
            Phase::Night => {
                self.begin_night(day);
                self.deliver_hint();
            }
            Phase::Dawn => {
                self.state.status = Status::new(StatusTone::Info, "Dawn is breaking. Almost safe!");
            }
        }
    }

    fn begin_night(&mut self, day: u32) {
        self.state.counters.boom_sprout_threat = self
            .state
            .counters
            .boom_sprout_threat
            .saturating_add(self.config.threat.nightfall_threat);
        self.state.night_damage_cooldown = self.threat.cooldown(day, self.state.easy_mode);

        if self.threat.is_boss_night(day) {
            self.state.boss_active = true;
            self.state.counters.sky_wyrm_events =
                self.state.counters.sky_wyrm_events.saturating_add(1);
            self.state.status = Status::new(
                StatusTone::Danger,
                "The Sky Wyrm is circling! Stay in your shelter.",
            );
            info!(day, events = self.state.counters.sky_wyrm_events, "Sky wyrm night");
        } else {
            self.state.status = Status::new(StatusTone::Info, "Night falls. Stay cozy inside!");
        }
    }

    fn deliver_hint(&mut self) {
        let context = HintContext {
            safety: self.state.shelter.safety,
            light: self.state.shelter.light,
            torches: self.state.inventory.count(ItemKind::Torch),
        };
        let Some(hint) = self.state.trust.deliver_hint(&self.config.trust, context) else {
            return;
        };
        debug!(?hint, charges_left = self.state.trust.hint_charges(), "Buddy hint");
        self.state.status = match hint {
            Hint::TorchGift(count) => {
                if let Err(err) = self.state.inventory.add(ItemKind::Torch, count) {
                    warn!(%err, "Torch gift dropped");
                }
                Status::new(StatusTone::Success, "Your buddy brought you a torch!")
            }
            Hint::PatchWalls => Status::new(
                StatusTone::Warning,
                "Buddy hint: fill the gaps around your home.",
            ),
            Hint::AddLight => Status::new(
                StatusTone::Warning,
                "Buddy hint: your shelter needs more light.",
            ),
        };
    }

    fn gift_tick(&mut self) {
        self.state.gift_cooldown = self.state.gift_cooldown.saturating_sub(1);
        if self.state.gift_cooldown > 0 {
            return;
        }
        self.state.gift_cooldown = self.config.gift_interval(self.state.easy_mode);

        let companion = &self.config.companion;
        let item = if self.state.counters.nights_survived.checked_rem(2) == Some(0) {
            ItemKind::Wood
        } else {
            ItemKind::Crystal
        };
        let amount = if self.state.trust.trust() >= companion.generous_trust {
            companion.generous_amount
        } else {
            companion.gift_amount
        };
        if let Err(err) = self.state.inventory.add(item, amount) {
            warn!(%err, "Glowmew gift dropped");
            return;
        }
        self.state.counters.glowmew_gift_moments =
            self.state.counters.glowmew_gift_moments.saturating_add(1);
        self.state.status = Status::new(
            StatusTone::Success,
            format!("Glowmew found {amount} {}!", item.label()),
        );
        debug!(?item, amount, "Glowmew gift");
    }

    fn night_tick(&mut self) {
        self.state.night_damage_cooldown = self.state.night_damage_cooldown.saturating_sub(1);
        if self.state.night_damage_cooldown > 0 {
            return;
        }

        let day = self.state.clock.day();
        let threat = self.state.counters.boom_sprout_threat;
        let score = self.state.shelter.score;
        let check = self.threat.check(
            &ChanceInputs {
                shelter_score: score,
                day,
                threat,
                boss_active: self.state.boss_active,
                easy_mode: self.state.easy_mode,
                grace_nights: self.state.trust.grace_nights(),
            },
            &RollInputs {
                cycle_tick: self.state.clock.cycle_tick(),
                day,
                hearts: self.state.vitals.hearts,
                threat,
                trust: self.state.trust.trust(),
            },
        );
        debug!(day, score, chance = check.chance, roll = check.roll, hit = check.hit, "Threat probe");

        if self.state.boss_active && self.threat.earns_boss_reward(score) {
            self.state.boss_reward_pending = true;
        }

        if check.hit {
            self.resolve_hit();
        } else {
            self.state.status = Status::new(StatusTone::Success, "Your shelter held strong!");
        }

        self.state.night_damage_cooldown = self.threat.cooldown(day, self.state.easy_mode);
    }

    fn resolve_hit(&mut self) {
        if self.state.trust.consume_shield() {
            self.state.status =
                Status::new(StatusTone::Success, "A grace shield blocked the Boom Sprout!");
            debug!(shields_left = self.state.trust.grace_shields(), "Grace shield used");
            return;
        }

        self.state.counters.boom_sprout_threat = self
            .state
            .counters
            .boom_sprout_threat
            .saturating_add(self.config.threat.hit_threat);
        self.state.trust.on_damage(&self.config.trust);

        match self.state.vitals.take_hit(&self.config.player) {
            HitOutcome::Hurt { hearts_left } => {
                self.state.status = Status::new(
                    StatusTone::Danger,
                    format!("Boom Sprout hit! {hearts_left} hearts left."),
                );
                debug!(hearts_left, "Player hit");
            }
            HitOutcome::Rescued { stars_lost } => self.rescue(stars_lost),
        }
    }

    fn rescue(&mut self, stars_lost: u32) {
        self.state.counters.rescued_count = self.state.counters.rescued_count.saturating_add(1);
        self.state.rescued_this_cycle = true;
        let grace = self.state.trust.on_rescue(&self.config.trust);
        if grace.torch_gift > 0 {
            if let Err(err) = self.state.inventory.add(ItemKind::Torch, grace.torch_gift) {
                warn!(%err, "Grace torch dropped");
            }
        }

        self.state.status = if grace.grace_raised {
            Status::new(
                StatusTone::Danger,
                "Rescued! Your buddy will help more tonight.",
            )
        } else {
            Status::new(StatusTone::Danger, "Rescued! Keep trying, you can do it.")
        };
        info!(
            rescued_count = self.state.counters.rescued_count,
            stars_lost,
            consecutive = self.state.trust.consecutive_rescues(),
            grace_nights = self.state.trust.grace_nights(),
            "Player rescued"
        );
    }

    /// Recompute shelter metrics, milestones, and the selection clamp.
    fn refresh_derived(&mut self) {
        self.state.shelter = self.shelter.evaluate(&self.state.world);

        if !self.state.shelter_milestone
            && self.state.shelter.safety >= self.config.rewards.shelter_milestone_safety
        {
            self.state.shelter_milestone = true;
            debug!(safety = self.state.shelter.safety, "Shelter milestone reached");
        }

        let counters = &self.state.counters;
        if !self.state.onboarding_complete
            && counters.blocks_mined >= 1
            && counters.blocks_placed >= 1
            && self.state.shelter_milestone
        {
            self.state.onboarding_complete = true;
            info!("Onboarding complete");
        }

        if !self.state.is_unlocked(self.state.selected_item(), &self.config) {
            self.state.selected = 0;
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Mine the block at `(x, y)`.
    pub fn mine(&mut self, x: i32, y: i32) -> bool {
        let result = self.try_mine(x, y);
        self.finish("mine", result)
    }

    /// Place the selected item at `(x, y)`. Fails if it is still locked.
    pub fn place(&mut self, x: i32, y: i32) -> bool {
        let item = self.state.selected_item();
        let result = if self.state.is_unlocked(item, &self.config) {
            self.try_place(x, y, item)
        } else {
            Err(ActionError::Locked { item })
        };
        self.finish("place", result)
    }

    /// Place a specific item at `(x, y)`, bypassing the selection.
    pub fn place_item(&mut self, x: i32, y: i32, item: ItemKind) -> bool {
        let result = self.try_place(x, y, item);
        self.finish("place", result)
    }

    /// Mine or place at `(x, y)` depending on the input mode.
    pub fn tap(&mut self, x: i32, y: i32) -> bool {
        match self.state.mode {
            InputMode::Mine => self.mine(x, y),
            InputMode::Place => self.place(x, y),
        }
    }

    /// Craft a recipe by id.
    pub fn craft(&mut self, recipe_id: &str) -> bool {
        let result = self.try_craft(recipe_id);
        self.finish("craft", result)
    }

    /// Switch between mining and placing.
    pub fn toggle_mode(&mut self) {
        self.state.mode = self.state.mode.toggled();
        let message = match self.state.mode {
            InputMode::Mine => "Mine mode: tap a block to dig.",
            InputMode::Place => "Build mode: tap an empty spot.",
        };
        self.state.status = Status::new(StatusTone::Info, message);
    }

    /// Select the next unlocked placeable.
    pub fn cycle_placeable(&mut self) {
        let unlocked = self.state.unlocked_placeables(&self.config);
        let current = self.state.selected_item();
        let next = unlocked
            .iter()
            .position(|item| *item == current)
            .and_then(|pos| pos.checked_add(1))
            .and_then(|pos| pos.checked_rem(unlocked.len()))
            .and_then(|pos| unlocked.get(pos))
            .or_else(|| unlocked.first())
            .copied()
            .unwrap_or(ItemKind::Dirt);
        self.state.selected = PLACEABLES
            .iter()
            .position(|item| *item == next)
            .unwrap_or(0);
        self.state.status = Status::new(StatusTone::Info, format!("Selected {}.", next.label()));
    }

    /// Turn easy mode on or off.
    pub fn toggle_easy_mode(&mut self) {
        self.state.easy_mode = !self.state.easy_mode;
        let message = if self.state.easy_mode {
            "Easy mode on."
        } else {
            "Easy mode off."
        };
        self.state.status = Status::new(StatusTone::Info, message);
        info!(easy_mode = self.state.easy_mode, "Difficulty changed");
    }

    fn try_mine(&mut self, x: i32, y: i32) -> Result<(), ActionError> {
        self.state.world.ensure_in_bounds(x, y)?;
        let block = self.state.world.get(x, y);
        let item = block.drop_item().ok_or(WorldError::TileEmpty { x, y })?;

        let rewards = &self.config.rewards;
        let quantity = if item == ItemKind::Stone && self.state.inventory.has(ItemKind::Pickaxe, 1) {
            rewards.pickaxe_stone_yield
        } else {
            1
        };
        let bonus_crystal = block == BlockKind::Stone && self.crystal_bonus(x, y);

        let mut staged = self.state.inventory.clone();
        staged.add(item, quantity)?;
        if bonus_crystal {
            staged.add(ItemKind::Crystal, 1)?;
        }
        self.state.world.mine(x, y)?;
        self.state.inventory = staged;
        self.state.counters.blocks_mined = self.state.counters.blocks_mined.saturating_add(1);

        self.state.status = if bonus_crystal {
            Status::new(StatusTone::Celebrate, "Mined stone and found a crystal!")
        } else {
            Status::new(StatusTone::Success, format!("Mined {}.", block.label()))
        };
        Ok(())
    }

    /// Stone hides a crystal when `(x + y + day + cycle_tick) % modulus == 0`.
    fn crystal_bonus(&self, x: i32, y: i32) -> bool {
        let (Ok(x), Ok(y)) = (u64::try_from(x), u64::try_from(y)) else {
            return false;
        };
        let sum = x
            .saturating_add(y)
            .saturating_add(u64::from(self.state.clock.day()))
            .saturating_add(u64::from(self.state.clock.cycle_tick()));
        sum.checked_rem(u64::from(self.config.rewards.crystal_bonus_modulus))
            .is_some_and(|rem| rem == 0)
    }

    fn try_place(&mut self, x: i32, y: i32, item: ItemKind) -> Result<(), ActionError> {
        self.state.world.ensure_in_bounds(x, y)?;
        self.state.world.ensure_vacant(x, y)?;
        let block = item.placed_block().ok_or(ActionError::NotPlaceable { item })?;
        if !self.state.inventory.has(item, 1) {
            return Err(ActionError::OutOfItem { item });
        }

        self.state.inventory.remove(item, 1)?;
        self.state.world.place(x, y, block)?;
        self.state.counters.blocks_placed = self.state.counters.blocks_placed.saturating_add(1);

        let near_home = item != ItemKind::Torch
            && self
                .shelter
                .is_near_anchor(x, y, self.config.trust.placement_radius);
        self.state.trust.on_placement(&self.config.trust, near_home);

        self.state.status = Status::new(StatusTone::Success, format!("Placed {}.", item.label()));
        Ok(())
    }

    fn try_craft(&mut self, recipe_id: &str) -> Result<(), ActionError> {
        let recipe = craft_recipe(
            &self.recipes,
            recipe_id,
            &mut self.state.inventory,
            self.state.vitals.stars,
        )?;
        self.state.crafted_this_cycle = true;
        self.state.trust.on_craft(&self.config.trust);
        self.state.status = Status::new(
            StatusTone::Celebrate,
            format!("Crafted {} {}!", recipe.output_quantity, recipe.output.label()),
        );
        info!(recipe = recipe.id, trust = self.state.trust.trust(), "Crafted");
        Ok(())
    }

    /// Turn an action result into the public `bool`, recording a warning
    /// status on refusal.
    fn finish(&mut self, action: &'static str, result: Result<(), ActionError>) -> bool {
        let ok = match result {
            Ok(()) => true,
            Err(err) => {
                debug!(action, %err, "Action refused");
                self.state.status = Status::new(StatusTone::Warning, err.status_message());
                false
            }
        };
        self.refresh_derived();
        ok
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.state.snapshot(&self.config)
    }

    /// Block at `(x, y)`; empty outside the grid.
    pub fn block_at(&self, x: i32, y: i32) -> BlockKind {
        self.state.world.get(x, y)
    }

    /// How many of `item` the player holds.
    pub fn inventory_of(&self, item: ItemKind) -> u32 {
        self.state.inventory.count(item)
    }

    /// The recipe book.
    pub const fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// The configuration in use.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Encode the current state for persistence.
    pub fn to_save_payload(&self) -> String {
        SaveCodec::serialize(&self.state, &self.config)
    }

    /// Write the current state through `progress`.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub fn save_to<S: SaveStore>(
        &self,
        progress: &mut ProgressManager<S>,
    ) -> Result<(), StoreError> {
        progress.save(&self.to_save_payload())
    }

    // -----------------------------------------------------------------------
    // Debug hooks
    // -----------------------------------------------------------------------

    /// Give the player items, bypassing the game rules.
    pub fn debug_grant(&mut self, item: ItemKind, amount: u32) -> bool {
        let granted = self.state.inventory.add(item, amount).is_ok();
        self.refresh_derived();
        granted
    }

    /// Overwrite a tile, bypassing the game rules.
    pub fn debug_set_block(&mut self, x: i32, y: i32, block: BlockKind) -> bool {
        let placed = self.state.world.set(x, y, block).is_ok();
        self.refresh_derived();
        placed
    }

    /// Award stars, bypassing the game rules.
    pub fn debug_award_stars(&mut self, stars: u32) {
        self.state.vitals.award_stars(stars);
        self.refresh_derived();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use blockquest_player::Vitals;

    use crate::clock::DayCycleClock;

    fn engine() -> Engine {
        Engine::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn new_game_snapshot() {
        let engine = engine();
        let snap = engine.snapshot();
        assert_eq!(snap.day_number, 1);
        assert_eq!(snap.phase, Phase::Day);
        assert_eq!(snap.hearts, 3);
        assert_eq!(snap.unlock_tier, 1);
        assert_eq!(snap.buddy_trust, 50);
        assert_eq!(snap.shelter_score, 0);
    }

    #[test]
    fn mining_empty_or_off_map_warns() {
        let mut engine = engine();
        assert!(!engine.mine(0, 0));
        assert_eq!(engine.snapshot().status_tone, StatusTone::Warning);
        assert!(!engine.mine(-1, 3));
        assert!(!engine.mine(12, 3));
        assert_eq!(engine.snapshot().counters.blocks_mined, 0);
    }

    #[test]
    fn placing_crystal_or_pickaxe_refused() {
        let mut engine = engine();
        assert!(engine.debug_grant(ItemKind::Crystal, 1));
        assert!(engine.debug_grant(ItemKind::Pickaxe, 1));
        assert!(!engine.place_item(6, 3, ItemKind::Crystal));
        assert!(!engine.place_item(6, 3, ItemKind::Pickaxe));
        assert_eq!(engine.block_at(6, 3), BlockKind::Empty);
        assert_eq!(engine.inventory_of(ItemKind::Crystal), 1);
    }

    #[test]
    fn pickaxe_doubles_stone() {
        let mut engine = engine();
        assert!(engine.debug_grant(ItemKind::Pickaxe, 1));
        // (4, 6) on day 1 tick 0: 4 + 6 + 1 + 0 = 11, no crystal bonus.
        assert!(engine.mine(4, 6));
        assert_eq!(engine.inventory_of(ItemKind::Stone), 4);
        assert_eq!(engine.inventory_of(ItemKind::Crystal), 0);
    }

    #[test]
    fn stone_crystal_bonus() {
        let mut engine = engine();
        // (7, 6) on day 1 tick 0: 7 + 6 + 1 + 0 = 14. One tick later, 15.
        engine.tick();
        assert!(engine.mine(7, 6));
        assert_eq!(engine.inventory_of(ItemKind::Stone), 3);
        assert_eq!(engine.inventory_of(ItemKind::Crystal), 1);
        assert_eq!(engine.snapshot().status_tone, StatusTone::Celebrate);
    }

    #[test]
    fn locked_torch_cannot_be_placed_from_selection() {
        let mut engine = engine();
        assert!(engine.debug_grant(ItemKind::Torch, 1));
        engine.toggle_mode();
        for _ in 0..4 {
            engine.cycle_placeable();
        }
        // Torch is locked at tier 1, so the cycle wrapped back to dirt.
        assert_eq!(engine.snapshot().selected_placeable, ItemKind::Dirt);

        engine.debug_award_stars(4);
        for _ in 0..4 {
            engine.cycle_placeable();
        }
        assert_eq!(engine.snapshot().selected_placeable, ItemKind::Torch);
        assert!(engine.tap(6, 3));
        assert_eq!(engine.block_at(6, 3), BlockKind::Torch);
    }

    #[test]
    fn selection_clamps_when_tier_drops() {
        let mut engine = engine();
        engine.debug_award_stars(4);
        for _ in 0..4 {
            engine.cycle_placeable();
        }
        assert_eq!(engine.snapshot().selected_placeable, ItemKind::Torch);
        engine.state.vitals.stars = 3;
        engine.refresh_derived();
        assert_eq!(engine.snapshot().selected_placeable, ItemKind::Dirt);
    }

    #[test]
    fn place_near_home_builds_trust() {
        let mut engine = engine();
        assert!(engine.place_item(5, 2, ItemKind::Dirt));
        assert_eq!(engine.snapshot().buddy_trust, 52);
        // Far from the anchor: no trust.
        assert!(engine.place_item(0, 3, ItemKind::Dirt));
        assert_eq!(engine.snapshot().buddy_trust, 52);
    }

    #[test]
    fn torch_placement_near_home_earns_no_trust() {
        let mut engine = engine();
        assert!(engine.debug_grant(ItemKind::Torch, 1));
        assert!(engine.place_item(6, 3, ItemKind::Torch));
        assert_eq!(engine.snapshot().buddy_trust, 50);
    }

    #[test]
    fn failed_craft_changes_nothing_but_status() {
        let mut engine = engine();
        assert!(!engine.craft("torch_pair"));
        assert!(!engine.craft("mystery"));
        let after = engine.snapshot();
        assert_eq!(after.status_tone, StatusTone::Warning);
        assert_eq!(engine.inventory_of(ItemKind::Dirt), 8);
        assert_eq!(engine.inventory_of(ItemKind::Stone), 2);
        assert!(!after.crafted_this_cycle);
        assert_eq!(after.buddy_trust, 50);
    }

    #[test]
    fn dusk_entry_prepares_and_hints() {
        let mut engine = engine();
        for _ in 0..80 {
            engine.tick();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Dusk);
        // Open shelter and no torches at trust 50: the buddy hands one over.
        assert_eq!(snap.buddy_hint_charges, 1);
        assert_eq!(engine.inventory_of(ItemKind::Torch), 1);
    }

    /// An engine mid-night whose every threat probe lands.
    fn engine_with_certain_hits() -> Engine {
        let mut config = GameConfig::default();
        config.threat.min_chance = 100;
        config.threat.max_chance = 100;
        let mut engine = Engine::new(config).unwrap();
        engine.state.clock = DayCycleClock::from_parts(1, 120, &engine.config.cycle).unwrap();
        engine.state.night_damage_cooldown = 0;
        engine
    }

    #[test]
    fn grace_shield_absorbs_a_night_hit() {
        let mut engine = engine_with_certain_hits();
        let trust_config = engine.config.trust.clone();
        assert!(!engine.state.trust.on_rescue(&trust_config).grace_raised);
        assert!(engine.state.trust.on_rescue(&trust_config).grace_raised);
        assert_eq!(engine.state.trust.grace_shields(), 1);
        let before = engine.snapshot();

        engine.tick();
        let after = engine.snapshot();
        assert_eq!(after.hearts, before.hearts);
        assert_eq!(after.counters.boom_sprout_threat, before.counters.boom_sprout_threat);
        assert_eq!(after.buddy_trust, before.buddy_trust);
        assert_eq!(after.counters.rescued_count, 0);
        assert_eq!(after.status_message, "A grace shield blocked the Boom Sprout!");
        assert_eq!(engine.state.trust.grace_shields(), 0);

        // The next probe has no shield left.
        engine.state.night_damage_cooldown = 0;
        engine.tick();
        let hurt = engine.snapshot();
        assert_eq!(hurt.hearts, before.hearts.saturating_sub(1));
        assert_eq!(hurt.status_tone, StatusTone::Danger);
    }

    #[test]
    fn last_heart_hit_rescues() {
        let mut engine = engine_with_certain_hits();
        engine.state.vitals = Vitals { hearts: 1, stars: 0 };

        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.hearts, 3);
        assert_eq!(snap.stars, 0);
        assert_eq!(snap.counters.rescued_count, 1);
        assert_eq!(snap.consecutive_rescues, 1);
        assert_eq!(snap.counters.boom_sprout_threat, 1);
        // Damage then rescue penalty.
        assert_eq!(snap.buddy_trust, 34);
        assert!(snap.rescued_this_cycle);
        assert_eq!(snap.status_message, "Rescued! Keep trying, you can do it.");
    }

    fn at_last_dawn_tick(engine: &mut Engine) {
        engine.state.clock = DayCycleClock::from_parts(1, 179, &engine.config.cycle).unwrap();
    }

    #[test]
    fn sunrise_pays_night_craft_and_boss_stars() {
        let mut engine = engine();
        at_last_dawn_tick(&mut engine);
        engine.state.crafted_this_cycle = true;
        engine.state.boss_active = true;
        engine.state.boss_reward_pending = true;
        engine.state.vitals.hearts = 2;

        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.day_number, 2);
        assert_eq!(snap.stars, 5);
        assert_eq!(snap.hearts, 3);
        assert_eq!(snap.counters.nights_survived, 1);
        assert_eq!(snap.buddy_trust, 52);
        assert!(!snap.crafted_this_cycle);
        assert!(!snap.boss_event_active);
        assert!(!snap.boss_reward_pending);
        // Reset to 24 at sunrise, then the first day tick counts down.
        assert_eq!(snap.gift_cooldown_ticks, 23);
        assert_eq!(snap.status_tone, StatusTone::Celebrate);
        assert_eq!(snap.status_message, "Sunrise! Day 2. +5 stars");
    }

    #[test]
    fn rescued_sunrise_skips_night_star_and_trust() {
        let mut engine = engine();
        at_last_dawn_tick(&mut engine);
        engine.state.rescued_this_cycle = true;

        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.stars, 0);
        assert_eq!(snap.counters.nights_survived, 0);
        assert_eq!(snap.buddy_trust, 50);
        assert!(!snap.rescued_this_cycle);
        assert_eq!(snap.status_tone, StatusTone::Info);
    }
}
