//! A scripted player for headless runs.
//!
//! The script plays the way the game teaches: wall in the home spot, turn
//! spare wood into planks and torches, light the shelter once torches are
//! unlocked, and fetch trees or dirt when the pack runs dry. It only acts
//! during the day, once every `cadence` ticks, and only through the public
//! action API, so every move obeys the normal game rules.

use blockquest_core::{Engine, GameConfig};
use blockquest_types::{BlockKind, ItemKind, Phase};
use tracing::debug;

/// Items the script is willing to build walls from, in order of preference.
const WALL_MATERIALS: [ItemKind; 4] = [
    ItemKind::Dirt,
    ItemKind::Stone,
    ItemKind::Wood,
    ItemKind::Plank,
];

/// Recipes worth crafting, in order of preference.
const WANTED_RECIPES: [&str; 3] = ["torch_pair", "stone_pick", "plank_bundle"];

/// One step of the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Place `item` at `(x, y)`.
    Build {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Item to place.
        item: ItemKind,
    },
    /// Mine the block at `(x, y)`.
    Dig {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// Craft a recipe.
    Craft(&'static str),
}

/// Deterministic player script.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    cadence: u32,
    walls: Vec<(i32, i32)>,
    torch_spots: Vec<(i32, i32)>,
    surface_row: i32,
    width: i32,
    height: i32,
}

impl ScriptedPlayer {
    /// A script for the world described by `config`, acting every `cadence`
    /// day ticks.
    pub fn new(config: &GameConfig, cadence: u32) -> Self {
        let (ax, ay) = config.world.anchor();
        let ax = i32::try_from(ax).unwrap_or(0);
        let ay = i32::try_from(ay).unwrap_or(0);
        let width = i32::try_from(config.world.width).unwrap_or(0);
        let height = i32::try_from(config.world.height).unwrap_or(0);
        let in_bounds = |&(x, y): &(i32, i32)| x >= 0 && y >= 0 && x < width && y < height;

        let mut walls: Vec<(i32, i32)> = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ]
        .into_iter()
        .map(|(dx, dy)| (ax.saturating_add(dx), ay.saturating_add(dy)))
        .collect();
        let floor = ay.saturating_add(2);
        walls.extend((-2..=2).map(|dx| (ax.saturating_add(dx), floor)));
        let roof = ay.saturating_sub(1);
        walls.push((ax.saturating_sub(2), roof));
        walls.push((ax.saturating_add(2), roof));
        walls.retain(in_bounds);

        let below = ay.saturating_add(1);
        let mut torch_spots = vec![
            (ax.saturating_add(1), below),
            (ax.saturating_sub(1), below),
        ];
        torch_spots.retain(in_bounds);

        Self {
            cadence: cadence.max(1),
            walls,
            torch_spots,
            surface_row: height.saturating_sub(3),
            width,
            height,
        }
    }

    /// Take at most one action if it is the script's turn. Returns the move
    /// attempted and whether the engine accepted it.
    pub fn act(&self, engine: &mut Engine) -> Option<(Move, bool)> {
        let snap = engine.snapshot();
        if snap.phase != Phase::Day || snap.cycle_tick.checked_rem(self.cadence) != Some(0) {
            return None;
        }
        let step = self.plan(engine)?;
        let accepted = match step {
            Move::Build { x, y, item } => engine.place_item(x, y, item),
            Move::Dig { x, y } => engine.mine(x, y),
            Move::Craft(id) => engine.craft(id),
        };
        debug!(?step, accepted, "Scripted move");
        Some((step, accepted))
    }

    /// Choose the next move without changing anything.
    pub fn plan(&self, engine: &Engine) -> Option<Move> {
        self.light_up(engine)
            .or_else(|| self.wall_in(engine))
            .or_else(|| Self::craft_something(engine))
            .or_else(|| self.gather(engine, BlockKind::Wood))
    }

    fn light_up(&self, engine: &Engine) -> Option<Move> {
        let snap = engine.snapshot();
        if engine.inventory_of(ItemKind::Torch) == 0
            || !snap.unlocked_placeables.contains(&ItemKind::Torch)
        {
            return None;
        }
        self.torch_spots
            .iter()
            .find(|(x, y)| engine.block_at(*x, *y) != BlockKind::Torch)
            .map(|&(x, y)| {
                if engine.block_at(x, y) == BlockKind::Empty {
                    Move::Build {
                        x,
                        y,
                        item: ItemKind::Torch,
                    }
                } else {
                    Move::Dig { x, y }
                }
            })
    }

    fn wall_in(&self, engine: &Engine) -> Option<Move> {
        let &(x, y) = self
            .walls
            .iter()
            .find(|(x, y)| engine.block_at(*x, *y) == BlockKind::Empty)?;
        match WALL_MATERIALS
            .into_iter()
            .find(|item| engine.inventory_of(*item) > 0)
        {
            Some(item) => Some(Move::Build { x, y, item }),
            None => self.gather(engine, BlockKind::Dirt),
        }
    }

    fn craft_something(engine: &Engine) -> Option<Move> {
        let stars = engine.snapshot().stars;
        WANTED_RECIPES
            .into_iter()
            .filter(|id| *id != "stone_pick" || engine.inventory_of(ItemKind::Pickaxe) == 0)
            .find(|id| {
                engine.recipes().get(id).is_some_and(|recipe| {
                    stars >= recipe.min_stars
                        && recipe
                            .inputs
                            .iter()
                            .all(|(item, count)| engine.inventory_of(*item) >= *count)
                })
            })
            .map(Move::Craft)
    }

    /// First `block` from the surface down, away from the shelter.
    fn gather(&self, engine: &Engine, block: BlockKind) -> Option<Move> {
        let start = if block == BlockKind::Dirt {
            self.surface_row
        } else {
            0
        };
        (start..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|spot| !self.walls.contains(spot) && !self.torch_spots.contains(spot))
            .find(|(x, y)| engine.block_at(*x, *y) == block)
            .map(|(x, y)| Move::Dig { x, y })
    }
}
