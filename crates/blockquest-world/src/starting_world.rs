//! Fixed starting layout for a new game.
//!
//! The layout is deterministic and scales with the configured dimensions:
//! bedrock-like stone at the bottom, a crystal vein above it, a dirt surface,
//! two trees near the edges and two boulders flanking the middle. The rows
//! around the shelter anchor are left open so the player builds the shelter
//! from scratch.

use blockquest_types::BlockKind;
use tracing::debug;

use crate::error::WorldError;
use crate::tile_world::TileWorld;

/// Smallest side length the layout fits in.
pub const MIN_WORLD_SIDE: u32 = 5;

/// Build the starting world for the given dimensions.
///
/// With a 12x10 world: row 9 is stone, row 8 is stone with crystal at every
/// `x % 4 == 2`, row 7 is dirt, wood trunks stand at x=1 and x=10 on rows 5-6,
/// and stone boulders sit at (4, 6) and (7, 6).
///
/// # Errors
///
/// Returns [`WorldError::InvalidDimensions`] if either side is below
/// [`MIN_WORLD_SIDE`].
pub fn create_starting_world(width: u32, height: u32) -> Result<TileWorld, WorldError> {
    if width < MIN_WORLD_SIDE || height < MIN_WORLD_SIDE {
        return Err(WorldError::InvalidDimensions { width, height });
    }
    let mut world = TileWorld::new(width, height)?;

    let w = i32::try_from(width).map_err(|_err| WorldError::InvalidDimensions { width, height })?;
    let h = i32::try_from(height).map_err(|_err| WorldError::InvalidDimensions { width, height })?;

    let bedrock = h.saturating_sub(1);
    let vein = h.saturating_sub(2);
    let surface = h.saturating_sub(3);
    let ground_level = h.saturating_sub(4);
    let trunk_top = h.saturating_sub(5);

    for x in 0..w {
        world.set(x, bedrock, BlockKind::Stone)?;
        let vein_block = if x.rem_euclid(4) == 2 {
            BlockKind::Crystal
        } else {
            BlockKind::Stone
        };
        world.set(x, vein, vein_block)?;
        world.set(x, surface, BlockKind::Dirt)?;
    }

    let trees = [1, w.saturating_sub(2)];
    for x in trees {
        world.set(x, ground_level, BlockKind::Wood)?;
        world.set(x, trunk_top, BlockKind::Wood)?;
    }

    let middle = w.saturating_div(2);
    world.set(middle.saturating_sub(2), ground_level, BlockKind::Stone)?;
    world.set(middle.saturating_add(1), ground_level, BlockKind::Stone)?;

    debug!(width, height, "Starting world generated");
    Ok(world)
}
