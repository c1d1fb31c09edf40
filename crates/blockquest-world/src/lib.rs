//! Tile grid, starting layout, and shelter evaluation for Block Quest.
//!
//! This crate models the physical world: a fixed-size grid of blocks with
//! mine/place primitives, the deterministic starting layout, and the
//! evaluator that scores how well the player's home spot is enclosed and lit.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid operations.
//! - [`shelter`] -- [`ShelterEvaluator`] and its tuning, [`ShelterConfig`].
//! - [`starting_world`] -- Fixed layout for a new game.
//! - [`tile_world`] -- The [`TileWorld`] grid itself.

pub mod error;
pub mod shelter;
pub mod starting_world;
pub mod tile_world;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use shelter::{ShelterConfig, ShelterEvaluator, ShelterReport, TileWeights};
pub use starting_world::{MIN_WORLD_SIDE, create_starting_world};
pub use tile_world::TileWorld;
