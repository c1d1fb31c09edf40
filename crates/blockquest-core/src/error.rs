//! Error types for the blockquest-core crate.
//!
//! [`EngineError`] covers engine construction, which only fails on a bad
//! configuration. [`ActionError`] is why a player action was refused; the
//! public action API turns it into `false` plus a warning status.

use blockquest_player::PlayerError;
use blockquest_types::ItemKind;
use blockquest_world::WorldError;

use crate::clock::ClockError;
use crate::config::ConfigError;

/// Errors that can occur while building an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The day cycle could not be built.
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),

    /// The starting world could not be built.
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// The starting inventory could not be built.
    #[error("player error: {0}")]
    Player(#[from] PlayerError),
}

/// Why a player action was refused. The engine state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Grid rule violated (out of range, empty, occupied).
    #[error(transparent)]
    World(#[from] WorldError),

    /// Inventory or crafting rule violated.
    #[error(transparent)]
    Player(#[from] PlayerError),

    /// The item has no block form.
    #[error("{item:?} cannot be placed")]
    NotPlaceable {
        /// The item.
        item: ItemKind,
    },

    /// The item is not unlocked at the current tier.
    #[error("{item:?} is locked until a higher tier")]
    Locked {
        /// The item.
        item: ItemKind,
    },

    /// None of the item is held.
    #[error("no {item:?} left to place")]
    OutOfItem {
        /// The item.
        item: ItemKind,
    },
}

impl ActionError {
    /// Kid-friendly status line for the UI.
    pub fn status_message(&self) -> String {
        match self {
            Self::World(WorldError::OutOfBounds { .. }) => "That spot is off the map.".to_owned(),
            Self::World(WorldError::TileEmpty { .. }) => "Nothing to mine there.".to_owned(),
            Self::World(WorldError::TileOccupied { .. }) => "Spot occupied.".to_owned(),
            Self::World(_) => "That does not work here.".to_owned(),
            Self::Player(PlayerError::UnknownRecipe(_)) => "Unknown recipe.".to_owned(),
            Self::Player(PlayerError::StarsTooLow { required, .. }) => {
                format!("Earn {required} stars to unlock that recipe.")
            }
            Self::Player(PlayerError::InsufficientItem { .. }) => "Need more blocks.".to_owned(),
            Self::Player(_) => "Your pack is too full.".to_owned(),
            Self::NotPlaceable { item } => format!("You can't place {}.", item.label()),
            Self::Locked { item } => format!("Earn more stars to unlock {}.", item.label()),
            Self::OutOfItem { item } => format!("Need more {}.", item.label()),
        }
    }
}
