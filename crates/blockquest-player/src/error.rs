//! Error types for the blockquest-player crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! This module defines the error hierarchy used across inventory, crafting,
//! and vitals.

use blockquest_types::ItemKind;

/// Errors that can occur during player state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// Attempted to remove more of an item than the player holds.
    #[error("insufficient {item:?}: wanted {requested} but only have {available}")]
    InsufficientItem {
        /// The item being removed.
        item: ItemKind,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// Adding would overflow the item count.
    #[error("inventory overflow adding {attempted} of {item:?}")]
    InventoryOverflow {
        /// The item being added.
        item: ItemKind,
        /// The quantity the caller attempted to add.
        attempted: u32,
    },

    /// An inventory entry was given a zero count.
    #[error("inventory entry for {item:?} has a zero count")]
    ZeroCount {
        /// The offending item.
        item: ItemKind,
    },

    /// No recipe has the requested id.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// The player has not earned enough stars for the recipe.
    #[error("recipe {recipe} needs {required} stars, have {available}")]
    StarsTooLow {
        /// Recipe id.
        recipe: &'static str,
        /// Stars required.
        required: u32,
        /// Stars held.
        available: u32,
    },
}
