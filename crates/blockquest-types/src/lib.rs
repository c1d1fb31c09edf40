//! Shared type definitions for the Block Quest simulation.
//!
//! This crate is the single source of truth for the enums that cross crate
//! boundaries: blocks in the world grid, inventory items, day-cycle phases,
//! input modes, and status tones.
//!
//! # Modules
//!
//! - [`enums`] -- Enumeration types with stable save-payload ordinals

pub mod enums;

// Re-export all public types at crate root for convenience.
pub use enums::{BlockKind, InputMode, ItemKind, PLACEABLES, Phase, StatusTone};
