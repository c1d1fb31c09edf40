//! Player-side state and rules for Block Quest.
//!
//! Everything here operates on plain values without touching the grid or
//! the clock: the item inventory, the recipe book and the craft operation,
//! hearts and the rescue rule, and the buddy trust system with its hints and
//! adaptive grace.
//!
//! # Modules
//!
//! - [`crafting`] -- [`RecipeBook`] and the atomic [`craft`] operation.
//! - [`error`] -- Error types for player operations ([`PlayerError`]).
//! - [`inventory`] -- [`Inventory`] with remove-at-zero semantics.
//! - [`trust`] -- [`TrustSystem`], hint delivery, and adaptive grace.
//! - [`vitals`] -- Hearts, stars, unlock tier, and rescue ([`Vitals`]).

pub mod crafting;
pub mod error;
pub mod inventory;
pub mod trust;
pub mod vitals;

// Re-export primary types at crate root.
pub use crafting::{Recipe, RecipeBook, craft};
pub use error::PlayerError;
pub use inventory::Inventory;
pub use trust::{Hint, HintBand, HintContext, RescueGrace, TrustConfig, TrustSystem};
pub use vitals::{HitOutcome, Vitals, VitalsConfig};
