//! Day cycle, threat model, persistence, and the game engine for Block Quest.
//!
//! This crate sits on top of `blockquest-world` (the grid and shelter
//! scoring) and `blockquest-player` (pack, recipes, hearts, trust) and turns
//! them into a tick-driven game. Everything is deterministic: the same
//! sequence of ticks and actions always produces the same state.
//!
//! # Modules
//!
//! - [`clock`] -- [`DayCycleClock`]: day number, cycle tick, derived phase.
//! - [`config`] -- Loading `blockquest-config.yaml` into [`GameConfig`].
//! - [`engine`] -- The [`Engine`]: tick loop, action API, queries.
//! - [`error`] -- [`EngineError`] and [`ActionError`].
//! - [`save`] -- [`SaveCodec`], the delimited text save format.
//! - [`state`] -- [`EngineState`] and the read-only [`EngineSnapshot`].
//! - [`store`] -- [`SaveStore`] and [`ProgressManager`].
//! - [`threat`] -- [`ThreatModel`]: damage chance, roll, and cooldown.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod save;
pub mod state;
pub mod store;
pub mod threat;

// Re-export primary types at crate root.
pub use clock::{ClockAdvance, ClockError, DayCycleClock};
pub use config::{
    CompanionConfig, ConfigError, CycleConfig, EASY_MODE_ENV, GameConfig, RewardsConfig,
    ScoreBand, ThreatConfig, WorldConfig,
};
pub use engine::Engine;
pub use error::{ActionError, EngineError};
pub use save::{SaveCodec, SaveError};
pub use state::{Counters, EngineSnapshot, EngineState, Status};
pub use store::{MemoryStore, PROGRESS_KEY, ProgressManager, SaveStore, StoreError};
pub use threat::{ChanceInputs, RollInputs, ThreatCheck, ThreatModel};
