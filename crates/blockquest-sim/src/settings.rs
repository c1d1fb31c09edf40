//! Host-loop settings read from the environment.
//!
//! Game tuning lives in `blockquest-config.yaml`. These knobs only shape how
//! the headless host drives the engine.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SimError;

/// Settings for one sim run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimSettings {
    /// Days to play before exiting.
    pub days: u32,
    /// Directory the file store writes into.
    pub save_dir: PathBuf,
    /// Wall-clock pause between ticks. Zero runs as fast as possible.
    pub tick_interval: Duration,
    /// Ticks between autosaves.
    pub autosave_every: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            days: 3,
            save_dir: PathBuf::from("saves"),
            tick_interval: Duration::ZERO,
            autosave_every: 15,
        }
    }
}

impl SimSettings {
    /// Load settings from environment variables.
    ///
    /// Optional variables:
    /// - `BLOCKQUEST_SIM_DAYS` -- days to play (default 3)
    /// - `BLOCKQUEST_SAVE_DIR` -- save directory (default `saves`)
    /// - `BLOCKQUEST_TICK_MS` -- pause between ticks in milliseconds (default 0)
    /// - `BLOCKQUEST_AUTOSAVE_TICKS` -- ticks between autosaves (default 15)
    pub fn from_env() -> Result<Self, SimError> {
        let defaults = Self::default();
        let days = parse_var("BLOCKQUEST_SIM_DAYS", defaults.days)?;
        let save_dir = std::env::var("BLOCKQUEST_SAVE_DIR")
            .map_or(defaults.save_dir, PathBuf::from);
        let tick_ms: u64 = parse_var("BLOCKQUEST_TICK_MS", 0)?;
        let autosave_every = parse_var("BLOCKQUEST_AUTOSAVE_TICKS", defaults.autosave_every)?;
        if autosave_every == 0 {
            return Err(SimError::Setting {
                name: "BLOCKQUEST_AUTOSAVE_TICKS",
                message: "must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            days,
            save_dir,
            tick_interval: Duration::from_millis(tick_ms),
            autosave_every,
        })
    }
}

/// Read an optional numeric environment variable.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, SimError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| SimError::Setting {
            name,
            message: format!("{raw:?}: {e}"),
        }),
        Err(_) => Ok(default),
    }
}
