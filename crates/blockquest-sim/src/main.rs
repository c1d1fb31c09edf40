//! Headless host for Block Quest.
//!
//! Drives the engine the way a game shell would: a fixed tick cadence,
//! periodic autosaves, and a final save on exit. A scripted player stands in
//! for the kid holding the tablet.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Read host settings from the environment
//! 3. Load game tuning from `blockquest-config.yaml`
//! 4. Open the file store and resume saved progress
//! 5. Run the requested number of days
//! 6. Save and print the final snapshot as JSON

mod error;
mod file_store;
mod player;
mod settings;

use std::path::Path;

use blockquest_core::{Engine, GameConfig, ProgressManager};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::SimError;
use crate::file_store::FileStore;
use crate::player::ScriptedPlayer;
use crate::settings::SimSettings;

/// Day ticks between scripted moves.
const PLAYER_CADENCE: u32 = 2;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage, or the engine fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("blockquest-sim starting");

    // 2. Host settings.
    let settings = SimSettings::from_env()?;
    info!(
        days = settings.days,
        save_dir = %settings.save_dir.display(),
        tick_interval = ?settings.tick_interval,
        autosave_every = settings.autosave_every,
        "Settings loaded"
    );

    // 3. Game tuning.
    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        cycle_length = ?config.cycle.cycle_length(),
        easy_mode = config.world.easy_mode,
        "Configuration loaded"
    );

    // 4. Resume.
    let mut progress = ProgressManager::new(FileStore::open(&settings.save_dir)?);
    let player = ScriptedPlayer::new(&config, PLAYER_CADENCE);
    let mut engine = Engine::resume(config, &progress)?;

    // 5. Play.
    let result = run(&mut engine, &player, &mut progress, &settings);

    // 6. Always try to save, then report.
    engine.save_to(&mut progress)?;
    result?;

    let snapshot = engine.snapshot();
    info!(
        day = snapshot.day_number,
        stars = snapshot.stars,
        nights_survived = snapshot.counters.nights_survived,
        rescued = snapshot.counters.rescued_count,
        trust = snapshot.buddy_trust,
        "Run finished"
    );
    println!("{}", snapshot.to_json()?);
    Ok(())
}

/// Tick until `settings.days` sunrises have passed.
fn run(
    engine: &mut Engine,
    player: &ScriptedPlayer,
    progress: &mut ProgressManager<FileStore>,
    settings: &SimSettings,
) -> Result<(), SimError> {
    let target_day = engine.snapshot().day_number.saturating_add(settings.days);
    let mut ticks: u32 = 0;

    while engine.snapshot().day_number < target_day {
        engine.tick();
        ticks = ticks.saturating_add(1);

        if let Some((step, false)) = player.act(engine) {
            debug!(?step, status = %engine.snapshot().status_message, "Move refused");
        }

        if ticks.checked_rem(settings.autosave_every) == Some(0) {
            engine.save_to(progress)?;
        }
        if !settings.tick_interval.is_zero() {
            std::thread::sleep(settings.tick_interval);
        }
    }

    info!(ticks, "Simulation loop exited");
    Ok(())
}

/// Load `blockquest-config.yaml` from the working directory, or defaults.
fn load_config() -> Result<GameConfig, SimError> {
    let config_path = Path::new("blockquest-config.yaml");
    if config_path.exists() {
        Ok(GameConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        let mut config = GameConfig::parse("")?;
        config.world.apply_env_overrides();
        Ok(config)
    }
}
