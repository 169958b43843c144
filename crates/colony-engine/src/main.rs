//! Offline replay debugger for the Colony controller.
//!
//! Loads a captured world snapshot and runs the full per-tick pipeline
//! against it: memory reaping, every creep's state machine and population
//! control. Nothing in the snapshot changes, so each tick re-decides from
//! the same frozen world while memory carries over. Every action issued is
//! journaled and logged with the outcome the replay backend synthesized.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `COLONY_CONFIG` or `colony-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the snapshot (`replay.snapshot_path`, `COLONY_SNAPSHOT` wins)
//! 4. Run `replay.ticks` ticks, logging each summary and its actions
//! 5. Log the final memory of every creep

mod error;

use std::path::PathBuf;

use colony_core::{ColonyConfig, Dispatcher, LogFormat, LoggingConfig, select_world};
use colony_world::{ActionJournal, WorldState};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "COLONY_CONFIG";

/// Default config file, relative to the working directory.
const CONFIG_FILE: &str = "colony-config.yaml";

/// Application entry point for the replay debugger.
///
/// # Errors
///
/// Returns an error if the config or snapshot cannot be loaded or a tick
/// aborts.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        snapshot = %config.replay.snapshot_path.display(),
        ticks = config.replay.ticks,
        "colony-engine starting"
    );

    run(&config)?;
    Ok(())
}

fn run(config: &ColonyConfig) -> Result<(), EngineError> {
    // 3. Load the snapshot. The debugger has no host to fall back to.
    let mut replay = config.replay.clone();
    replay.enabled = true;
    let world = select_world(&replay, None)?;
    let mut dispatcher = Dispatcher::new(ActionJournal::new(world), config);

    // 4. Run the ticks.
    for _ in 0..config.replay.ticks {
        let summary = dispatcher.run_tick()?;
        info!(
            tick = summary.tick,
            processed = summary.processed,
            failed = summary.failed,
            skipped = summary.skipped,
            reaped = summary.reaped.len(),
            states = ?summary.states,
            spawn = ?summary.spawn,
            "tick complete"
        );
        let actions = dispatcher.world_mut().drain();
        for action in &actions {
            info!(
                tick = action.tick,
                agent = %action.agent,
                verb = ?action.verb,
                target = %action.target,
                outcome = %action.outcome,
                "action"
            );
        }
        debug!(journal = %serde_json::to_string(&actions)?, "tick journal");
    }

    // 5. Final memory.
    let memory = dispatcher.world().load_memory()?;
    for (name, entry) in &memory.creeps {
        info!(
            creep = %name,
            role = ?entry.role,
            state = ?entry.state,
            target = ?entry.target,
            "final memory"
        );
    }
    info!(creeps = memory.creeps.len(), "replay finished");
    Ok(())
}

/// Load configuration from `COLONY_CONFIG`, else `colony-config.yaml`.
///
/// Falls back to defaults when the file does not exist.
fn load_config() -> Result<(ColonyConfig, PathBuf), EngineError> {
    let path = std::env::var(CONFIG_ENV).map_or_else(|_| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if path.exists() {
        let config = ColonyConfig::from_file(&path)?;
        Ok((config, path))
    } else {
        Ok((ColonyConfig::parse("")?, path))
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
