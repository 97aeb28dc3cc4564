//! Headless host for the Smashpad toy.
//!
//! Replays a JSON-lines input script through the interaction core on a
//! 16 ms frame loop, with logging adapters standing in for the renderer,
//! audio, and effects, and a simulated voice for narration. Useful for
//! reproducing arbitration bugs from recorded input.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration from `smashpad-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing)
//! 4. Read and parse the script
//! 5. Build the core on a manual clock with engine ports
//! 6. Run the replay and log the summary

mod args;
mod error;
mod ports;
mod replay;
mod script;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use smashpad_core::InteractionCore;
use smashpad_core::catalog::ObjectCatalog;
use smashpad_core::clock::ManualClock;
use smashpad_core::config::{LogFormat, LoggingConfig, ToyConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::EngineArgs;
use crate::error::EngineError;
use crate::ports::{SpeechQueue, engine_ports};
use crate::replay::ReplayOptions;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if the arguments, configuration, or script are invalid.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments.
    let args = EngineArgs::parse(std::env::args().skip(1))?;

    // 2. Load configuration.
    let config = load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    // 3. Initialize structured logging.
    init_logging(&config.logging);
    info!("smashpad-engine starting");
    info!(
        config = %args.config.display(),
        cooldown_ms = config.interaction.cooldown_ms,
        hold_duration_ms = config.interaction.hold_duration_ms,
        max_objects = config.cleanup.max_objects,
        "Configuration loaded"
    );

    // 4. Read the script.
    let text = read_script(args.script.as_deref())
        .await
        .context("reading input script")?;
    let events = script::parse_script(&text)?;
    info!(events = events.len(), "Script parsed");

    // 5. Build the core.
    let clock = ManualClock::new(0);
    let speech = SpeechQueue::default();
    let mut core = InteractionCore::new(
        config,
        Arc::new(clock.clone()),
        ObjectCatalog::from_os_rng(),
        engine_ports(&clock, &speech),
    )?;

    // 6. Replay.
    let options = ReplayOptions {
        realtime: args.realtime,
        ..ReplayOptions::default()
    };
    let result = replay::run_replay(&mut core, &clock, &speech, &events, options).await;
    replay::log_replay_end(&result);

    info!("smashpad-engine shutdown complete");
    Ok(())
}

/// Load configuration, falling back to defaults when the file is missing.
fn load_config(path: &Path) -> Result<ToyConfig, EngineError> {
    if path.exists() {
        Ok(ToyConfig::from_file(path)?)
    } else {
        let mut config = ToyConfig::default();
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// `RUST_LOG` wins; otherwise the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Read the script from `path`, or stdin when `None`.
async fn read_script(path: Option<&Path>) -> Result<String, EngineError> {
    match path {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut text = String::new();
            tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut text).await?;
            Ok(text)
        }
    }
}
