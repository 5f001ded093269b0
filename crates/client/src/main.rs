//! Combat tracker console binary.
//!
//! This binary is the composition root that assembles:
//! 1. Oracles seeded from an encounter file
//! 2. The authoritative host via RuntimeBuilder
//! 3. One in-process observer
//! 4. The console front end
//!
//! # Examples
//!
//! ```bash
//! cargo run -p combat-client -- crates/client/encounters/ford.ron
//!
//! # Keep the session on disk and resume it on the next run
//! ENABLE_PERSISTENCE=true COMBAT_SESSION_ID=ford cargo run -p combat-client -- ford.ron
//! ```

mod console;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};

use combat_runtime::{Encounter, OracleManager, PeerId, Runtime, RuntimeConfig};

use crate::console::{Console, spawn_lifecycle_printer};

const OBSERVER_PEER: PeerId = PeerId(1);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = RuntimeConfig::from_env();
    let log_file = logging::setup_logging(&config.session_id)?;

    let encounter_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: combat <encounter.ron>")?;
    let encounter = Encounter::load_from_file(&encounter_path)
        .with_context(|| format!("failed to load encounter {}", encounter_path.display()))?;

    let oracles = OracleManager::default();
    oracles.settings().set_skip_defeated(config.skip_defeated);
    let roster = encounter.install(oracles.pieces());

    tracing::info!(
        "Loaded encounter '{}' with {} combatants",
        encounter.name,
        roster.len()
    );

    let runtime = Runtime::builder()
        .config(config)
        .oracles(oracles.clone())
        .roster(roster)
        .build()
        .await
        .context("failed to start host runtime")?;
    let observer = runtime
        .observer(OBSERVER_PEER)
        .context("failed to connect observer")?;

    println!("{} (session {})", encounter.name, runtime.session_id());
    println!("logs: {}\n", log_file.display());

    let printer = spawn_lifecycle_printer(&runtime.handle());
    let result = Console::new(runtime.handle(), observer, oracles).run().await;

    printer.abort();
    runtime
        .shutdown()
        .await
        .context("failed to shut down runtime")?;

    result
}
