pub mod alarm;
pub mod audio;
pub mod clock;
pub mod commands;
pub mod engine;
pub mod events;
pub mod settings;
pub mod stopwatch;
pub mod terminal;
pub mod ticker;
pub mod utils;
pub mod world_clock;

use std::sync::Arc;

use anyhow::{Context, Result};
use clock::SystemWallClock;
use commands::{dispatch, Command, Outcome, HELP};
use engine::Engine;
use settings::SettingsStore;
use terminal::TerminalDisplay;
use tokio::io::{AsyncBufReadExt, BufReader};
use world_clock::WorldClock;

pub struct AppState {
    pub engine: Engine,
    pub settings: SettingsStore,
    pub display: Arc<TerminalDisplay>,
}

impl AppState {
    pub fn new(settings: SettingsStore) -> Self {
        let engine_settings = settings.settings();
        let display = Arc::new(TerminalDisplay::new());
        let world = WorldClock::load(&engine_settings.world_regions);

        let engine = Engine::new(
            &engine_settings,
            Arc::new(SystemWallClock::new()),
            audio::system_sound_port(),
            world,
            display.clone(),
        );

        Self {
            engine,
            settings,
            display,
        }
    }
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var, defaults to info)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("TimeMate starting up...");

    // All engine state is driven from a single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(serve())
}

async fn serve() -> Result<()> {
    let settings = SettingsStore::from_env()?;
    log::info!("Settings loaded from {}", settings.path().display());

    let state = AppState::new(settings);
    state.engine.start().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read command from stdin")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = match line.parse::<Command>() {
            Ok(command) => dispatch(&state, command).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(Outcome::Reply(text)) => println!("{text}"),
            Ok(Outcome::Quit) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }

    state.engine.shutdown().await;
    log::info!("TimeMate shut down");
    Ok(())
}
