//! A terminal story deck with FLIP layout transitions.
//!
//! Cards can be shuffled and sorted (every card glides from where it was to
//! where it lands), opened into a detail view that grows out of the card,
//! and the header plays a few small intro effects.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::{
    deck::Deck,
    engine::Engine,
    settings::{reduced_motion_from_env, SharedSettings},
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    about = "Shuffle, sort and open a deck of cards with animated layout transitions"
)]
struct Cli {
    /// Deck file (TOML).  Uses the built-in deck when omitted.
    deck: Option<PathBuf>,

    /// Apply every change immediately, without animation.
    #[arg(long)]
    reduced_motion: bool,

    /// Animation frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for shuffles and confetti, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only prints when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── load everything before touching the terminal ──────────
    let deck = match &cli.deck {
        Some(path) => {
            Deck::load(path).with_context(|| format!("loading deck {}", path.display()))?
        }
        None => Deck::builtin(),
    };
    let engine = Engine::new(cli.fps)?;
    let user_config = config::AppConfig::load();
    let reduced = cli.reduced_motion || reduced_motion_from_env();
    let settings = SharedSettings::new(user_config.motion_settings(reduced));
    tracing::info!(
        cards = deck.cards.len(),
        fps = cli.fps,
        motion = settings.read().motion_enabled,
        "starting"
    );

    let mut state = AppState::new(deck, user_config, settings, engine, cli.seed);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

/// Frame loop: draw, then wait for either input or the next animation frame.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader();
    let mut frames = tokio::time::interval(state.engine.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // First draw sizes the grid so the intro starts from real positions.
    terminal.draw(|frame| ui::draw(frame, state))?;
    state.start_intro();

    let mut last_tick = Instant::now();
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| ui::draw(frame, state))?;
            dirty = false;
        }

        tokio::select! {
            biased;

            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    tracing::warn!("terminal event reader stopped");
                    break;
                };
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize => {}
                }
                dirty = true;
            }

            _ = frames.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick);
                last_tick = now;
                // Idle frames cost nothing: nothing ticks, nothing redraws.
                if state.engine.is_active() {
                    state.tick(dt);
                    dirty = true;
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
