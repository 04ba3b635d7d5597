//! revue — terminal code review.
//!
//! Entry point for the `revue` binary. Wires together the terminal lifecycle
//! (`tui`), unified event bus (`event`), review wiring (`dispatch`), the
//! particle backdrop (`background`), and rendering (`ui`).
//!
//! # Startup sequence
//!
//! 1. Parse the CLI and load the config. Errors here print normally because
//!    the terminal is untouched.
//! 2. Install the file logger (failure only disables logging).
//! 3. `install_panic_hook()` — installed before `init_tui()` so a panic always
//!    restores the terminal before the message prints.
//! 4. `register_sigterm()` — flag polled in the event loop.
//! 5. `init_tui()`, then the event task, the background animation, and the
//!    optional startup file.
//!
//! # Safety
//!
//! `restore_tui()` runs after the event loop exits (quit key, SIGTERM, or
//! channel close). The loop never uses `?`; a draw error is stored in
//! `outcome` and returned after the terminal is restored.

mod app;
mod background;
mod cli;
mod config;
mod dispatch;
mod event;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use revue_core::{Analyzer, FileIntake, MockAnalyzer};

use crate::app::AppState;
use crate::background::{Animation, ParticleField, PARTICLE_COUNT, STEP_PERIOD};
use crate::cli::Cli;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli.config.clone().unwrap_or_else(config::config_path);
    let mut cfg = Config::load(&config_file)?;
    cfg.apply_cli(&cli);

    // Logging is optional: a read-only state dir should not stop the TUI.
    if let Err(e) = logging::init(&config::log_path()) {
        eprintln!("revue: logging disabled: {e:#}");
    }
    tracing::info!(config = %config_file.display(), "revue starting");

    let theme = theme::Theme::from_name(&cfg.theme);
    let policy = cfg.intake_policy();
    let analyzer = Arc::new(MockAnalyzer::new(cfg.analysis_delay()));
    let mut state = AppState::new(policy.clone(), analyzer.name());
    highlight::warm_up();

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("failed to register SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("failed to initialise terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;
    let mut dispatcher = Dispatcher::new(handler.tx, FileIntake::new(policy), analyzer);

    let animation = Animation::start(
        ParticleField::new(PARTICLE_COUNT, &mut rand::thread_rng()),
        STEP_PERIOD,
    );

    if let Some(path) = cli.file {
        dispatcher.submit_path(&mut state, path);
    }

    let mut outcome: anyhow::Result<()> = Ok(());

    // Exits only via `break`, so `restore_tui()` below is always reached.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked even when no events arrive.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    None => break 'event_loop,
                    Some(AppEvent::Render) => {
                        let particles = animation.particles();
                        if let Err(e) = terminal
                            .draw(|frame| ui::render(frame, &mut state, &theme, &particles))
                        {
                            outcome = Err(e).context("failed to draw frame");
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Tick) => {
                        state.expire_status(Instant::now());
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::Paste(text)) => keybindings::handle_paste(&text, &mut state),
                    // ratatui picks up the new size on the next draw.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::IntakeFinished { ticket, result }) => {
                        dispatcher.apply_intake(&mut state, ticket, *result);
                        KeyAction::Continue
                    }
                    Some(AppEvent::AnalysisFinished { ticket, result }) => {
                        dispatcher.apply_analysis(&mut state, ticket, result);
                        KeyAction::Continue
                    }
                    Some(AppEvent::PreviewReady { generation, lines }) => {
                        dispatcher.apply_preview(&mut state, generation, lines);
                        KeyAction::Continue
                    }
                };

                match action {
                    KeyAction::Continue => {}
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::SubmitPath(path) => dispatcher.submit_path(&mut state, path),
                    KeyAction::LoadSample(sample) => dispatcher.submit_sample(&mut state, sample),
                    KeyAction::Analyze => dispatcher.request_analysis(&mut state),
                    KeyAction::Remove => dispatcher.remove(&mut state),
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    drop(animation);
    tui::restore_tui().context("failed to restore terminal")?;
    tracing::info!(reviews = state.history.len(), "revue exiting");
    outcome
}
