//! contact-tui binary entry point.
//!
//! Loads configuration, initializes the terminal in raw mode, runs the TUI
//! event loop, and restores the terminal state on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use contact_tui::app::{self, AppState, Theme, keymap::Keymap, relayconf};
use contact_tui::cli::Cli;
use contact_tui::modal::markup;
use contact_tui::relay::Relay;
use contact_tui::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.log_dir.clone()) {
        eprintln!("logging disabled: {e:#}");
    }

    let mut relay_cfg = relayconf::load_or_init(&cli.relay_config);
    cli.apply_to(&mut relay_cfg);
    if !relay_cfg.is_configured() {
        tracing::warn!(path = %cli.relay_config, "relay destination not configured, submissions are simulated");
    }

    let mut state = AppState::new(
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
        markup::source_for(cli.form.as_deref()),
        Relay::new(relay_cfg),
    );

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, cli.initial_modal());

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
