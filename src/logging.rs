//! Logging setup using tracing.
//!
//! The terminal belongs to the TUI, so logs go to a file:
//! `~/.local/share/contact-tui/logs/contact-tui.log` unless `--log-dir` says
//! otherwise. The filter comes from `CONTACT_TUI_LOG`.

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::Result;

pub const LOG_ENV: &str = "CONTACT_TUI_LOG";
pub const LOG_FILE: &str = "contact-tui.log";

/// Install the global subscriber. Returns the directory logs are written to.
pub fn init(dir: Option<PathBuf>) -> Result<PathBuf> {
    let log_dir = dir.unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("contact_tui=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(dir = %log_dir.display(), "contact-tui starting");
    Ok(log_dir)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contact-tui")
        .join("logs")
}
