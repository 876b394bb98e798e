use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RAFFLE_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// The TUI owns the terminal, so it only logs when a file is given. Text/JSON
/// modes log to stderr and keep stdout for results.
pub fn init(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;
    } else if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;
    }
    Ok(())
}
