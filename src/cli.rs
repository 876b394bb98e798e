use crate::model::{DrawConfig, InfoEvent, RaffleEvent};
use crate::orchestrator::{run_controller, UiCommand};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "raffle-picker",
    version,
    about = "Pick a random raffle winner, with an optional confetti TUI"
)]
pub struct Cli {
    /// Suspense delay before the winner is revealed
    #[arg(long, default_value = "2s")]
    pub draw_delay: humantime::Duration,

    /// How long the confetti celebration lasts
    #[arg(long, default_value = "7s")]
    pub celebration: humantime::Duration,

    /// Seed the random source for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read audience names from a file, one per line (stdin is used in text/JSON mode otherwise)
    #[arg(long)]
    pub names_file: Option<std::path::PathBuf>,

    /// Draw once and print the winner as JSON (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Draw once and print the winner as text (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Append logs to this file (honours RAFFLE_LOG)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.text
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_oneshot(args).await;
        }
    }

    run_oneshot(args).await
}

/// Build a `DrawConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> DrawConfig {
    DrawConfig {
        draw_delay: Duration::from(args.draw_delay),
        celebration: Duration::from(args.celebration),
        seed: args.seed,
    }
}

/// Read the names file, if one was given.
pub fn read_names_file(args: &Cli) -> Result<Option<String>> {
    args.names_file
        .as_deref()
        .map(|p| {
            std::fs::read_to_string(p).with_context(|| format!("read names from {}", p.display()))
        })
        .transpose()
}

async fn read_names(args: &Cli) -> Result<String> {
    if let Some(names) = read_names_file(args)? {
        return Ok(names);
    }
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("read names from stdin")?;
    Ok(buf)
}

/// Add the names, draw once, print the result and exit.
async fn run_oneshot(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let names = read_names(&args).await?;
    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<RaffleEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let handle = tokio::spawn(run_controller(cfg, evt_tx, cmd_rx));
    let _ = cmd_tx.send(UiCommand::AddAudience(names));
    let _ = cmd_tx.send(UiCommand::Draw);

    let mut entrants: Vec<String> = Vec::new();
    let mut outcome: Result<()> = Err(anyhow::anyhow!("draw ended without a winner"));

    while let Some(ev) = evt_rx.recv().await {
        match ev {
            RaffleEvent::AudienceChanged { entrants: names } => entrants = names,
            RaffleEvent::Info(info @ InfoEvent::Added { .. }) if args.text => {
                let _ = out_tx.send(OutputLine::Stderr(info.to_message()));
            }
            RaffleEvent::PhaseChanged { phase } if args.text => {
                let _ = out_tx.send(OutputLine::Stderr(format!("== {phase:?} ==")));
            }
            RaffleEvent::Rejected(msg) => {
                outcome = Err(anyhow::anyhow!(msg));
                break;
            }
            RaffleEvent::DrawCompleted { record } => {
                if args.json {
                    let out = serde_json::to_string_pretty(&record)?;
                    let _ = out_tx.send(OutputLine::Stdout(out));
                } else {
                    let summary = crate::text_summary::build_text_summary(&record, &entrants);
                    for line in summary.lines {
                        let _ = out_tx.send(OutputLine::Stdout(line));
                    }
                }
                outcome = Ok(());
                break;
            }
            _ => {}
        }
    }

    // No celebration in one-shot mode; stop the controller right away.
    let _ = cmd_tx.send(UiCommand::Quit);
    handle
        .await
        .context("raffle controller task failed")?
        .context("raffle controller failed")?;

    drop(out_tx);
    let _ = out_handle.await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_recognized_delays() {
        let args = Cli::parse_from(["raffle-picker"]);
        let cfg = build_config(&args);
        assert_eq!(cfg.draw_delay, Duration::from_millis(2000));
        assert_eq!(cfg.celebration, Duration::from_millis(7000));
        assert_eq!(cfg.seed, None);
        assert!(args.is_interactive());
    }

    #[test]
    fn humantime_delays_and_seed_are_parsed() {
        let args = Cli::parse_from([
            "raffle-picker",
            "--draw-delay",
            "500ms",
            "--celebration",
            "1m",
            "--seed",
            "9",
            "--text",
        ]);
        let cfg = build_config(&args);
        assert_eq!(cfg.draw_delay, Duration::from_millis(500));
        assert_eq!(cfg.celebration, Duration::from_secs(60));
        assert_eq!(cfg.seed, Some(9));
        assert!(!args.is_interactive());
    }

    #[test]
    fn missing_names_file_is_an_error() {
        let args = Cli::parse_from([
            "raffle-picker",
            "--names-file",
            "/nonexistent/raffle-names.txt",
        ]);
        let err = read_names_file(&args).unwrap_err();
        assert!(format!("{err:#}").contains("read names from"));
    }
}
