mod cli;
mod engine;
mod error;
mod logging;
mod model;
mod orchestrator;
mod registry;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = !args.is_interactive();
    logging::init(args.log_file.as_deref(), args.is_interactive())?;

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            if is_non_tui {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
