//! `p4x` -- Perforce actions for editors.
//!
//! This is the entry point of the p4x CLI. It parses CLI arguments with
//! clap, resolves the runtime context, and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let Some(command) = cli.command else {
        // No subcommand -- print help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        return;
    };

    let result = match RuntimeContext::from_global_args(&cli.global, command.active_file()) {
        Ok(ctx) => commands::dispatch(&ctx, &command).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "command finished");
            if outcome.is_failure() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            if cli.global.json {
                let err_json = serde_json::json!({
                    "error": format!("{:#}", e),
                });
                if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                    eprintln!("{}", s);
                }
            } else {
                eprintln!("Error: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}

/// Debug output for p4x crates with `--verbose`, otherwise `RUST_LOG` or
/// warnings only. Logs go to stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("p4x=debug,perforce_exec=debug,perforce_ui=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
