//! Main entry point for the ytgrab CLI

use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ytgrab::cli::app::EXIT_INTERRUPTED;
use ytgrab::cli::{App, Args, DialoguerPrompter};
use ytgrab::YtDlp;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!("Starting ytgrab with args: {:?}", args);

    // Prompts block the main thread, so the interrupt is watched from a worker
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = console::Term::stdout().show_cursor();
            eprintln!("\n\nDownload cancelled by user.");
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });

    let extractor = YtDlp::new().with_binary(&args.yt_dlp);
    let outcome = App::new(args, extractor, DialoguerPrompter::new())
        .run()
        .await;

    info!("Finished with {:?}", outcome);
    ExitCode::from(outcome.exit_code())
}

/// Initialize logging system
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    // RUST_LOG wins; otherwise stay quiet unless --verbose
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so they never break the progress line
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
