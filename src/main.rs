mod cli;
mod config;
mod report;
mod scan;
mod session;
mod tracker;
mod watcher;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

use cli::Cli;
use config::WatchConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays a clean event log.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = WatchConfig::from_cli(&cli)?;

    // The session itself only knows about a shutdown channel; the operator
    // trigger lives out here.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        wait_for_operator().await;
        let _ = shutdown_tx.send(());
    });

    println!(
        "Watching {} (filter {}). Press Enter to stop.",
        config.folder.display(),
        config.filter.as_str()
    );

    session::run(config, shutdown_rx).await?;

    // The stdin reader may still be parked on a blocking read (Ctrl-C path);
    // exit directly instead of waiting on runtime teardown.
    std::process::exit(0);
}

/// Resolve when the operator presses Enter or sends Ctrl-C.
async fn wait_for_operator() {
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        _ = stdin.read_line(&mut line) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}
