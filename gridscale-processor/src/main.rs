use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gridscale_processor::jobs::JobStore;
use gridscale_processor::processor::JobProcessor;
use log::{info, warn};
use tokio::io::AsyncBufReadExt;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("starting gridscale-processor");

    let output_dir = env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("outputs"));
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("could not create output directory: {}", output_dir.display()))?;

    info!("configuration:");
    info!("  OUTPUT_DIR: {}", output_dir.display());

    let processor = JobProcessor::new(JobStore::new(), output_dir);

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to register SIGTERM handler")?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .context("failed to register SIGINT handler")?;

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("received SIGTERM, initiating graceful shutdown...");
            }
            _ = sigint.recv() => {
                info!("received SIGINT, initiating graceful shutdown...");
            }
        }
        let _ = shutdown_tx_clone.send(());
    });

    // Intake: one JSON job request per stdin line. Dropping the sender on
    // EOF closes the channel and lets the worker drain gracefully.
    let (intake_tx, intake_rx) = tokio::sync::mpsc::channel::<String>(64);
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    if intake_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed, no further requests will be accepted");
                    break;
                }
                Err(e) => {
                    warn!("failed to read request line: {e}");
                    break;
                }
            }
        }
    });

    let result = processor.listen_and_process(intake_rx, shutdown_rx).await;

    if let Err(e) = &result {
        warn!("processor exited with error: {e}");
    }

    result
}
