//! Pipe Demo
//!
//! Loads a logger configuration (or uses stdout), starts the dispatch loop,
//! feeds it from several producer tasks plus a direct write, watches the
//! error channel, then drains on shutdown.
//!
//! Run with: cargo run -p alog_demos --bin pipe_demo -- demos/alog.toml

use std::path::Path;

use alog::Alog;
use config_loader::ConfigLoader;
use contracts::{LoggerConfig, SinkType};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ==== Stage 1: Use default config or load from file ====
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => ConfigLoader::load_from_path(Path::new(path))?,
        None => LoggerConfig::default(),
    };

    // Diagnostics share stderr, keep them out of a stderr sink
    let diagnostics = config.sink.sink_type != SinkType::Stderr;
    observability::init_with_config(ObservabilityConfig::default().with_diagnostics(diagnostics))?;

    tracing::info!(config = ?config_path, "Starting Pipe Demo");

    // ==== Stage 2: Build and start the logger ====
    let log = Alog::from_config(&config).await?;
    log.start()?;

    // ==== Stage 3: Monitor the error channel ====
    let errors = log.error_channel();
    let monitor = tokio::spawn(async move {
        let mut count = 0u64;
        while let Some(err) = errors.recv().await {
            count += 1;
            tracing::warn!(error = %err, "Log write failed");
        }
        count
    });

    // ==== Stage 4: Producers ====
    let mut producers = Vec::new();
    for worker in 0..3 {
        let sender = log.message_channel();
        producers.push(tokio::spawn(async move {
            for seq in 0..5 {
                if let Err(e) = sender.send(format!("worker {worker} event {seq}")).await {
                    tracing::error!(error = %e, "Submission rejected");
                    break;
                }
            }
        }));
    }
    for producer in producers {
        producer.await?;
    }

    let written = log.write("direct write after producers finished").await?;
    tracing::info!(bytes = written, "Direct write complete");

    // ==== Stage 5: Drain and report ====
    log.stop().await;
    let failures = monitor.await?;

    let metrics = log.metrics();
    tracing::info!(
        sink = %log.name(),
        dispatched = metrics.dispatched_count,
        written = metrics.write_count,
        bytes = metrics.bytes_written,
        failures,
        "Pipe Demo finished"
    );

    Ok(())
}
