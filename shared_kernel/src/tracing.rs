use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs the global JSON subscriber.
///
/// The terminal UI owns stdout, so records go to `log_file` instead. The level comes from
/// `RUST_LOG` and defaults to `info`.
pub fn config_telemetry(service_name: &'static str, log_file: &Path) -> anyhow::Result<()> {
    // Needed to forward ordinary log statements to our tracing subscriber.
    tracing_log::LogTracer::init().context("Failed to initialize log tracer")?;

    if let Some(directory) = log_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_thread_names(true)
                .with_writer(Mutex::new(file)),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber")?;

    tracing::info!(service.name = service_name, "telemetry configured");
    Ok(())
}
