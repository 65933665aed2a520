pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod results;
pub mod rows;
pub mod ui;

pub use error::{EstimatorError, Result};

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize tracing/logging to stderr
///
/// `RUST_LOG` overrides `default_level`. Can only be called once.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Initialize tracing/logging to an append-only file
///
/// Used while the interactive form owns the terminal, so log lines never
/// corrupt the screen.
pub fn init_file_tracing(path: &Path, default_level: &str) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
