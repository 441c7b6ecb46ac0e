use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt;

use crate::ui::console_writer;

/// Console output filtered by `RUST_LOG` (default `info`, `debug` with
/// `verbose`), plus warnings and errors mirrored into `log_file`. Console
/// lines are written around the progress spinner, never through it.
pub fn init(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let console = fmt::layer()
        .with_writer(console_writer)
        .with_target(false)
        .with_filter(filter);

    let file = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(LevelFilter::WARN),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("failed to install log subscriber")
}
