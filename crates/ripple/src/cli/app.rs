use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ripple_archive::{
    CorruptPolicy, ExtractOptions, HashStrategy, PermissionStrategy, Progress, RippleEngine,
    UnzipReport,
};
use tracing::info;

use crate::ui::ExtractSpinner;

#[derive(Clone, Debug, Parser)]
#[command(name = "ripple", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// Directory or .zip/.7z archive to extract
    pub input: PathBuf,
    /// Directory the mirrored tree is written to
    pub output: PathBuf,

    /// Also record warnings and errors in this file
    #[arg(long, env = "RIPPLE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Leave unreadable nested archives in place instead of aborting
    #[arg(long)]
    pub skip_corrupt: bool,

    /// Log the SHA-256 digest of every extracted file
    #[arg(long)]
    pub sha256: bool,

    /// Keep archive permission bits as stored
    #[arg(long)]
    pub preserve_permissions: bool,

    #[arg(short, long)]
    pub verbose: bool,

    /// No progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}

impl App {
    pub fn options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::default();
        if self.skip_corrupt {
            options = options.corrupt_policy(CorruptPolicy::Skip);
        }
        if self.sha256 {
            options = options.hash_strategy(HashStrategy::Sha256);
        }
        if self.preserve_permissions {
            options = options.permission_strategy(PermissionStrategy::Preserve);
        }
        options
    }

    pub fn run(&self) -> anyhow::Result<UnzipReport> {
        let spinner = (!self.quiet).then(ExtractSpinner::new);

        let sink = spinner.clone();
        let options = self.options().on_progress(Arc::new(move |progress: Progress| {
            if let (Some(hash), Some(file)) = (&progress.hash, &progress.current_file) {
                info!("{hash}  {}", file.display());
            }
            if let Some(spinner) = &sink {
                spinner.update(&progress);
            }
        }));

        let result = RippleEngine::new(&self.input, &self.output, options).run();

        if let Some(spinner) = spinner {
            match &result {
                Ok(report) => spinner.finish(report),
                Err(_) => spinner.abandon(),
            }
        }
        Ok(result?)
    }
}
