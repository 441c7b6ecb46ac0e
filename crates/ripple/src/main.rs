use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use crate::cli::App;

mod cli;
mod logging;
mod ui;

fn main() -> ExitCode {
    let app = App::parse();

    if let Err(e) = logging::init(app.verbose, app.log_file.as_deref()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    info!("Tool is starting...");

    let code = match app.run() {
        Ok(report) => {
            info!(
                passes = report.passes,
                archives = report.archives_extracted,
                files = report.files_written,
                bytes = report.total_bytes,
                "extraction finished"
            );
            for skipped in &report.skipped {
                info!(archive = %skipped.display(), "left for manual extraction");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    };

    info!("Tool has completed");
    info!("Elapsed time: {:.2} seconds", start.elapsed().as_secs_f64());
    code
}
