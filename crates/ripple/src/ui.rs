use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use ripple_archive::{Progress, UnzipReport};

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>8.cyan.bold} [{elapsed_precise}] {bytes} {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// The spinner currently drawing on stderr, if any.
static ACTIVE: Lazy<Mutex<Option<ProgressBar>>> = Lazy::new(|| Mutex::new(None));

fn active() -> Option<ProgressBar> {
    ACTIVE.lock().ok().and_then(|active| active.clone())
}

fn set_active(pb: Option<ProgressBar>) {
    if let Ok(mut active) = ACTIVE.lock() {
        *active = pb;
    }
}

/// Stderr writer for the log console. While a spinner is drawing, the
/// spinner is cleared for the duration of each write and redrawn after.
pub struct ConsoleWriter;

pub fn console_writer() -> ConsoleWriter {
    ConsoleWriter
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active() {
            Some(pb) => pb.suspend(|| io::stderr().write(buf)),
            None => io::stderr().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match active() {
            Some(pb) => pb.suspend(|| io::stderr().write_all(buf)),
            None => io::stderr().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[derive(Clone)]
pub struct ExtractSpinner {
    pb: ProgressBar,
}

impl ExtractSpinner {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        let pb = match SPINNER_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.enable_steady_tick(Duration::from_millis(100));
        set_active(Some(pb.clone()));
        Self { pb }
    }

    pub fn update(&self, progress: &Progress) {
        self.pb.set_prefix(format!("pass {}", progress.pass));
        self.pb.set_position(progress.bytes_processed);
        if let Some(name) = progress.current_file.as_ref().and_then(|f| f.file_name()) {
            self.pb.set_message(name.to_string_lossy().into_owned());
        }
    }

    pub fn finish(self, report: &UnzipReport) {
        set_active(None);
        self.pb.finish_with_message(format!(
            "{} {} archives, {} files",
            style("done").green().bold(),
            report.archives_extracted,
            report.files_written
        ));
    }

    pub fn abandon(self) {
        set_active(None);
        self.pb.abandon();
    }
}
