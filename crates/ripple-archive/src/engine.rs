//! Iterative recursive extraction.
//!
//! The engine runs in passes. A pass drains a queue of [`ExtractionTask`]s:
//! directories are walked structurally (their children are appended to the
//! same queue) and archives are extracted. Every file an extraction
//! materializes is then rescanned; the archives among them seed the next
//! pass. The run ends at the first pass that materializes no archive.
//!
//! Nesting depth is bounded only by the data, so nothing here recurses on
//! the call stack.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use ripple_fs::{copy_file, ensure_dir, sorted_entries};
use tracing::{debug, info, warn};

use crate::entry::{ArchiveReport, ExtractedEntry};
use crate::error::{Error, Result};
use crate::extract::extract_tracked;
use crate::format::{ArchiveFormat, PathKind, classify};
use crate::options::{CorruptPolicy, ExtractOptions, Progress};
use crate::sanitize::destination_for;

/// Where the source of a task lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The top-level input itself.
    Root,
    /// Somewhere below the top-level input directory. Read only.
    Input,
    /// Materialized by a previous extraction inside the output tree.
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Directory,
    Archive(ArchiveFormat),
}

/// A pending unit of work with its already-computed destination.
#[derive(Clone, Debug)]
pub struct ExtractionTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: TaskKind,
    pub origin: Origin,
}

impl ExtractionTask {
    pub fn directory(source: PathBuf, destination: PathBuf, origin: Origin) -> Self {
        Self {
            source,
            destination,
            kind: TaskKind::Directory,
            origin,
        }
    }

    pub fn archive(source: PathBuf, format: ArchiveFormat, destination: PathBuf, origin: Origin) -> Self {
        Self {
            source,
            destination,
            kind: TaskKind::Archive(format),
            origin,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UnzipReport {
    /// Number of traversal passes; `1` when nothing nested was found.
    pub passes: usize,
    pub archives_extracted: usize,
    pub files_written: usize,
    pub directories_created: usize,
    pub total_bytes: u64,
    /// Nested archives left in place under [`CorruptPolicy::Skip`].
    pub skipped: Vec<PathBuf>,
}

/// Recursively extract `input` into `output` with default options.
pub fn ripple_unzip(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<UnzipReport> {
    RippleEngine::new(input, output, ExtractOptions::default()).run()
}

pub struct RippleEngine {
    input: PathBuf,
    output: PathBuf,
    options: ExtractOptions,
}

impl RippleEngine {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>, options: ExtractOptions) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn run(&self) -> Result<UnzipReport> {
        let root = self.classify_root()?;
        ensure_dir(&self.output)?;
        let excluded = match root.kind {
            TaskKind::Directory => self.output_within_input()?,
            TaskKind::Archive(_) => None,
        };

        let mut report = UnzipReport::default();
        let mut pending = VecDeque::from([root]);

        while !pending.is_empty() {
            report.passes += 1;
            info!(pass = report.passes, tasks = pending.len(), "starting pass");

            let written = self.traverse(&mut pending, &mut report, excluded.as_deref())?;
            pending = self.rescan(written)?;
        }

        info!(
            passes = report.passes,
            archives = report.archives_extracted,
            files = report.files_written,
            "reached fixed point"
        );
        Ok(report)
    }

    fn classify_root(&self) -> Result<ExtractionTask> {
        if !self.input.exists() {
            return Err(Error::InvalidPath(self.input.clone()));
        }

        match classify(&self.input) {
            PathKind::Directory => Ok(ExtractionTask::directory(
                self.input.clone(),
                self.output.clone(),
                Origin::Root,
            )),
            PathKind::Archive(format) => Ok(ExtractionTask::archive(
                self.input.clone(),
                format,
                self.output.clone(),
                Origin::Root,
            )),
            PathKind::Unsupported => Err(Error::UnsupportedType),
        }
    }

    /// Where the output root shows up while walking the input directory,
    /// if it lies inside it. Fails when both are the same directory.
    fn output_within_input(&self) -> Result<Option<PathBuf>> {
        let input = canonical(&self.input)?;
        let output = canonical(&self.output)?;
        if input == output {
            return Err(Error::OutputIsInput(self.output.clone()));
        }
        Ok(output
            .strip_prefix(&input)
            .ok()
            .map(|relative| self.input.join(relative)))
    }

    /// Drain the queue; return every file extraction materialized.
    fn traverse(
        &self,
        queue: &mut VecDeque<ExtractionTask>,
        report: &mut UnzipReport,
        excluded: Option<&Path>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        while let Some(task) = queue.pop_front() {
            debug!(source = %task.source.display(), kind = ?task.kind, "processing task");
            match task.kind {
                TaskKind::Directory => self.walk_directory(&task, queue, report, excluded)?,
                TaskKind::Archive(format) => {
                    if let Some(extracted) = self.extract_archive(&task, format, report)? {
                        written.extend(extracted.files().map(|e| e.target_path.clone()));
                    }
                }
            }
        }

        Ok(written)
    }

    fn walk_directory(
        &self,
        task: &ExtractionTask,
        queue: &mut VecDeque<ExtractionTask>,
        report: &mut UnzipReport,
        excluded: Option<&Path>,
    ) -> Result<()> {
        ensure_dir(&task.destination)?;
        report.directories_created += 1;

        for entry in sorted_entries(&task.source)? {
            let child = entry.path;
            if excluded == Some(child.as_path()) {
                debug!(path = %child.display(), "not descending into the output root");
                continue;
            }
            // Links are never followed: a link may point back up the tree
            // or out of the input altogether.
            if entry.file_type.is_symlink() {
                warn!(path = %child.display(), "skipping symbolic link");
                continue;
            }

            let destination = destination_for(&child, &task.source, &task.destination)?;
            let kind = if entry.file_type.is_dir() {
                PathKind::Directory
            } else {
                classify(&child)
            };
            match kind {
                PathKind::Directory => {
                    queue.push_back(ExtractionTask::directory(child, destination, Origin::Input));
                }
                PathKind::Archive(format) => {
                    queue.push_back(ExtractionTask::archive(child, format, destination, Origin::Input));
                }
                PathKind::Unsupported => {
                    let size = copy_file(&child, &destination)?;
                    let hash = self.options.hash_strategy.compute_file(&destination)?;
                    self.record_file(report, &destination, size, hash.as_deref());
                }
            }
        }

        Ok(())
    }

    fn extract_archive(
        &self,
        task: &ExtractionTask,
        format: ArchiveFormat,
        report: &mut UnzipReport,
    ) -> Result<Option<ArchiveReport>> {
        let fresh = !task.destination.exists();
        let mut entries = Vec::new();
        match extract_tracked(&task.source, format, &task.destination, &self.options, &mut entries) {
            Ok(()) => {}
            Err(e) if e.is_corrupt() && self.skips(task) => {
                warn!(
                    archive = %task.source.display(),
                    error = %e,
                    "skipping unreadable archive, left in place for manual extraction"
                );
                self.discard_partial(task, fresh, &entries)?;
                self.keep_in_place(task)?;
                report.skipped.push(task.source.clone());
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
        let extracted = ArchiveReport::new(format, entries);

        report.archives_extracted += 1;
        for entry in &extracted.entries {
            if entry.is_directory {
                report.directories_created += 1;
            } else {
                self.record_file(report, &entry.target_path, entry.size, entry.hash.as_deref());
            }
        }

        if task.origin == Origin::Output {
            std::fs::remove_file(&task.source).map_err(|e| ripple_fs::Error::Write {
                path: task.source.clone(),
                source: e,
            })?;
            debug!(archive = %task.source.display(), "removed consumed archive");
        }

        Ok(Some(extracted))
    }

    /// Turn freshly written archive files into the next pass's tasks.
    fn rescan(&self, mut written: Vec<PathBuf>) -> Result<VecDeque<ExtractionTask>> {
        written.sort();
        written.dedup();

        let mut next = VecDeque::new();
        for path in written {
            if let PathKind::Archive(format) = classify(&path) {
                let destination = destination_for(&path, &self.output, &self.output)?;
                next.push_back(ExtractionTask::archive(path, format, destination, Origin::Output));
            }
        }

        if !next.is_empty() {
            debug!(archives = next.len(), "rescan found nested archives");
        }
        Ok(next)
    }

    fn skips(&self, task: &ExtractionTask) -> bool {
        self.options.corrupt_policy == CorruptPolicy::Skip && task.origin != Origin::Root
    }

    /// Remove what a failed extraction wrote before it broke off. A
    /// destination the extraction created goes entirely; in a pre-existing
    /// one only the written files do.
    fn discard_partial(&self, task: &ExtractionTask, fresh: bool, entries: &[ExtractedEntry]) -> Result<()> {
        let write_err = |path: &Path, e| ripple_fs::Error::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if fresh {
            if task.destination.exists() {
                std::fs::remove_dir_all(&task.destination)
                    .map_err(|e| write_err(&task.destination, e))?;
            }
        } else {
            for entry in entries.iter().filter(|e| !e.is_directory) {
                std::fs::remove_file(&entry.target_path)
                    .map_err(|e| write_err(&entry.target_path, e))?;
            }
        }
        debug!(archive = %task.source.display(), "discarded partial extraction");
        Ok(())
    }

    /// Make sure a skipped archive sits at its mirrored position as a file.
    fn keep_in_place(&self, task: &ExtractionTask) -> Result<()> {
        if task.origin != Origin::Input {
            return Ok(());
        }
        let Some(name) = task.source.file_name() else {
            return Ok(());
        };
        let target = match task.destination.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        };
        copy_file(&task.source, &target)?;
        Ok(())
    }

    fn record_file(&self, report: &mut UnzipReport, path: &Path, size: u64, hash: Option<&str>) {
        report.files_written += 1;
        report.total_bytes += size;
        self.options.report_progress(|| Progress {
            pass: report.passes,
            bytes_processed: report.total_bytes,
            current_file: Some(path.to_path_buf()),
            hash: hash.map(str::to_owned),
        });
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        ripple_fs::Error::Read {
            path: path.to_path_buf(),
            source: e,
        }
        .into()
    })
}
