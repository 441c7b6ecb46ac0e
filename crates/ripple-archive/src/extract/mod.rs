//! Archive extraction for ZIP and 7z formats.
//!
//! Every member is written below the destination directory under its own
//! relative path. Members that are themselves archives are written as plain
//! files; resolving them is the engine's job.
//!
//! # Platform Behavior
//!
//! **Unix**: archive mode bits are applied according to the selected
//! `PermissionStrategy`.
//!
//! **Windows (non-Unix)**: permission handling is a no-op.

use std::io::Read;
use std::path::Path;

use ripple_fs::ensure_dir;
use tracing::{debug, info};

use crate::entry::{ArchiveReport, ExtractedEntry};
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;
use crate::sanitize::SanitizedPath;

mod sevenz;
mod zip;

pub use sevenz::SevenZipExtractor;
pub use zip::ZipExtractor;

pub enum ArchiveExtractor {
    Zip(ZipExtractor),
    SevenZip(SevenZipExtractor),
}

impl ArchiveExtractor {
    pub fn format(&self) -> ArchiveFormat {
        match self {
            ArchiveExtractor::Zip(_) => ArchiveFormat::Zip,
            ArchiveExtractor::SevenZip(_) => ArchiveFormat::SevenZip,
        }
    }

    pub fn extract(
        &self,
        archive_path: &Path,
        destination: &Path,
        options: &ExtractOptions,
    ) -> Result<ArchiveReport> {
        let mut entries = Vec::new();
        self.extract_into(archive_path, destination, options, &mut entries)?;
        Ok(ArchiveReport::new(self.format(), entries))
    }

    /// Like [`extract`](Self::extract), but every member written is pushed
    /// to `entries` as it completes, so a failed run still tells what it
    /// left behind.
    pub fn extract_into(
        &self,
        archive_path: &Path,
        destination: &Path,
        options: &ExtractOptions,
        entries: &mut Vec<ExtractedEntry>,
    ) -> Result<()> {
        match self {
            ArchiveExtractor::Zip(extractor) => {
                extractor.extract(archive_path, destination, options, entries)
            }
            ArchiveExtractor::SevenZip(extractor) => {
                extractor.extract(archive_path, destination, options, entries)
            }
        }
    }
}

pub fn extractor_for(format: ArchiveFormat) -> Option<ArchiveExtractor> {
    match format {
        ArchiveFormat::Zip => Some(ArchiveExtractor::Zip(ZipExtractor)),
        ArchiveFormat::SevenZip => Some(ArchiveExtractor::SevenZip(SevenZipExtractor)),
        ArchiveFormat::Unsupported => None,
    }
}

/// Extract every member of `archive_path` into `destination`.
///
/// The destination directory is created once the archive has been opened.
pub fn extract(
    archive_path: &Path,
    format: ArchiveFormat,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let mut entries = Vec::new();
    extract_tracked(archive_path, format, destination, options, &mut entries)?;
    Ok(ArchiveReport::new(format, entries))
}

pub(crate) fn extract_tracked(
    archive_path: &Path,
    format: ArchiveFormat,
    destination: &Path,
    options: &ExtractOptions,
    entries: &mut Vec<ExtractedEntry>,
) -> Result<()> {
    let extractor = extractor_for(format).ok_or_else(|| Error::UnsupportedFormat {
        path: archive_path.to_path_buf(),
    })?;

    extractor.extract_into(archive_path, destination, options, entries)?;

    info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        entries = entries.len(),
        bytes = entries.iter().map(|e| e.size).sum::<u64>(),
        "extracted archive"
    );
    Ok(())
}

pub(crate) fn write_directory(sanitized: SanitizedPath) -> Result<ExtractedEntry> {
    ensure_dir(&sanitized.resolved)?;
    Ok(ExtractedEntry::directory(sanitized.original, sanitized.resolved))
}

pub(crate) fn write_file<R: Read + ?Sized>(
    archive_path: &Path,
    sanitized: SanitizedPath,
    reader: &mut R,
    mode: Option<u32>,
    options: &ExtractOptions,
) -> Result<ExtractedEntry> {
    let size = ripple_fs::write_from_reader(&sanitized.resolved, reader).map_err(|e| match e {
        ripple_fs::Error::Stream { source, .. } => {
            // A truncated member is never left behind.
            if let Err(e) = std::fs::remove_file(&sanitized.resolved) {
                debug!(member = %sanitized.resolved.display(), error = %e, "could not remove truncated member");
            }
            Error::corrupt(archive_path, source)
        }
        other => Error::Fs(other),
    })?;

    options
        .perm_strategy
        .apply_to_path(&sanitized.resolved, mode)?;
    let hash = options.hash_strategy.compute_file(&sanitized.resolved)?;

    debug!(member = %sanitized.original.display(), size, "wrote member");
    Ok(ExtractedEntry::file(sanitized.original, sanitized.resolved, size).with_hash(hash))
}
