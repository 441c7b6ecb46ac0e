use std::io::Read;
use std::path::{Path, PathBuf};

use ripple_fs::ensure_dir;
use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader};

use crate::entry::ExtractedEntry;
use crate::error::{Error, Result};
use crate::extract::{write_directory, write_file};
use crate::options::ExtractOptions;
use crate::sanitize::sanitize_path;

pub struct SevenZipExtractor;

impl SevenZipExtractor {
    pub fn extract(
        &self,
        archive_path: &Path,
        destination: &Path,
        options: &ExtractOptions,
        entries: &mut Vec<ExtractedEntry>,
    ) -> Result<()> {
        let mut reader = SevenZReader::open(archive_path, Password::empty())
            .map_err(|e| Error::corrupt(archive_path, e))?;
        ensure_dir(destination)?;

        let mut failure = None;

        let outcome = reader.for_each_entries(|entry, data| {
            match write_entry(archive_path, destination, options, entry, data) {
                Ok(extracted) => {
                    entries.push(extracted);
                    Ok(true)
                }
                Err(e) => {
                    failure = Some(e);
                    Ok(false)
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }
        outcome.map_err(|e| Error::corrupt(archive_path, e))
    }
}

fn write_entry(
    archive_path: &Path,
    destination: &Path,
    options: &ExtractOptions,
    entry: &SevenZArchiveEntry,
    data: &mut dyn Read,
) -> Result<ExtractedEntry> {
    // 7z writers on Windows may store `\` separators.
    let raw_path = PathBuf::from(entry.name().replace('\\', "/"));
    let sanitized = sanitize_path(&raw_path, destination)?;

    if entry.is_directory() {
        write_directory(sanitized)
    } else {
        write_file(archive_path, sanitized, data, None, options)
    }
}
