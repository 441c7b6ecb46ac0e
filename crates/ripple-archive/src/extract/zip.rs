use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ripple_fs::ensure_dir;

use crate::entry::ExtractedEntry;
use crate::error::{Error, Result};
use crate::extract::{write_directory, write_file};
use crate::options::ExtractOptions;
use crate::sanitize::sanitize_path;

pub struct ZipExtractor;

impl ZipExtractor {
    pub fn extract(
        &self,
        archive_path: &Path,
        destination: &Path,
        options: &ExtractOptions,
        entries: &mut Vec<ExtractedEntry>,
    ) -> Result<()> {
        let file = File::open(archive_path).map_err(|e| Error::corrupt(archive_path, e))?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| Error::corrupt(archive_path, e))?;
        ensure_dir(destination)?;

        entries.reserve(archive.len());

        for i in 0..archive.len() {
            let mut member = archive
                .by_index(i)
                .map_err(|e| Error::corrupt(archive_path, e))?;

            // `enclosed_name` refuses absolute and `..`-escaping names.
            let raw_path = member.enclosed_name().ok_or_else(|| Error::ZipSlip {
                entry: PathBuf::from(member.name()),
                resolved: destination.join(member.name()),
            })?;
            let sanitized = sanitize_path(&raw_path, destination)?;

            if member.is_dir() {
                entries.push(write_directory(sanitized)?);
            } else {
                let mode = member.unix_mode();
                entries.push(write_file(archive_path, sanitized, &mut member, mode, options)?);
            }
        }

        Ok(())
    }
}
