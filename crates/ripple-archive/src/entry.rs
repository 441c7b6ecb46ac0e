use std::path::PathBuf;

use crate::format::ArchiveFormat;

/// One member written to disk.
#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
    pub hash: Option<String>,
}

impl ExtractedEntry {
    pub fn file(original_path: PathBuf, target_path: PathBuf, size: u64) -> Self {
        Self {
            original_path,
            target_path,
            size,
            is_directory: false,
            hash: None,
        }
    }

    pub fn directory(original_path: PathBuf, target_path: PathBuf) -> Self {
        Self {
            original_path,
            target_path,
            size: 0,
            is_directory: true,
            hash: None,
        }
    }

    pub fn with_hash(mut self, hash: Option<String>) -> Self {
        self.hash = hash;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub format: ArchiveFormat,
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
}

impl ArchiveReport {
    pub fn new(format: ArchiveFormat, entries: Vec<ExtractedEntry>) -> Self {
        let total_bytes = entries.iter().map(|e| e.size).sum();
        Self {
            format,
            entry_count: entries.len(),
            total_bytes,
            entries,
        }
    }

    /// Files written by this extraction, directories excluded.
    pub fn files(&self) -> impl Iterator<Item = &ExtractedEntry> {
        self.entries.iter().filter(|e| !e.is_directory)
    }
}
