use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create `path` and all missing ancestors.
///
/// Succeeds when the directory already exists, including when another
/// thread or process created it between the check and the call.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }

    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(_) if path.exists() => Err(Error::NotADirectory(path.to_path_buf())),
        Err(e) => Err(Error::Write {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Create the parent directory of `path`, if it has one.
pub fn ensure_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// A listed directory entry. `file_type` describes the entry itself;
/// symbolic links are not followed.
#[derive(Clone, Debug)]
pub struct Entry {
    pub path: PathBuf,
    pub file_type: fs::FileType,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    pub fn is_symlink(&self) -> bool {
        self.file_type.is_symlink()
    }
}

/// List the entries of a directory ordered by file name.
pub fn sorted_entries(dir: impl AsRef<Path>) -> Result<Vec<Entry>> {
    let dir = dir.as_ref();
    let read_err = |e| Error::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(|e| Error::Read {
            path: entry.path(),
            source: e,
        })?;
        entries.push(Entry {
            path: entry.path(),
            file_type,
        });
    }
    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}
