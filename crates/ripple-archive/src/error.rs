use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The specified path ({}) does not exist", .0.display())]
    InvalidPath(PathBuf),

    #[error("Unsupported input type. Please provide a directory or a compressed file.")]
    UnsupportedType,

    #[error("unsupported archive format: '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("archive '{}' is corrupted: {reason}", path.display())]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("zip-slip attack detected: entry '{}' resolves to '{}'", entry.display(), resolved.display())]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("The output path ({}) is the input directory", .0.display())]
    OutputIsInput(PathBuf),

    #[error("'{}' is not located under '{}'", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Fs(#[from] ripple_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptArchive {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure originates from an unreadable archive.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptArchive { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
