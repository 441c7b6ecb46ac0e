use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The source stream failed while its bytes were written to `path`.
    #[error("source stream failed while writing '{}': {source}", path.display())]
    Stream { path: PathBuf, source: io::Error },

    #[error("'{}' exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
