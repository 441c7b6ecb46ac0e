#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid attachment name: {0:?}")]
    InvalidName(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("attachment source failed: {0}")]
    Source(String),

    #[error(transparent)]
    Fs(#[from] ripple_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
