use std::path::Path;

/// Archive format tag derived from a path's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    SevenZip,
    Unsupported,
}

impl ArchiveFormat {
    /// Every format that has an extractor.
    pub const SUPPORTED: [ArchiveFormat; 2] = [ArchiveFormat::Zip, ArchiveFormat::SevenZip];

    /// Tag a path by its extension (ASCII case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Self::Unsupported;
        };
        Self::SUPPORTED
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
            .unwrap_or(Self::Unsupported)
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZip => "7z",
            Self::Unsupported => "",
        }
    }

    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// What a filesystem node is, as far as traversal is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    Archive(ArchiveFormat),
    /// Neither a directory nor a recognized archive: an opaque file.
    Unsupported,
}

/// Classify a path. Never fails; existence is the caller's concern.
pub fn classify(path: impl AsRef<Path>) -> PathKind {
    let path = path.as_ref();
    if path.is_dir() {
        return PathKind::Directory;
    }
    match ArchiveFormat::from_path(path) {
        ArchiveFormat::Unsupported => PathKind::Unsupported,
        format => PathKind::Archive(format),
    }
}
