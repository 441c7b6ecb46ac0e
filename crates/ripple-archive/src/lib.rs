//! Recursive ("ripple") archive extraction.
//!
//! Given a directory or an archive, produce an output tree that mirrors the
//! input with every archive, at any nesting depth, replaced by a directory
//! holding its extracted contents.
//!
//! # Architecture
//!
//! - `format.rs` - Path classification and archive format tags
//! - `sanitize.rs` - Output path construction and member path sanitization
//! - `extract/` - Per-format extraction
//! - `engine.rs` - Iterative traversal until no archive remains
//! - `options.rs` - Extraction options
//! - `entry.rs` - Extraction reports

pub use engine::{ExtractionTask, Origin, RippleEngine, TaskKind, UnzipReport, ripple_unzip};
pub use entry::{ArchiveReport, ExtractedEntry};
pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, extract, extractor_for};
pub use format::{ArchiveFormat, PathKind, classify};
pub use options::{CorruptPolicy, ExtractOptions, HashStrategy, PermissionStrategy, Progress};
pub use sanitize::{SanitizedPath, destination_for, sanitize_path};

mod engine;
pub mod entry;
mod error;
pub mod extract;
mod format;
pub mod options;
mod sanitize;
