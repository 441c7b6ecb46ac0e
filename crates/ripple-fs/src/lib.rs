//! Filesystem primitives used to build mirrored extraction trees.
//!
//! - `primitives/dir.rs` - Idempotent directory creation, sorted listings
//! - `primitives/copy.rs` - Binary-safe copies and streamed writes
//! - `permissions.rs` - Cross-platform permission modes

mod error;
pub mod permissions;
pub mod primitives;

pub use error::{Error, Result};
pub use permissions::PermissionMode;
pub use primitives::{Entry, copy_file, ensure_dir, ensure_parent, sorted_entries, write_from_reader};
