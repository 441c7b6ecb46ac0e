pub mod copy;
pub mod dir;

pub use copy::{copy_file, write_from_reader};
pub use dir::{Entry, ensure_dir, ensure_parent, sorted_entries};
