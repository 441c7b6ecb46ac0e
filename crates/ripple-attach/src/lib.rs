//! Attachment export.
//!
//! Attachment tables are named `<project_id>__ATTACH`. Every row of such a
//! table is written to `<output_root>/<project_id>/ATT<id>_<name>`.
//!
//! The row store is abstracted behind [`AttachmentSource`]; callers pass it
//! together with the output root in an [`ExportContext`].

mod error;
mod export;
mod source;

pub use error::{Error, Result};
pub use export::{ATTACH_SUFFIX, ExportContext, attachment_file_name, export_attachments, project_id};
pub use source::{AttachmentRow, AttachmentSource, MemorySource};
