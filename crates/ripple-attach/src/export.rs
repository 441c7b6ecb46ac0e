use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ripple_fs::{ensure_dir, write_from_reader};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::source::{AttachmentRow, AttachmentSource};

pub const ATTACH_SUFFIX: &str = "__ATTACH";

/// Everything an export needs, passed explicitly.
pub struct ExportContext<'a> {
    pub source: &'a dyn AttachmentSource,
    pub output_root: PathBuf,
}

impl<'a> ExportContext<'a> {
    pub fn new(source: &'a dyn AttachmentSource, output_root: impl AsRef<Path>) -> Self {
        Self {
            source,
            output_root: output_root.as_ref().to_path_buf(),
        }
    }
}

/// The project id of an attachment table, `None` for any other table.
pub fn project_id(table: &str) -> Option<&str> {
    table
        .strip_suffix(ATTACH_SUFFIX)
        .filter(|id| !id.is_empty())
}

pub fn attachment_file_name(row: &AttachmentRow) -> Result<String> {
    let name = &row.name;
    if name.is_empty() || name.contains(['/', '\\', '\0']) || name.contains("..") {
        return Err(Error::InvalidName(name.clone()));
    }
    Ok(format!("ATT{}_{}", row.id, name))
}

/// Export every attachment table. Returns project id to project directory.
pub fn export_attachments(ctx: &ExportContext<'_>) -> Result<BTreeMap<String, PathBuf>> {
    let mut tables = ctx.source.table_names()?;
    tables.sort();

    let mut exported = BTreeMap::new();
    for table in &tables {
        let Some(id) = project_id(table) else {
            debug!(table, "not an attachment table");
            continue;
        };

        let project_dir = ctx.output_root.join(id);
        let written = export_table(ctx, table, &project_dir)?;
        info!(table, project = id, attachments = written, "exported attachments");
        exported.insert(id.to_string(), project_dir);
    }

    Ok(exported)
}

fn export_table(ctx: &ExportContext<'_>, table: &str, project_dir: &Path) -> Result<usize> {
    let rows = ctx.source.rows(table)?;
    ensure_dir(project_dir)?;

    for row in &rows {
        let target = project_dir.join(attachment_file_name(row)?);
        let size = write_from_reader(&target, &mut row.data.as_slice())?;
        debug!(target = %target.display(), size, "wrote attachment");
    }

    Ok(rows.len())
}
