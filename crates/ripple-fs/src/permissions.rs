use crate::{Error, Result};
use std::path::Path;

/// File permission modes applied after a file is materialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// Leave whatever the process umask produced.
    #[default]
    Inherit,

    /// On Unix: `0o444`. On Windows: sets the `readonly` attribute.
    ReadOnly,

    /// On Unix: `0o644`. On Windows: clears the `readonly` attribute.
    ReadWrite,

    /// Unix mode bits. On Windows only the owner write bit is honored.
    Custom(u32),
}

impl PermissionMode {
    /// Apply the permission mode to a file or directory path.
    pub fn apply_to_path(self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = match self {
                Self::Inherit => return Ok(()),
                Self::ReadOnly => 0o444,
                Self::ReadWrite => 0o644,
                Self::Custom(mode) => mode & 0o7777,
            };
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(
                |e| Error::Write {
                    path: path.to_path_buf(),
                    source: e,
                },
            )?;
        }

        #[cfg(not(unix))]
        {
            let readonly = match self {
                Self::Inherit => return Ok(()),
                Self::ReadOnly => true,
                Self::ReadWrite => false,
                Self::Custom(mode) => mode & 0o200 == 0,
            };
            let metadata = std::fs::metadata(path).map_err(|e| Error::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            let mut perms = metadata.permissions();
            perms.set_readonly(readonly);
            std::fs::set_permissions(path, perms).map_err(|e| Error::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        Ok(())
    }
}
