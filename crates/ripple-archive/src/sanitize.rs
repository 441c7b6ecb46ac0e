use std::path::{Component, Path, PathBuf};

use ripple_fs::ensure_parent;

use crate::error::{Error, Result};
use crate::format::{PathKind, classify};

/// Result of sanitizing an archive member path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an archive member path against its destination directory.
///
/// Absolute members and members whose `..` components climb above the
/// destination are rejected.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    let relative = normalize_relative(entry_path).ok_or_else(|| Error::ZipSlip {
        entry: entry_path.to_path_buf(),
        resolved: base.join(entry_path),
    })?;

    let resolved = if relative.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(relative)
    };

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Compute where `source` lands in the mirrored tree.
///
/// The path of `source` relative to `input_root` is joined onto
/// `output_root`; an archive loses its extension so that `Child.zip`
/// becomes the directory `Child`. Parent directories of the returned path
/// are created.
pub fn destination_for(source: &Path, input_root: &Path, output_root: &Path) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(input_root)
        .map_err(|_| Error::OutsideRoot {
            path: source.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;

    let mut relative = normalize_relative(relative).ok_or_else(|| Error::ZipSlip {
        entry: relative.to_path_buf(),
        resolved: output_root.join(relative),
    })?;

    if matches!(classify(source), PathKind::Archive(_)) {
        if let Some(stem) = relative.file_stem().map(|s| s.to_os_string()) {
            relative.set_file_name(stem);
        }
    }

    let destination = if relative.as_os_str().is_empty() {
        output_root.to_path_buf()
    } else {
        output_root.join(relative)
    };
    ensure_parent(&destination)?;
    Ok(destination)
}

/// Normalize a relative path, or `None` if it is absolute or escapes upward.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                result.pop();
                depth -= 1;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/out/tree")
        } else {
            Path::new("/out/tree")
        }
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_path("Child 1/Child 1.5/file.txt", test_base_path()).unwrap();
        assert_eq!(result.original, Path::new("Child 1/Child 1.5/file.txt"));
        assert_eq!(
            result.resolved,
            test_base_path().join("Child 1").join("Child 1.5").join("file.txt")
        );
    }

    #[test]
    fn inner_parent_components_are_resolved() {
        let result = sanitize_path("a/b/../c.txt", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path().join("a").join("c.txt"));
    }

    #[test]
    fn zip_slip_protection() {
        let malicious = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let result = sanitize_path(malicious, test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));

        let result = sanitize_path("a/../../escape.txt", test_base_path());
        assert!(matches!(result, Err(Error::ZipSlip { .. })));
    }

    #[test]
    fn empty_member_is_base() {
        let result = sanitize_path("", test_base_path()).unwrap();
        assert_eq!(result.resolved, test_base_path());
    }

    #[test]
    fn destination_strips_archive_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        std::fs::create_dir_all(input.join("sub")).unwrap();
        let archive = input.join("sub/Child.zip");
        std::fs::write(&archive, b"PK").unwrap();

        let dest = destination_for(&archive, &input, &output).unwrap();

        assert_eq!(dest, output.join("sub").join("Child"));
        assert!(output.join("sub").is_dir());
        assert!(!dest.exists());
    }

    #[test]
    fn destination_keeps_plain_file_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        std::fs::create_dir_all(&input).unwrap();
        let file = input.join("Child 5.xlsx");
        std::fs::write(&file, b"cells").unwrap();

        let dest = destination_for(&file, &input, &output).unwrap();

        assert_eq!(dest, output.join("Child 5.xlsx"));
    }

    #[test]
    fn destination_keeps_directory_named_like_archive() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        std::fs::create_dir_all(input.join("odd.zip")).unwrap();

        let dest = destination_for(&input.join("odd.zip"), &input, &output).unwrap();

        assert_eq!(dest, output.join("odd.zip"));
    }

    #[test]
    fn root_archive_maps_to_output_root() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("TestFolder.zip");
        std::fs::write(&archive, b"PK").unwrap();
        let output = dir.path().join("output");

        let dest = destination_for(&archive, &archive, &output).unwrap();

        assert_eq!(dest, output);
    }

    #[test]
    fn destination_outside_root_rejected() {
        let result = destination_for(
            Path::new("/elsewhere/file.txt"),
            Path::new("/input"),
            Path::new("/output"),
        );
        assert!(matches!(result, Err(Error::OutsideRoot { .. })));
    }

    #[test]
    fn destination_is_deterministic() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        let file = input.join("a.7z");
        std::fs::write(&file, b"7z").unwrap();
        let output = dir.path().join("out");

        let first = destination_for(&file, &input, &output).unwrap();
        let second = destination_for(&file, &input, &output).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with(&output));
    }

    #[test]
    fn normalize_rejects_escape() {
        assert_eq!(normalize_relative(Path::new("a/./b")), Some(PathBuf::from("a/b")));
        assert_eq!(normalize_relative(Path::new("../a")), None);
        assert_eq!(normalize_relative(Path::new("a/../..")), None);
    }
}
