use crate::primitives::dir::ensure_parent;
use crate::{Error, Result};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

const BUFFER_SIZE: usize = 8192;

/// Copy a single file byte for byte, creating parent directories.
///
/// Failures on the source side are [`Error::Read`] of `src`, failures on the
/// destination side [`Error::Write`] of `dest`. Permission bits follow the
/// source.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    let read_err = |e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    };

    let mut source = File::open(src).map_err(read_err)?;
    let permissions = source.metadata().map_err(read_err)?.permissions();

    let copied = write_from_reader(dest, &mut source).map_err(|e| match e {
        Error::Stream { source, .. } => read_err(source),
        other => other,
    })?;

    std::fs::set_permissions(dest, permissions).map_err(|e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    Ok(copied)
}

/// Drain `reader` into a new file at `path`, creating parent directories.
///
/// Failures of the reader are reported as [`Error::Stream`] so callers can
/// tell a broken source apart from a failing destination.
pub fn write_from_reader<R: Read + ?Sized>(path: impl AsRef<Path>, reader: &mut R) -> Result<u64> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let write_err = |e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(write_err)?;
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(Error::Stream {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        file.write_all(&buffer[..n]).map_err(write_err)?;
        written += n as u64;
    }

    file.flush().map_err(write_err)?;
    Ok(written)
}
