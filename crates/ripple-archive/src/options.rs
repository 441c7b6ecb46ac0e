use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ripple_fs::PermissionMode;

use crate::Result;
use crate::error::Error;

#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub perm_strategy: PermissionStrategy,
    pub hash_strategy: HashStrategy,
    pub corrupt_policy: CorruptPolicy,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("perm_strategy", &self.perm_strategy)
            .field("hash_strategy", &self.hash_strategy)
            .field("corrupt_policy", &self.corrupt_policy)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Emitted once per materialized file.
#[derive(Clone, Debug)]
pub struct Progress {
    pub pass: usize,
    pub bytes_processed: u64,
    pub current_file: Option<PathBuf>,
    /// Digest of `current_file` when a [`HashStrategy`] is enabled.
    pub hash: Option<String>,
}

impl ExtractOptions {
    pub fn permission_strategy(mut self, strategy: PermissionStrategy) -> Self {
        self.perm_strategy = strategy;
        self
    }

    pub fn hash_strategy(mut self, strategy: HashStrategy) -> Self {
        self.hash_strategy = strategy;
        self
    }

    pub fn corrupt_policy(mut self, policy: CorruptPolicy) -> Self {
        self.corrupt_policy = policy;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report_progress(&self, progress: impl FnOnce() -> Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(progress());
        }
    }
}

/// What to do when a nested archive cannot be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CorruptPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Log, keep the archive file in the output tree, and continue.
    /// The top-level input is never skipped.
    Skip,
}

/// Hash computation strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HashStrategy {
    #[default]
    None,
    Sha256,
}

impl HashStrategy {
    /// Compute hash from reader (streaming).
    pub fn compute<R: Read>(&self, mut reader: R) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Sha256 => {
                use sha2::Digest;
                let mut hasher = sha2::Sha256::new();
                let mut buffer = [0u8; 8192];

                loop {
                    let n = reader.read(&mut buffer).map_err(Error::from)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buffer[..n]);
                }

                Ok(Some(hex::encode(hasher.finalize())))
            }
        }
    }

    /// Hash a file already on disk.
    pub fn compute_file(&self, path: &Path) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            _ => {
                let file = std::fs::File::open(path).map_err(|e| ripple_fs::Error::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                self.compute(file)
            }
        }
    }
}

/// Permission application strategies. Only effective on Unix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PermissionStrategy {
    /// Archive mode bits widened to at least `rw-r--r--`; `0o644` without bits.
    #[default]
    Standard,
    /// Archive mode bits as stored; untouched without bits.
    Preserve,
}

impl PermissionStrategy {
    /// Resolve permissions (pure function).
    pub fn resolve(self, mode: Option<u32>) -> PermissionMode {
        match (self, mode) {
            (Self::Standard, Some(m)) if m & 0o111 != 0 => PermissionMode::Custom(m | 0o600),
            (Self::Standard, Some(m)) => PermissionMode::Custom(m | 0o644),
            (Self::Standard, None) => PermissionMode::ReadWrite,
            (Self::Preserve, Some(m)) => PermissionMode::Custom(m),
            (Self::Preserve, None) => PermissionMode::Inherit,
        }
    }

    /// Apply permissions to path (impure).
    pub fn apply_to_path(&self, path: &Path, mode: Option<u32>) -> Result<()> {
        if cfg!(unix) {
            self.resolve(mode).apply_to_path(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn none_strategy_returns_none() {
        let cursor = Cursor::new(b"hello");
        let result = HashStrategy::None.compute(cursor).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn sha256_strategy_known_digest() {
        let cursor = Cursor::new(b"hello");
        let result = HashStrategy::Sha256.compute(cursor).unwrap();
        assert_eq!(
            result.as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn compute_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = HashStrategy::Sha256.compute_file(&dir.path().join("missing"));
        assert!(result.is_err());
        assert!(HashStrategy::None.compute_file(&dir.path().join("missing")).unwrap().is_none());
    }

    #[test]
    fn standard_permissions_widen_mode() {
        assert_eq!(
            PermissionStrategy::Standard.resolve(Some(0o400)),
            PermissionMode::Custom(0o644)
        );
        assert_eq!(
            PermissionStrategy::Standard.resolve(Some(0o755)),
            PermissionMode::Custom(0o755)
        );
        assert_eq!(PermissionStrategy::Standard.resolve(None), PermissionMode::ReadWrite);
    }

    #[test]
    fn preserve_permissions_keep_mode() {
        assert_eq!(
            PermissionStrategy::Preserve.resolve(Some(0o640)),
            PermissionMode::Custom(0o640)
        );
        assert_eq!(PermissionStrategy::Preserve.resolve(None), PermissionMode::Inherit);
    }

    #[test]
    fn builder_chain() {
        let options = ExtractOptions::default()
            .permission_strategy(PermissionStrategy::Preserve)
            .hash_strategy(HashStrategy::Sha256)
            .corrupt_policy(CorruptPolicy::Skip);

        assert_eq!(options.perm_strategy, PermissionStrategy::Preserve);
        assert_eq!(options.hash_strategy, HashStrategy::Sha256);
        assert_eq!(options.corrupt_policy, CorruptPolicy::Skip);
        assert!(options.on_progress.is_none());
    }

    #[test]
    fn progress_callback_invoked() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let options = ExtractOptions::default().on_progress(Arc::new(move |_: Progress| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        }));

        options.report_progress(|| Progress {
            pass: 1,
            bytes_processed: 100,
            current_file: Some(PathBuf::from("test.txt")),
            hash: None,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
