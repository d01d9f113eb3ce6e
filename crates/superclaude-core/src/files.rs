use crate::paths;
use std::path::{Path, PathBuf};

/// File operations used by components. Failures are reported as `false` /
/// `None` and logged here, so component code only has to count outcomes.
pub trait FileManager: Send + Sync {
    /// Create `path` and its parents if needed. True when the directory exists afterwards.
    fn ensure_directory(&self, path: &Path) -> bool;

    /// True only when the directory did not exist and was created.
    fn create_directory(&self, path: &Path) -> bool;

    /// Copy `src` to `dst`, creating `dst`'s parent directory.
    fn copy_file(&self, src: &Path, dst: &Path) -> bool;

    /// True when the file existed and was removed.
    fn remove_file(&self, path: &Path) -> bool;

    /// Copy `path` next to itself with a `.backup` suffix.
    fn backup_file(&self, path: &Path) -> Option<PathBuf>;

    /// Move a `.backup` file back over its original. Returns the original path.
    fn restore_backup(&self, backup: &Path) -> Option<PathBuf>;

    /// Add execute bits to `path`.
    fn make_executable(&self, path: &Path) -> bool;
}

/// [`FileManager`] backed directly by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileManager;

impl FileManager for FsFileManager {
    fn ensure_directory(&self, path: &Path) -> bool {
        match crate::io::ensure_dir(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "could not create directory");
                false
            }
        }
    }

    fn create_directory(&self, path: &Path) -> bool {
        if path.is_dir() {
            return false;
        }
        self.ensure_directory(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> bool {
        if let Some(parent) = dst.parent() {
            if !self.ensure_directory(parent) {
                return false;
            }
        }
        match std::fs::copy(src, dst) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    src = %src.display(),
                    dst = %dst.display(),
                    error = %e,
                    "copy failed"
                );
                false
            }
        }
    }

    fn remove_file(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not remove file");
                false
            }
        }
    }

    fn backup_file(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_file() {
            return None;
        }
        let backup = paths::backup_path(path);
        match std::fs::copy(path, &backup) {
            Ok(_) => Some(backup),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "backup failed");
                None
            }
        }
    }

    fn restore_backup(&self, backup: &Path) -> Option<PathBuf> {
        let Some(original) = paths::original_from_backup(backup) else {
            tracing::error!(path = %backup.display(), "not a backup file");
            return None;
        };
        match std::fs::rename(backup, &original) {
            Ok(()) => Some(original),
            Err(e) => {
                tracing::error!(path = %backup.display(), error = %e, "restore failed");
                None
            }
        }
    }

    fn make_executable(&self, path: &Path) -> bool {
        match crate::io::make_executable(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "chmod failed");
                false
            }
        }
    }
}
