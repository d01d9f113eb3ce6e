//! Shared fixtures for component tests.

use crate::component::ComponentContext;
use crate::files::{FileManager, FsFileManager};
use crate::settings::SettingsStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Run `f` with a subscriber that writes into this buffer.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// FlakyFileManager
// ---------------------------------------------------------------------------

/// Wraps [`FsFileManager`], counts every call, and can start failing copies
/// after a given number of successful ones. Chmod and restore can be made to
/// fail outright.
#[derive(Default)]
pub struct FlakyFileManager {
    copies_allowed: Mutex<Option<usize>>,
    copies: AtomicUsize,
    ops: AtomicUsize,
    chmod_fails: AtomicBool,
    restore_fails: AtomicBool,
}

impl FlakyFileManager {
    pub fn fail_copies_after(&self, successes: usize) {
        *self.copies_allowed.lock().unwrap() = Some(successes);
        self.copies.store(0, Ordering::SeqCst);
    }

    pub fn fail_chmod(&self) {
        self.chmod_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_restores(&self) {
        self.restore_fails.store(true, Ordering::SeqCst);
    }

    pub fn ops(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.ops.fetch_add(1, Ordering::SeqCst);
    }
}

impl FileManager for FlakyFileManager {
    fn ensure_directory(&self, path: &Path) -> bool {
        self.tick();
        FsFileManager.ensure_directory(path)
    }

    fn create_directory(&self, path: &Path) -> bool {
        self.tick();
        FsFileManager.create_directory(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> bool {
        self.tick();
        let done = self.copies.fetch_add(1, Ordering::SeqCst);
        if let Some(allowed) = *self.copies_allowed.lock().unwrap() {
            if done >= allowed {
                return false;
            }
        }
        FsFileManager.copy_file(src, dst)
    }

    fn remove_file(&self, path: &Path) -> bool {
        self.tick();
        FsFileManager.remove_file(path)
    }

    fn backup_file(&self, path: &Path) -> Option<PathBuf> {
        self.tick();
        FsFileManager.backup_file(path)
    }

    fn restore_backup(&self, backup: &Path) -> Option<PathBuf> {
        self.tick();
        if self.restore_fails.load(Ordering::SeqCst) {
            return None;
        }
        FsFileManager.restore_backup(backup)
    }

    fn make_executable(&self, path: &Path) -> bool {
        self.tick();
        if self.chmod_fails.load(Ordering::SeqCst) {
            return false;
        }
        FsFileManager.make_executable(path)
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A temp dir holding `install/` and `source/` roots.
pub struct Fixture {
    pub dir: TempDir,
    pub files: Arc<FlakyFileManager>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("install")).unwrap();
        std::fs::create_dir_all(dir.path().join("source")).unwrap();
        Self {
            dir,
            files: Arc::new(FlakyFileManager::default()),
        }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.dir.path().join("install")
    }

    pub fn source_root(&self) -> PathBuf {
        self.dir.path().join("source")
    }

    pub fn context(&self) -> ComponentContext {
        ComponentContext::new(self.install_dir(), self.source_root())
            .with_file_manager(self.files.clone())
    }

    /// A context whose settings document cannot be written: its parent path
    /// is a regular file.
    pub fn unwritable_settings_context(&self) -> ComponentContext {
        let blocker = self.dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut ctx = self.context();
        ctx.settings = SettingsStore::at(blocker.join("settings.json"));
        ctx
    }

    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.source_root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }
}
