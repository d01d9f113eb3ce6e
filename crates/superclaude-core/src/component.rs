//! The lifecycle contract every installable unit satisfies.
//!
//! Lifecycle methods never return errors to the caller. Each component runs
//! its fallible work internally against [`crate::Result`], logs the cause,
//! and reports a plain `bool` (or a [`Validation`] listing every problem).

use crate::error::{Result, SetupError};
use crate::files::{FileManager, FsFileManager};
use crate::settings::{ComponentStatus, SettingsStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: String,
}

// ---------------------------------------------------------------------------
// InstallConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Reinstall even when the registered version is already current.
    pub force: bool,
    /// Timeout (seconds) recorded for Stop hooks registered by components.
    pub stop_hook_timeout: u32,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            force: false,
            stop_hook_timeout: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.errors.is_empty(), self.errors)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub component: String,
    pub version: String,
    pub description: String,
    pub category: String,
    pub status: &'static str,
    pub files: Vec<String>,
    pub estimated_size: u64,
    pub install_directory: PathBuf,
    pub dependencies: Vec<String>,
}

// ---------------------------------------------------------------------------
// ComponentContext
// ---------------------------------------------------------------------------

/// Everything a component needs to touch disk and settings.
#[derive(Clone)]
pub struct ComponentContext {
    pub install_dir: PathBuf,
    pub source_root: PathBuf,
    pub settings: SettingsStore,
    pub files: Arc<dyn FileManager>,
}

impl ComponentContext {
    pub fn new(install_dir: impl Into<PathBuf>, source_root: impl Into<PathBuf>) -> Self {
        let install_dir = install_dir.into();
        Self {
            settings: SettingsStore::new(&install_dir),
            install_dir,
            source_root: source_root.into(),
            files: Arc::new(FsFileManager),
        }
    }

    pub fn with_file_manager(mut self, files: Arc<dyn FileManager>) -> Self {
        self.files = files;
        self
    }

    /// Registration half of the installed invariant: recorded as installed
    /// at exactly `meta.version`.
    pub fn check_registration(&self, meta: &ComponentMetadata, validation: &mut Validation) {
        match self.settings.component_record(&meta.name) {
            Ok(Some(record)) if record.installed => {
                if record.version != meta.version {
                    validation.push(format!(
                        "Version mismatch: installed {}, expected {}",
                        record.version, meta.version
                    ));
                }
            }
            Ok(_) => validation.push(format!(
                "{} component not registered in settings.json",
                meta.name
            )),
            Err(e) => validation.push(format!("Could not read settings: {e}")),
        }
    }

    pub fn is_registered_at(&self, meta: &ComponentMetadata) -> Result<bool> {
        Ok(self.settings.get_component_version(&meta.name)?.as_deref() == Some(meta.version.as_str()))
    }

    pub fn registration_status(&self, name: &str) -> Result<Option<ComponentStatus>> {
        Ok(self.settings.component_record(name)?.and_then(|r| r.status))
    }
}

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

pub trait Component {
    fn context(&self) -> &ComponentContext;

    fn get_metadata(&self) -> ComponentMetadata;

    /// Names of components that must be installed first.
    fn get_dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn install(&self, config: &InstallConfig) -> bool;

    fn uninstall(&self) -> bool;

    fn validate_installation(&self) -> Validation;

    /// Installed files that an update must back up before reinstalling.
    fn managed_files(&self) -> Vec<PathBuf>;

    /// Where this component places its files.
    fn install_directory(&self) -> PathBuf;

    /// File names an install would place right now.
    fn planned_files(&self) -> Vec<String>;

    /// Bytes an install would place right now.
    fn size_estimate(&self) -> u64;

    /// Short label describing the source payload (e.g. `implemented`).
    fn source_status(&self) -> &'static str;

    /// Reinstall when the registered version differs from the current one,
    /// restoring the previous files if the reinstall fails.
    fn update(&self, config: &InstallConfig) -> bool {
        let meta = self.get_metadata();
        let ctx = self.context();

        let current = match ctx.settings.get_component_version(&meta.name) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(component = %meta.name, error = %e, "could not read installed version");
                return false;
            }
        };

        if current.as_deref() == Some(meta.version.as_str()) {
            tracing::info!(
                component = %meta.name,
                "{} component already at version {}",
                meta.name,
                meta.version
            );
            return true;
        }

        tracing::info!(
            component = %meta.name,
            "Updating {} component from {} to {}",
            meta.name,
            current.as_deref().unwrap_or("none"),
            meta.version
        );

        let backups = backup_files(ctx.files.as_ref(), &self.managed_files());

        if self.install(config) {
            discard_backups(ctx.files.as_ref(), &backups);
            tracing::info!(
                component = %meta.name,
                "{} component updated to version {}",
                meta.name,
                meta.version
            );
            true
        } else {
            tracing::warn!(component = %meta.name, "Update failed, restoring from backup...");
            let failures = restore_backups(ctx.files.as_ref(), &backups);
            if !failures.is_empty() {
                tracing::error!(
                    component = %meta.name,
                    "{} of {} files could not be restored",
                    failures.len(),
                    backups.len()
                );
            }
            false
        }
    }

    fn summary(&self) -> ComponentSummary {
        let meta = self.get_metadata();
        ComponentSummary {
            component: meta.name,
            version: meta.version,
            description: meta.description,
            category: meta.category,
            status: self.source_status(),
            files: self.planned_files(),
            estimated_size: self.size_estimate(),
            install_directory: self.install_directory(),
            dependencies: self.get_dependencies(),
        }
    }
}

// ---------------------------------------------------------------------------
// Backup helpers
// ---------------------------------------------------------------------------

/// Back up every file that exists; files that cannot be backed up are skipped.
pub fn backup_files(files: &dyn FileManager, targets: &[PathBuf]) -> Vec<PathBuf> {
    let mut backups = Vec::new();
    for target in targets.iter().filter(|p| p.is_file()) {
        if let Some(backup) = files.backup_file(target) {
            tracing::debug!(file = %target.display(), "backed up");
            backups.push(backup);
        }
    }
    backups
}

/// Delete backups after a successful update. A backup left behind does not
/// fail the update.
pub fn discard_backups(files: &dyn FileManager, backups: &[PathBuf]) {
    for backup in backups {
        if !files.remove_file(backup) {
            tracing::debug!(file = %backup.display(), "backup not cleaned up");
        }
    }
}

/// Move each backup over its original. A failure for one file does not stop
/// the rest. Returns the failures.
pub fn restore_backups(files: &dyn FileManager, backups: &[PathBuf]) -> Vec<SetupError> {
    let mut failures = Vec::new();
    for backup in backups {
        match files.restore_backup(backup) {
            Some(original) => tracing::debug!(file = %original.display(), "restored"),
            None => failures.push(SetupError::Restore {
                path: backup.display().to_string(),
                reason: "backup could not be moved back".to_string(),
            }),
        }
    }
    failures
}
