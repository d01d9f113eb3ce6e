//! Deterministic shell scripts installed into `<install>/scripts`.

use crate::component::{Component, ComponentContext, ComponentMetadata, InstallConfig, Validation};
use crate::error::{Result, SetupError};
use crate::io;
use crate::paths;
use crate::settings::{ComponentStatus, InstalledComponentRecord};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const NAME: &str = "scripts";
pub const VERSION: &str = "1.0.0";
const SCRIPT_EXTENSION: &str = "sh";

pub struct ScriptsComponent {
    ctx: ComponentContext,
}

impl ScriptsComponent {
    pub fn new(ctx: ComponentContext) -> Self {
        Self { ctx }
    }

    fn source_dir(&self) -> PathBuf {
        paths::source_scripts_dir(&self.ctx.source_root)
    }

    fn target_dir(&self) -> PathBuf {
        paths::scripts_dir(&self.ctx.install_dir)
    }

    fn source_scripts(&self) -> Result<Vec<String>> {
        io::list_files_with_extension(&self.source_dir(), SCRIPT_EXTENSION)
    }

    fn try_install(&self, config: &InstallConfig) -> Result<bool> {
        tracing::info!(component = NAME, "Installing Scripts component...");
        let meta = self.get_metadata();

        if !config.force
            && self.ctx.is_registered_at(&meta)?
            && self.validate_installation().is_valid()
        {
            tracing::info!(component = NAME, "Scripts component already at version {VERSION}");
            return Ok(true);
        }

        let source_dir = self.source_dir();
        if !source_dir.is_dir() {
            return Err(SetupError::MissingSource(source_dir.display().to_string()));
        }

        let target_dir = self.target_dir();
        if self.ctx.files.create_directory(&target_dir) {
            tracing::debug!(component = NAME, "Created scripts directory at {}", target_dir.display());
        } else if !self.ctx.files.ensure_directory(&target_dir) {
            return Err(SetupError::Io(std::io::Error::other(format!(
                "could not create scripts directory {}",
                target_dir.display()
            ))));
        }

        let scripts = self.source_scripts()?;
        if scripts.is_empty() {
            tracing::warn!(component = NAME, "No script files found to install");
        }

        let copied = self.copy_scripts(&scripts, &target_dir);
        if copied != scripts.len() {
            tracing::error!(
                component = NAME,
                "Scripts component installation incomplete: {}",
                SetupError::PartialCopy {
                    copied,
                    total: scripts.len()
                }
            );
            return Ok(false);
        }

        let record = InstalledComponentRecord::new(VERSION, copied)
            .with_status(ComponentStatus::Installed)
            .with_category(meta.category);
        self.ctx
            .settings
            .add_component_registration(NAME, record)
            .map_err(|e| SetupError::Registration {
                component: NAME.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(component = NAME, "Scripts component installed successfully ({copied} scripts)");
        Ok(true)
    }

    /// Copy each script and mark it executable. A chmod failure is only a
    /// warning; the copy still counts.
    fn copy_scripts(&self, scripts: &[String], target_dir: &std::path::Path) -> usize {
        let source_dir = self.source_dir();
        let mut copied = 0;
        for name in scripts {
            let source = source_dir.join(name);
            let target = target_dir.join(name);
            tracing::debug!(component = NAME, "Copying {name} to {}", target.display());

            if !self.ctx.files.copy_file(&source, &target) {
                tracing::error!(component = NAME, "Failed to copy {name}");
                continue;
            }
            if !self.ctx.files.make_executable(&target) {
                tracing::warn!(
                    component = NAME,
                    "Failed to set executable permissions on {}",
                    target.display()
                );
            }
            copied += 1;
        }
        copied
    }

    fn try_uninstall(&self) -> Result<()> {
        tracing::info!(component = NAME, "Uninstalling Scripts component...");
        let target_dir = self.target_dir();

        let mut removed = 0;
        if target_dir.is_dir() {
            for name in io::list_files_with_extension(&target_dir, SCRIPT_EXTENSION)? {
                if self.ctx.files.remove_file(&target_dir.join(&name)) {
                    removed += 1;
                    tracing::debug!(component = NAME, "Removed {name}");
                }
            }
            match io::remove_dir_if_empty(&target_dir) {
                Ok(true) => tracing::debug!(component = NAME, "Removed empty scripts directory"),
                Ok(false) => tracing::debug!(component = NAME, "Scripts directory not empty, keeping it"),
                Err(e) => tracing::warn!(component = NAME, "Could not remove scripts directory: {e}"),
            }
        } else {
            tracing::info!(component = NAME, "Scripts directory doesn't exist, nothing to remove");
        }

        self.ctx
            .settings
            .remove_component_registration(NAME)
            .map_err(|e| SetupError::Registration {
                component: NAME.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(component = NAME, "Scripts component uninstalled ({removed} files removed)");
        Ok(())
    }
}

impl Component for ScriptsComponent {
    fn context(&self) -> &ComponentContext {
        &self.ctx
    }

    fn get_metadata(&self) -> ComponentMetadata {
        ComponentMetadata {
            name: NAME.to_string(),
            version: VERSION.to_string(),
            description: "Deterministic bash scripts for SuperClaude commands".to_string(),
            category: "commands".to_string(),
        }
    }

    fn install(&self, config: &InstallConfig) -> bool {
        match self.try_install(config) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!(component = NAME, "Failed to install scripts component: {e}");
                false
            }
        }
    }

    fn uninstall(&self) -> bool {
        match self.try_uninstall() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(component = NAME, "Failed to uninstall scripts component: {e}");
                false
            }
        }
    }

    fn validate_installation(&self) -> Validation {
        let mut validation = Validation::default();
        let target_dir = self.target_dir();

        if !target_dir.is_dir() {
            validation.push(format!("Scripts directory missing: {}", target_dir.display()));
        } else {
            let expected: BTreeSet<String> = match self.source_scripts() {
                Ok(names) => names.into_iter().collect(),
                Err(e) => {
                    validation.push(format!("Could not read script sources: {e}"));
                    BTreeSet::new()
                }
            };

            for name in &expected {
                let path = target_dir.join(name);
                if !path.is_file() {
                    validation.push(format!("Missing script: {name}"));
                } else if !io::is_executable(&path) {
                    validation.push(format!("Script not executable: {name}"));
                }
            }

            match io::list_files_with_extension(&target_dir, SCRIPT_EXTENSION) {
                Ok(actual) => {
                    let unexpected: Vec<String> = actual
                        .into_iter()
                        .filter(|n| !expected.contains(n))
                        .collect();
                    if !unexpected.is_empty() {
                        validation.push(format!("Unexpected scripts found: {}", unexpected.join(", ")));
                    }
                }
                Err(e) => validation.push(format!("Could not read scripts directory: {e}")),
            }
        }

        self.ctx.check_registration(&self.get_metadata(), &mut validation);
        validation
    }

    fn managed_files(&self) -> Vec<PathBuf> {
        let target_dir = self.target_dir();
        io::list_files_with_extension(&target_dir, SCRIPT_EXTENSION)
            .unwrap_or_default()
            .into_iter()
            .map(|n| target_dir.join(n))
            .collect()
    }

    fn install_directory(&self) -> PathBuf {
        self.target_dir()
    }

    fn planned_files(&self) -> Vec<String> {
        self.source_scripts().unwrap_or_default()
    }

    fn size_estimate(&self) -> u64 {
        let source_dir = self.source_dir();
        self.planned_files()
            .iter()
            .filter_map(|n| std::fs::metadata(source_dir.join(n)).ok())
            .map(|m| m.len())
            .sum()
    }

    fn source_status(&self) -> &'static str {
        if !self.source_dir().is_dir() {
            "missing"
        } else if self.planned_files().is_empty() {
            "empty"
        } else {
            "implemented"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
