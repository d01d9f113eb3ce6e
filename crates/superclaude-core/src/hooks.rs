//! Assistant hooks installed into `<install>/hooks`.
//!
//! The hook payload is optional. Without a source directory the component
//! installs a placeholder marker and registers itself with
//! `status: "placeholder"`, which still satisfies validation. Once real hook
//! files ship, an install or version update moves it to `installed`.

use crate::component::{Component, ComponentContext, ComponentMetadata, InstallConfig, Validation};
use crate::error::{Result, SetupError};
use crate::io;
use crate::paths;
use crate::settings::{ComponentStatus, InstalledComponentRecord};
use serde_json::json;
use std::path::PathBuf;

pub const NAME: &str = "hooks";
pub const VERSION: &str = "3.0.0";
const CATEGORY: &str = "integration";

/// Hook payload files this component owns.
pub const HOOK_FILES: &[&str] = &["anti_sycophant.py"];

/// Stop hooks whose command ends with this belong to this component.
pub const STOP_HOOK_FILE: &str = "anti_sycophant.py";

/// Source and install sizes below this are reported as this minimum.
const MIN_SIZE_ESTIMATE: u64 = 10 * 1024;

const PLACEHOLDER_CONTENT: &str = r#""""
SuperClaude Hooks

This directory holds hooks that adjust assistant behavior.

Available hooks:
- anti_sycophant: blocks sycophantic responses and asks for an objective revision

This file is a placeholder; no hook payload is installed yet.
"""
"#;

pub struct HooksComponent {
    ctx: ComponentContext,
}

impl HooksComponent {
    pub fn new(ctx: ComponentContext) -> Self {
        Self { ctx }
    }

    fn source_dir(&self) -> PathBuf {
        paths::source_hooks_dir(&self.ctx.source_root)
    }

    fn hooks_dir(&self) -> PathBuf {
        paths::hooks_dir(&self.ctx.install_dir)
    }

    fn placeholder(&self) -> PathBuf {
        paths::placeholder_path(&self.ctx.install_dir)
    }

    fn stop_hook_path(&self) -> PathBuf {
        self.hooks_dir().join(STOP_HOOK_FILE)
    }

    /// Hook files currently present in the install directory.
    fn installed_hook_files(&self) -> Vec<PathBuf> {
        let dir = self.hooks_dir();
        HOOK_FILES
            .iter()
            .map(|f| dir.join(f))
            .filter(|p| p.is_file())
            .collect()
    }

    /// Status an install would record given the current source tree.
    fn expected_status(&self) -> ComponentStatus {
        if self.source_dir().is_dir() {
            ComponentStatus::Installed
        } else {
            ComponentStatus::Placeholder
        }
    }

    fn registration_error(e: SetupError) -> SetupError {
        SetupError::Registration {
            component: NAME.to_string(),
            reason: e.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Install
    // -----------------------------------------------------------------------

    fn try_install(&self, config: &InstallConfig) -> Result<bool> {
        tracing::info!(component = NAME, "Installing SuperClaude hooks component...");
        let meta = self.get_metadata();

        if !config.force
            && self.ctx.is_registered_at(&meta)?
            && self.ctx.registration_status(NAME)? == Some(self.expected_status())
            && self.validate_installation().is_valid()
        {
            tracing::info!(component = NAME, "Hooks component already at version {VERSION}");
            return Ok(true);
        }

        if !self.source_dir().is_dir() {
            return self.install_placeholder();
        }
        self.install_hook_files(config)
    }

    fn install_placeholder(&self) -> Result<bool> {
        tracing::info!(
            component = NAME,
            "Hooks are not yet implemented - installing placeholder component"
        );

        let dir = self.hooks_dir();
        if !self.ctx.files.ensure_directory(&dir) {
            tracing::error!(component = NAME, "Could not create hooks directory: {}", dir.display());
            return Ok(false);
        }

        if !self.remove_stale_hooks()? {
            return Ok(false);
        }

        match io::atomic_write(&self.placeholder(), PLACEHOLDER_CONTENT.as_bytes()) {
            Ok(()) => tracing::debug!(component = NAME, "Created hooks placeholder file"),
            Err(e) => tracing::warn!(component = NAME, "Could not create placeholder file: {e}"),
        }

        self.ctx
            .settings
            .update_metadata(&json!({
                "components": {
                    NAME: {
                        "version": VERSION,
                        "installed": true,
                        "status": ComponentStatus::Placeholder.as_str(),
                        "files_count": 0,
                        "category": CATEGORY,
                    }
                }
            }))
            .map_err(Self::registration_error)?;

        tracing::info!(component = NAME, "Hooks component installed successfully (placeholder)");
        Ok(true)
    }

    /// Drop hook files and Stop registrations left by an earlier real install
    /// whose sources are gone. False when a file could not be removed.
    fn remove_stale_hooks(&self) -> Result<bool> {
        for file in self.installed_hook_files() {
            if !self.ctx.files.remove_file(&file) {
                tracing::error!(component = NAME, "Could not remove stale hook {}", file.display());
                return Ok(false);
            }
            tracing::info!(component = NAME, "Removed hook without source: {}", file.display());
        }

        let removed = self
            .ctx
            .settings
            .remove_stop_hooks_by_suffix(STOP_HOOK_FILE)
            .map_err(Self::registration_error)?;
        if removed > 0 {
            tracing::info!(component = NAME, "Removed {removed} {STOP_HOOK_FILE} hook(s) from settings.json");
        }
        Ok(true)
    }

    fn install_hook_files(&self, config: &InstallConfig) -> Result<bool> {
        tracing::info!(component = NAME, "Installing actual hook files...");

        let source_dir = self.source_dir();
        let hooks_dir = self.hooks_dir();
        let to_install: Vec<(PathBuf, PathBuf)> = HOOK_FILES
            .iter()
            .map(|f| (source_dir.join(f), hooks_dir.join(f)))
            .filter(|(src, _)| src.is_file())
            .collect();

        if to_install.is_empty() {
            tracing::warn!(component = NAME, "No hook files found to install");
            return Ok(false);
        }

        if !self.ctx.files.ensure_directory(&hooks_dir) {
            tracing::error!(component = NAME, "Could not create hooks directory: {}", hooks_dir.display());
            return Ok(false);
        }

        let mut copied = 0;
        for (source, target) in &to_install {
            let name = source.file_name().unwrap_or_default().to_string_lossy();
            tracing::debug!(component = NAME, "Copying {name} to {}", target.display());
            if self.ctx.files.copy_file(source, target) {
                copied += 1;
            } else {
                tracing::error!(component = NAME, "Failed to copy {name}");
            }
        }

        if copied != to_install.len() {
            tracing::error!(
                component = NAME,
                "Only {copied}/{} hook files copied successfully",
                to_install.len()
            );
            return Ok(false);
        }

        tracing::info!(component = NAME, "Hooks component installed successfully ({copied} hook files)");
        self.post_install(copied, config)?;
        Ok(true)
    }

    fn post_install(&self, copied: usize, config: &InstallConfig) -> Result<()> {
        self.resolve_placeholder()?;

        let record = InstalledComponentRecord::new(VERSION, copied)
            .with_status(ComponentStatus::Installed)
            .with_category(CATEGORY);
        self.ctx
            .settings
            .add_component_registration(NAME, record)
            .map_err(Self::registration_error)?;
        tracing::info!(component = NAME, "Updated metadata with hooks component registration");

        let stop_hook = self.stop_hook_path();
        if stop_hook.is_file() {
            let added = self
                .ctx
                .settings
                .add_stop_hook(&stop_hook.display().to_string(), config.stop_hook_timeout)
                .map_err(Self::registration_error)?;
            if added {
                tracing::info!(component = NAME, "Configured {STOP_HOOK_FILE} hook in settings.json");
            }
        }
        Ok(())
    }

    /// Remove a placeholder marker left next to real hook files and mark the
    /// registration as installed. Returns true when a marker was removed.
    pub fn resolve_placeholder(&self) -> Result<bool> {
        let placeholder = self.placeholder();
        let installed = self.installed_hook_files();
        if !placeholder.is_file() || installed.is_empty() {
            return Ok(false);
        }

        if !self.ctx.files.remove_file(&placeholder) {
            return Err(SetupError::Io(std::io::Error::other(format!(
                "could not remove {}",
                placeholder.display()
            ))));
        }
        tracing::info!(component = NAME, "Removed leftover hooks placeholder");

        if let Some(mut record) = self.ctx.settings.component_record(NAME)? {
            if record.status == Some(ComponentStatus::Placeholder) {
                record.status = Some(ComponentStatus::Installed);
                record.files_count = installed.len();
                self.ctx
                    .settings
                    .add_component_registration(NAME, record)
                    .map_err(Self::registration_error)?;
            }
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Uninstall
    // -----------------------------------------------------------------------

    fn try_uninstall(&self) -> Result<()> {
        tracing::info!(component = NAME, "Uninstalling SuperClaude hooks component...");
        let hooks_dir = self.hooks_dir();

        let mut removed = 0;
        for file in HOOK_FILES {
            if self.ctx.files.remove_file(&hooks_dir.join(file)) {
                removed += 1;
                tracing::debug!(component = NAME, "Removed {file}");
            }
        }
        if self.ctx.files.remove_file(&self.placeholder()) {
            removed += 1;
            tracing::debug!(component = NAME, "Removed hooks placeholder");
        }

        match io::remove_dir_if_empty(&hooks_dir) {
            Ok(true) => tracing::debug!(component = NAME, "Removed empty hooks directory"),
            Ok(false) => {}
            Err(e) => tracing::warn!(component = NAME, "Could not remove hooks directory: {e}"),
        }

        if self
            .ctx
            .settings
            .remove_component_registration(NAME)
            .map_err(Self::registration_error)?
        {
            tracing::info!(component = NAME, "Removed hooks component from metadata");
        }

        match self.ctx.settings.remove_stop_hooks_by_suffix(STOP_HOOK_FILE) {
            Ok(0) => {}
            Ok(n) => tracing::info!(component = NAME, "Removed {n} {STOP_HOOK_FILE} hook(s) from settings.json"),
            Err(e) => tracing::warn!(component = NAME, "Could not update settings.json: {e}"),
        }

        tracing::info!(component = NAME, "Hooks component uninstalled ({removed} files removed)");
        Ok(())
    }
}

impl Component for HooksComponent {
    fn context(&self) -> &ComponentContext {
        &self.ctx
    }

    fn get_metadata(&self) -> ComponentMetadata {
        ComponentMetadata {
            name: NAME.to_string(),
            version: VERSION.to_string(),
            description: "Claude Code hooks for enhanced behavior and anti-sycophantic responses"
                .to_string(),
            category: CATEGORY.to_string(),
        }
    }

    fn install(&self, config: &InstallConfig) -> bool {
        match self.try_install(config) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!(component = NAME, "Failed to install hooks component: {e}");
                false
            }
        }
    }

    fn uninstall(&self) -> bool {
        match self.try_uninstall() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(component = NAME, "Unexpected error during hooks uninstallation: {e}");
                false
            }
        }
    }

    fn validate_installation(&self) -> Validation {
        let mut validation = Validation::default();

        let hooks_dir = self.hooks_dir();
        if !hooks_dir.is_dir() {
            validation.push("Hooks directory not found");
        }

        self.ctx.check_registration(&self.get_metadata(), &mut validation);

        if hooks_dir.is_dir() {
            let has_placeholder = self.placeholder().is_file();
            let has_hooks = !self.installed_hook_files().is_empty();

            if !has_placeholder && !has_hooks {
                validation.push("No hook files or placeholder found");
            }
            if has_placeholder && has_hooks {
                validation.push(
                    "Placeholder marker coexists with installed hook files; resolve the placeholder",
                );
            }

            match self.ctx.registration_status(NAME) {
                Ok(Some(ComponentStatus::Placeholder)) if has_hooks && !has_placeholder => {
                    validation.push("Registered as placeholder but hook files are installed");
                }
                Ok(Some(ComponentStatus::Installed)) if !has_hooks => {
                    validation.push("Registered as installed but no hook files are present");
                }
                _ => {}
            }

            let stop_hook = self.stop_hook_path();
            if stop_hook.is_file() {
                match self.ctx.settings.has_stop_hook(&stop_hook.display().to_string()) {
                    Ok(true) => {}
                    Ok(false) => validation.push(format!(
                        "{STOP_HOOK_FILE} is installed but not registered as a Stop hook"
                    )),
                    Err(e) => validation.push(format!("Could not read settings: {e}")),
                }
            }
        }

        validation
    }

    fn managed_files(&self) -> Vec<PathBuf> {
        let mut files = self.installed_hook_files();
        let placeholder = self.placeholder();
        if placeholder.is_file() {
            files.push(placeholder);
        }
        files
    }

    fn install_directory(&self) -> PathBuf {
        self.hooks_dir()
    }

    fn planned_files(&self) -> Vec<String> {
        if self.source_dir().is_dir() {
            HOOK_FILES.iter().map(|f| f.to_string()).collect()
        } else {
            vec![paths::PLACEHOLDER_FILE.to_string()]
        }
    }

    fn size_estimate(&self) -> u64 {
        let source_dir = self.source_dir();
        let total: u64 = HOOK_FILES
            .iter()
            .filter_map(|f| std::fs::metadata(source_dir.join(f)).ok())
            .map(|m| m.len())
            .sum();
        total.max(MIN_SIZE_ESTIMATE)
    }

    fn source_status(&self) -> &'static str {
        if self.source_dir().is_dir() {
            "implemented"
        } else {
            "placeholder"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
