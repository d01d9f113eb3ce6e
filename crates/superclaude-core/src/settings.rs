//! Typed view of the assistant's `settings.json`.
//!
//! The document is shared with other tools, so every key this crate does not
//! model is carried through `extra` maps and written back unchanged. Entries of
//! `components` stay raw JSON until a caller asks for one by name, so records
//! written by other tools never have to match this crate's schema.

use crate::error::{Result, SetupError};
use crate::paths;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Component registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Placeholder,
    Installed,
    /// Any status written by another tool.
    #[serde(other)]
    Unknown,
}

impl ComponentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Placeholder => "placeholder",
            ComponentStatus::Installed => "installed",
            ComponentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `components` section. The component name is the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledComponentRecord {
    pub version: String,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub files_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ComponentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Kept as text: other writers use naive ISO timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstalledComponentRecord {
    pub fn new(version: impl Into<String>, files_count: usize) -> Self {
        Self {
            version: version.into(),
            installed: true,
            files_count,
            status: None,
            category: None,
            installed_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_status(mut self, status: ComponentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Hook configuration
// ---------------------------------------------------------------------------

fn default_hook_type() -> String {
    "command".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    #[serde(rename = "type", default = "default_hook_type")]
    pub kind: String,
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookEntry {
    pub fn command(command: impl Into<String>, timeout: u32) -> Self {
        Self {
            kind: default_hook_type(),
            command: command.into(),
            timeout: Some(timeout),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookGroup {
    #[serde(default)]
    pub hooks: Vec<HookEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `hooks` section. Only the `Stop` event is modelled; other events
/// (PreToolUse, Notification, ...) live in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(rename = "Stop", default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<HookGroup>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl HookConfig {
    pub fn is_empty(&self) -> bool {
        self.stop.is_empty() && self.other.is_empty()
    }

    pub fn has_stop_command(&self, command: &str) -> bool {
        self.stop
            .iter()
            .flat_map(|g| &g.hooks)
            .any(|h| h.command == command)
    }

    /// Drop every Stop hook whose command ends with `suffix`.
    /// Returns how many entries were removed.
    pub fn remove_hooks_by_command_suffix(&mut self, suffix: &str) -> usize {
        let mut removed = 0;
        for group in &mut self.stop {
            let before = group.hooks.len();
            group.hooks.retain(|h| !h.command.ends_with(suffix));
            removed += before - group.hooks.len();
        }
        removed
    }

    /// Drop Stop groups that no longer hold any hooks.
    pub fn prune_empty_groups(&mut self) {
        self.stop.retain(|g| !g.hooks.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Settings document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HookConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Parse the record registered under `name`.
    pub fn component(&self, name: &str) -> Result<Option<InstalledComponentRecord>> {
        let Some(raw) = self.components.get(name) else {
            return Ok(None);
        };
        serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| SetupError::InvalidSettings(format!("component {name}: {e}")))
    }

    pub fn set_component(&mut self, name: &str, record: &InstalledComponentRecord) -> Result<()> {
        self.components
            .insert(name.to_string(), serde_json::to_value(record)?);
        Ok(())
    }

    pub fn hooks_mut(&mut self) -> &mut HookConfig {
        self.hooks.get_or_insert_with(HookConfig::default)
    }

    /// Remove the `hooks` section entirely once nothing is left in it.
    pub fn prune_empty_hooks(&mut self) {
        if let Some(hooks) = &mut self.hooks {
            hooks.prune_empty_groups();
            if hooks.is_empty() {
                self.hooks = None;
            }
        }
    }
}

/// Recursively merge `patch` into `base`. Objects merge key by key; any other
/// value in `patch` replaces the one in `base`.
fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                deep_merge(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

// ---------------------------------------------------------------------------
// SettingsStore
// ---------------------------------------------------------------------------

/// File-backed settings store. Each call reads the document fresh and writes
/// it back atomically; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            path: paths::settings_path(install_dir),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load_settings(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let mut data = serde_json::to_string_pretty(settings)?;
        data.push('\n');
        crate::io::atomic_write(&self.path, data.as_bytes())
    }

    /// Deep-merge `mods` (a JSON object) into the stored document.
    pub fn update_metadata(&self, mods: &Value) -> Result<()> {
        if !mods.is_object() {
            return Err(SetupError::InvalidSettings(
                "metadata modifications must be a JSON object".to_string(),
            ));
        }
        let mut doc = serde_json::to_value(self.load_settings()?)?;
        deep_merge(&mut doc, mods);
        let merged: Settings = serde_json::from_value(doc)
            .map_err(|e| SetupError::InvalidSettings(e.to_string()))?;
        self.save_settings(&merged)
    }

    // -----------------------------------------------------------------------
    // Component registry
    // -----------------------------------------------------------------------

    /// Insert or replace the registration for `name`.
    pub fn add_component_registration(
        &self,
        name: &str,
        mut record: InstalledComponentRecord,
    ) -> Result<()> {
        let mut settings = self.load_settings()?;
        if record.installed_at.is_none() {
            record.installed_at = Some(Utc::now().to_rfc3339());
        }
        settings.set_component(name, &record)?;
        self.save_settings(&settings)
    }

    /// Returns true if a registration existed and was removed.
    pub fn remove_component_registration(&self, name: &str) -> Result<bool> {
        let mut settings = self.load_settings()?;
        if settings.components.remove(name).is_none() {
            return Ok(false);
        }
        self.save_settings(&settings)?;
        Ok(true)
    }

    pub fn component_record(&self, name: &str) -> Result<Option<InstalledComponentRecord>> {
        self.load_settings()?.component(name)
    }

    pub fn is_component_installed(&self, name: &str) -> Result<bool> {
        Ok(self
            .component_record(name)?
            .map(|r| r.installed)
            .unwrap_or(false))
    }

    /// Version of an installed component, `None` when absent or not installed.
    pub fn get_component_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .component_record(name)?
            .filter(|r| r.installed)
            .map(|r| r.version))
    }

    // -----------------------------------------------------------------------
    // Hook configuration
    // -----------------------------------------------------------------------

    /// Register `command` as a Stop hook. Returns false if it was already present.
    pub fn add_stop_hook(&self, command: &str, timeout: u32) -> Result<bool> {
        let mut settings = self.load_settings()?;
        let hooks = settings.hooks_mut();
        if hooks.has_stop_command(command) {
            return Ok(false);
        }
        hooks.stop.push(HookGroup {
            hooks: vec![HookEntry::command(command, timeout)],
            extra: Map::new(),
        });
        self.save_settings(&settings)?;
        Ok(true)
    }

    pub fn has_stop_hook(&self, command: &str) -> Result<bool> {
        Ok(self
            .load_settings()?
            .hooks
            .map(|h| h.has_stop_command(command))
            .unwrap_or(false))
    }

    /// Remove Stop hooks owned by a component (matched by command suffix) and
    /// clean up the groups and section left empty. Only writes when something
    /// was removed. Returns the number of hooks removed.
    pub fn remove_stop_hooks_by_suffix(&self, suffix: &str) -> Result<usize> {
        let mut settings = self.load_settings()?;
        let Some(hooks) = settings.hooks.as_mut() else {
            return Ok(0);
        };
        let removed = hooks.remove_hooks_by_command_suffix(suffix);
        if removed == 0 {
            return Ok(0);
        }
        settings.prune_empty_hooks();
        self.save_settings(&settings)?;
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path())
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let settings = store(&dir).load_settings().unwrap();
        assert!(settings.components.is_empty());
        assert!(settings.hooks.is_none());
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(
            s.path(),
            r#"{"model":"opus","permissions":{"allow":["Bash"]},
                "hooks":{"PreToolUse":[{"matcher":"Bash","hooks":[]}]}}"#,
        )
        .unwrap();

        s.add_component_registration("scripts", InstalledComponentRecord::new("1.0.0", 2))
            .unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(s.path()).unwrap()).unwrap();
        assert_eq!(raw["model"], "opus");
        assert_eq!(raw["permissions"]["allow"][0], "Bash");
        assert_eq!(raw["hooks"]["PreToolUse"][0]["matcher"], "Bash");
        assert_eq!(raw["components"]["scripts"]["files_count"], 2);
    }

    #[test]
    fn registration_lifecycle() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        assert!(!s.is_component_installed("hooks").unwrap());

        s.add_component_registration("hooks", InstalledComponentRecord::new("3.0.0", 1))
            .unwrap();
        assert!(s.is_component_installed("hooks").unwrap());
        assert_eq!(s.get_component_version("hooks").unwrap().as_deref(), Some("3.0.0"));

        assert!(s.remove_component_registration("hooks").unwrap());
        assert!(!s.remove_component_registration("hooks").unwrap());
        assert_eq!(s.get_component_version("hooks").unwrap(), None);
    }

    #[test]
    fn re_registration_replaces_entry() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_component_registration("scripts", InstalledComponentRecord::new("1.0.0", 2))
            .unwrap();
        s.add_component_registration("scripts", InstalledComponentRecord::new("1.0.0", 2))
            .unwrap();
        let settings = s.load_settings().unwrap();
        assert_eq!(settings.components.len(), 1);
        assert_eq!(settings.components["scripts"]["files_count"], 2);
    }

    #[test]
    fn update_metadata_deep_merges() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_component_registration(
            "hooks",
            InstalledComponentRecord::new("2.0.0", 1).with_category("integration"),
        )
        .unwrap();

        s.update_metadata(&json!({
            "components": {"hooks": {"version": "3.0.0", "status": "placeholder", "files_count": 0}}
        }))
        .unwrap();

        let record = s.component_record("hooks").unwrap().unwrap();
        assert_eq!(record.version, "3.0.0");
        assert_eq!(record.status, Some(ComponentStatus::Placeholder));
        assert_eq!(record.files_count, 0);
        assert_eq!(record.category.as_deref(), Some("integration"));
    }

    #[test]
    fn update_metadata_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            store(&dir).update_metadata(&json!(["nope"])),
            Err(SetupError::InvalidSettings(_))
        ));
    }

    #[test]
    fn corrupt_settings_is_an_error() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), "{not json").unwrap();
        assert!(matches!(s.load_settings(), Err(SetupError::Json(_))));
    }

    #[test]
    fn add_stop_hook_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        assert!(s.add_stop_hook("/h/anti_sycophant.py", 5).unwrap());
        assert!(!s.add_stop_hook("/h/anti_sycophant.py", 5).unwrap());

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(s.path()).unwrap()).unwrap();
        assert_eq!(raw["hooks"]["Stop"].as_array().unwrap().len(), 1);
        assert_eq!(raw["hooks"]["Stop"][0]["hooks"][0]["type"], "command");
        assert_eq!(raw["hooks"]["Stop"][0]["hooks"][0]["timeout"], 5);
    }

    #[test]
    fn remove_by_suffix_keeps_foreign_hooks() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(
            s.path(),
            r#"{"hooks":{"Stop":[
                {"hooks":[{"type":"command","command":"/a/anti_sycophant.py","timeout":5},
                          {"type":"command","command":"/a/notify.sh"}]},
                {"hooks":[{"type":"command","command":"/b/anti_sycophant.py"}]}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(s.remove_stop_hooks_by_suffix("anti_sycophant.py").unwrap(), 2);

        let settings = s.load_settings().unwrap();
        let hooks = settings.hooks.unwrap();
        assert_eq!(hooks.stop.len(), 1);
        assert_eq!(hooks.stop[0].hooks.len(), 1);
        assert_eq!(hooks.stop[0].hooks[0].command, "/a/notify.sh");
    }

    #[test]
    fn remove_by_suffix_drops_empty_section() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.add_stop_hook("/h/anti_sycophant.py", 5).unwrap();
        assert_eq!(s.remove_stop_hooks_by_suffix("anti_sycophant.py").unwrap(), 1);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(s.path()).unwrap()).unwrap();
        assert!(raw.get("hooks").is_none());
    }

    #[test]
    fn remove_by_suffix_without_match_does_not_write() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        assert_eq!(s.remove_stop_hooks_by_suffix("anti_sycophant.py").unwrap(), 0);
        assert!(!s.path().exists());
    }

    #[test]
    fn foreign_records_do_not_block_lifecycle() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(
            s.path(),
            r#"{"components":{
                "core":{"version":"3.0.0","installed":true,"status":"partial",
                        "installed_at":"2025-01-01T12:00:00.123456"},
                "mcp":{"enabled":true}
            }}"#,
        )
        .unwrap();

        s.add_component_registration("scripts", InstalledComponentRecord::new("1.0.0", 2))
            .unwrap();
        assert!(s.is_component_installed("scripts").unwrap());
        assert!(s.remove_component_registration("scripts").unwrap());

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(s.path()).unwrap()).unwrap();
        assert_eq!(raw["components"]["core"]["status"], "partial");
        assert_eq!(raw["components"]["core"]["installed_at"], "2025-01-01T12:00:00.123456");
        assert_eq!(raw["components"]["mcp"], json!({"enabled": true}));
    }

    #[test]
    fn own_record_with_foreign_status_and_naive_timestamp_parses() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(
            s.path(),
            r#"{"components":{"hooks":{"version":"3.0.0","installed":true,
                "status":"partial","installed_at":"2025-01-01T12:00:00.123456"}}}"#,
        )
        .unwrap();

        let record = s.component_record("hooks").unwrap().unwrap();
        assert_eq!(record.status, Some(ComponentStatus::Unknown));
        assert_eq!(record.installed_at.as_deref(), Some("2025-01-01T12:00:00.123456"));
        assert_eq!(s.get_component_version("hooks").unwrap().as_deref(), Some("3.0.0"));
    }

    #[test]
    fn malformed_own_record_is_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), r#"{"components":{"hooks":{"installed":true}}}"#).unwrap();
        assert!(matches!(
            s.component_record("hooks"),
            Err(SetupError::InvalidSettings(_))
        ));
        assert!(s.remove_component_registration("hooks").unwrap());
    }

    #[test]
    fn prune_keeps_other_events() {
        let mut settings: Settings = serde_json::from_value(json!({
            "hooks": {"Stop": [{"hooks": []}], "Notification": [{"hooks": []}]}
        }))
        .unwrap();
        settings.prune_empty_hooks();
        let hooks = settings.hooks.unwrap();
        assert!(hooks.stop.is_empty());
        assert!(hooks.other.contains_key("Notification"));
    }
}
