use crate::error::Result;
use crate::paths;
use crate::sycophancy::Sensitivity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// HooksConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Seconds the assistant waits for a Stop hook.
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout: u32,
}

fn default_stop_timeout() -> u32 {
    5
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            stop_timeout: default_stop_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_max_listed")]
    pub max_listed_files: usize,
    #[serde(default = "default_max_scanned")]
    pub max_scanned_entries: usize,
}

fn default_max_listed() -> usize {
    5
}

fn default_max_scanned() -> usize {
    10
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_listed_files: default_max_listed(),
            max_scanned_entries: default_max_scanned(),
        }
    }
}

// ---------------------------------------------------------------------------
// SycophancyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SycophancyConfig {
    #[serde(default)]
    pub sensitivity: Sensitivity,
    /// Block the response and ask for a revision; otherwise only warn.
    #[serde(default = "default_block")]
    pub block_and_revise: bool,
}

fn default_block() -> bool {
    true
}

impl Default for SycophancyConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::default(),
            block_and_revise: default_block(),
        }
    }
}

// ---------------------------------------------------------------------------
// SetupConfig
// ---------------------------------------------------------------------------

/// Optional `superclaude.yaml` in the install directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub hooks: HooksConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub sycophancy: SycophancyConfig,
}

impl SetupConfig {
    /// Missing or empty file yields defaults.
    pub fn load(install_dir: &Path) -> Result<Self> {
        let path = paths::config_path(install_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: SetupConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, install_dir: &Path) -> Result<()> {
        let path = paths::config_path(install_dir);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.hooks.stop_timeout == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "hooks.stop_timeout must be at least 1 second".to_string(),
            });
        } else if self.hooks.stop_timeout > 60 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "hooks.stop_timeout={} (>60s delays every response)",
                    self.hooks.stop_timeout
                ),
            });
        }

        if self.prompt.max_scanned_entries == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "prompt.max_scanned_entries=0 disables file listing".to_string(),
            });
        }
        if self.prompt.max_listed_files > self.prompt.max_scanned_entries {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "prompt.max_listed_files={} exceeds max_scanned_entries={}",
                    self.prompt.max_listed_files, self.prompt.max_scanned_entries
                ),
            });
        }

        if let Some(dir) = &self.source_dir {
            if !dir.is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("source_dir '{}' does not exist", dir.display()),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
