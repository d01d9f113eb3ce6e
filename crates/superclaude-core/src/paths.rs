use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Install-side layout (relative to the install dir, e.g. ~/.claude)
// ---------------------------------------------------------------------------

pub const DEFAULT_INSTALL_DIR: &str = ".claude";
pub const SETTINGS_FILE: &str = "settings.json";
pub const CONFIG_FILE: &str = "superclaude.yaml";
pub const SCRIPTS_DIR: &str = "scripts";
pub const HOOKS_DIR: &str = "hooks";
pub const PLACEHOLDER_FILE: &str = "PLACEHOLDER.py";

// ---------------------------------------------------------------------------
// Source-side layout (relative to the source root, e.g. ./SuperClaude)
// ---------------------------------------------------------------------------

pub const SOURCE_ROOT_DIR: &str = "SuperClaude";
pub const SOURCE_SCRIPTS_DIR: &str = "Scripts";
pub const SOURCE_HOOKS_DIR: &str = "Hooks";

/// Suffix appended to a file name when it is backed up before an update.
pub const BACKUP_SUFFIX: &str = "backup";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn settings_path(install_dir: &Path) -> PathBuf {
    install_dir.join(SETTINGS_FILE)
}

pub fn config_path(install_dir: &Path) -> PathBuf {
    install_dir.join(CONFIG_FILE)
}

pub fn scripts_dir(install_dir: &Path) -> PathBuf {
    install_dir.join(SCRIPTS_DIR)
}

pub fn hooks_dir(install_dir: &Path) -> PathBuf {
    install_dir.join(HOOKS_DIR)
}

pub fn placeholder_path(install_dir: &Path) -> PathBuf {
    hooks_dir(install_dir).join(PLACEHOLDER_FILE)
}

pub fn source_scripts_dir(source_root: &Path) -> PathBuf {
    source_root.join(SOURCE_SCRIPTS_DIR)
}

pub fn source_hooks_dir(source_root: &Path) -> PathBuf {
    source_root.join(SOURCE_HOOKS_DIR)
}

/// `run.sh` -> `run.sh.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Inverse of [`backup_path`]: strips the trailing backup extension.
pub fn original_from_backup(backup: &Path) -> Option<PathBuf> {
    if backup.extension()? != BACKUP_SUFFIX {
        return None;
    }
    Some(backup.with_extension(""))
}

/// Walk upward from `start` looking for a directory containing `SuperClaude/`.
/// Falls back to `start/SuperClaude` when none is found.
pub fn discover_source_root(start: &Path) -> PathBuf {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(SOURCE_ROOT_DIR);
        if candidate.is_dir() {
            return candidate;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }
    start.join(SOURCE_ROOT_DIR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
