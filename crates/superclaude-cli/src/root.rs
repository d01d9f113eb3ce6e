use anyhow::Context;
use std::path::{Path, PathBuf};
use superclaude_core::paths;

/// Resolve the assistant configuration directory.
///
/// Priority:
/// 1. `--install-dir` flag / `SUPERCLAUDE_INSTALL_DIR` env var (passed in as `explicit`)
/// 2. `~/.claude`
pub fn resolve_install_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = home::home_dir()
        .context("could not determine home directory; pass --install-dir")?;
    Ok(home.join(paths::DEFAULT_INSTALL_DIR))
}

/// Resolve the component source root.
///
/// Priority:
/// 1. `--source-dir` flag / `SUPERCLAUDE_SOURCE_DIR` env var (passed in as `explicit`)
/// 2. `source_dir` from `superclaude.yaml`
/// 3. Walk upward from `cwd` looking for `SuperClaude/`
/// 4. Fall back to `cwd/SuperClaude`
pub fn resolve_source_root(explicit: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit.or(configured) {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    paths::discover_source_root(&cwd)
}
