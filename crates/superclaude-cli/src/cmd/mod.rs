pub mod hook;
pub mod install;
pub mod list;
pub mod optimize;
pub mod uninstall;
pub mod update;
pub mod validate;

use crate::output::{print_json, print_table};
use crate::root;
use anyhow::Context;
use std::path::{Path, PathBuf};
use superclaude_core::component::{ComponentContext, InstallConfig};
use superclaude_core::config::{SetupConfig, WarnLevel};
use superclaude_core::installer::{Installer, LifecycleReport, Outcome};
use superclaude_core::paths;

/// Resolved directories and configuration shared by every command.
pub struct Env {
    pub install_dir: PathBuf,
    pub source_root: PathBuf,
    pub config: SetupConfig,
}

impl Env {
    pub fn resolve(install_dir: Option<&Path>, source_dir: Option<&Path>) -> anyhow::Result<Self> {
        let install_dir = root::resolve_install_dir(install_dir)?;
        let config = SetupConfig::load(&install_dir).with_context(|| {
            format!(
                "failed to load {}",
                paths::config_path(&install_dir).display()
            )
        })?;
        for w in config.validate() {
            match w.level {
                WarnLevel::Warning => tracing::warn!("config: {}", w.message),
                WarnLevel::Error => tracing::error!("config: {}", w.message),
            }
        }
        let source_root = root::resolve_source_root(source_dir, config.source_dir.as_deref());
        tracing::debug!(
            install_dir = %install_dir.display(),
            source_root = %source_root.display(),
            "resolved directories"
        );
        Ok(Self {
            install_dir,
            source_root,
            config,
        })
    }

    pub fn context(&self) -> ComponentContext {
        ComponentContext::new(self.install_dir.clone(), self.source_root.clone())
    }

    pub fn installer(&self) -> Installer {
        Installer::with_defaults(self.context())
    }

    pub fn install_config(&self, force: bool) -> InstallConfig {
        InstallConfig {
            force,
            stop_hook_timeout: self.config.hooks.stop_timeout,
        }
    }
}

/// Print a lifecycle report and fail when any component did not succeed.
pub fn finish_report(report: &LifecycleReport, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(report)?;
    } else {
        let rows = report
            .components
            .iter()
            .map(|c| {
                let (status, detail) = match &c.outcome {
                    Outcome::Succeeded => ("ok", String::new()),
                    Outcome::Failed => ("failed", "see log above".to_string()),
                    Outcome::Skipped { reason } => ("skipped", reason.clone()),
                };
                vec![c.component.clone(), status.to_string(), detail]
            })
            .collect();
        print_table(&["COMPONENT", "STATUS", "DETAIL"], rows);
    }

    if !report.all_succeeded() {
        anyhow::bail!("{} failed for: {}", report.action, report.failed().join(", "));
    }
    Ok(())
}
