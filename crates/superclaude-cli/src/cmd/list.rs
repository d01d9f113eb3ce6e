use super::Env;
use crate::output::{human_size, print_json, print_table};
use anyhow::Context;

/// `superclaude list`: planned install per component plus its registration.
pub fn run(env: &Env, json: bool) -> anyhow::Result<()> {
    let installer = env.installer();
    let settings = env.context().settings;

    let mut entries = Vec::new();
    for summary in installer.summaries() {
        let installed = settings
            .get_component_version(&summary.component)
            .context("failed to read settings.json")?;
        entries.push((summary, installed));
    }

    if json {
        let items: Vec<serde_json::Value> = entries
            .iter()
            .map(|(summary, installed)| -> anyhow::Result<serde_json::Value> {
                let mut value = serde_json::to_value(summary)?;
                value["installed_version"] = serde_json::json!(installed);
                Ok(value)
            })
            .collect::<anyhow::Result<_>>()?;
        return print_json(&items);
    }

    let rows = entries
        .into_iter()
        .map(|(s, installed)| {
            vec![
                s.component,
                s.version,
                s.status.to_string(),
                installed.unwrap_or_else(|| "-".to_string()),
                s.files.len().to_string(),
                human_size(s.estimated_size),
                s.category,
            ]
        })
        .collect();
    print_table(
        &["COMPONENT", "VERSION", "SOURCE", "INSTALLED", "FILES", "SIZE", "CATEGORY"],
        rows,
    );
    Ok(())
}
