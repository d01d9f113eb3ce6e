//! Runs component lifecycles in dependency order.

use crate::component::{Component, ComponentContext, ComponentSummary, InstallConfig};
use crate::error::{Result, SetupError};
use crate::hooks::HooksComponent;
use crate::scripts::ScriptsComponent;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentOutcome {
    pub component: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifecycleReport {
    pub action: &'static str,
    pub components: Vec<ComponentOutcome>,
}

impl LifecycleReport {
    fn new(action: &'static str) -> Self {
        Self {
            action,
            components: Vec::new(),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.components
            .iter()
            .all(|c| c.outcome == Outcome::Succeeded)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|c| c.outcome != Outcome::Succeeded)
            .map(|c| c.component.as_str())
            .collect()
    }

    pub fn outcome(&self, component: &str) -> Option<&Outcome> {
        self.components
            .iter()
            .find(|c| c.component == component)
            .map(|c| &c.outcome)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub component: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Installer
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

#[derive(Clone, Copy)]
enum Lifecycle {
    Install,
    Update,
}

/// Registry of components keyed by name.
#[derive(Default)]
pub struct Installer {
    components: BTreeMap<String, Box<dyn Component>>,
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installer with every component this crate ships.
    pub fn with_defaults(ctx: ComponentContext) -> Self {
        let mut installer = Self::new();
        installer.register(Box::new(ScriptsComponent::new(ctx.clone())));
        installer.register(Box::new(HooksComponent::new(ctx)));
        installer
    }

    pub fn register(&mut self, component: Box<dyn Component>) {
        let name = component.get_metadata().name;
        self.components.insert(name, component);
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    pub fn component(&self, name: &str) -> Option<&dyn Component> {
        self.components.get(name).map(|c| c.as_ref())
    }

    fn get(&self, name: &str) -> Result<&dyn Component> {
        self.component(name)
            .ok_or_else(|| SetupError::UnknownComponent(name.to_string()))
    }

    /// Requested names plus their transitive dependencies, dependencies
    /// first. An empty request selects every registered component.
    pub fn resolve_order(&self, requested: &[String]) -> Result<Vec<String>> {
        let roots: Vec<String> = if requested.is_empty() {
            self.components.keys().cloned().collect()
        } else {
            requested.to_vec()
        };

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut order = Vec::new();
        for root in &roots {
            self.get(root)?;
            self.visit(root, &mut marks, &mut stack, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        marks: &mut HashMap<String, Mark>,
        stack: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|n| n == name).unwrap_or(0);
                let mut cycle = stack[start..].to_vec();
                cycle.push(name.to_string());
                return Err(SetupError::DependencyCycle(cycle.join(" -> ")));
            }
            None => {}
        }

        let component = self.get(name)?;
        marks.insert(name.to_string(), Mark::Visiting);
        stack.push(name.to_string());

        for dep in component.get_dependencies() {
            if !self.components.contains_key(&dep) {
                return Err(SetupError::UnknownDependency {
                    component: name.to_string(),
                    dependency: dep,
                });
            }
            self.visit(&dep, marks, stack, order)?;
        }

        stack.pop();
        marks.insert(name.to_string(), Mark::Done);
        order.push(name.to_string());
        Ok(())
    }

    pub fn install(&self, requested: &[String], config: &InstallConfig) -> Result<LifecycleReport> {
        self.run_ordered(requested, config, Lifecycle::Install)
    }

    pub fn update(&self, requested: &[String], config: &InstallConfig) -> Result<LifecycleReport> {
        self.run_ordered(requested, config, Lifecycle::Update)
    }

    fn run_ordered(
        &self,
        requested: &[String],
        config: &InstallConfig,
        lifecycle: Lifecycle,
    ) -> Result<LifecycleReport> {
        let order = self.resolve_order(requested)?;
        let action = match lifecycle {
            Lifecycle::Install => "install",
            Lifecycle::Update => "update",
        };
        tracing::info!("{action} order: {}", order.join(", "));

        let mut report = LifecycleReport::new(action);
        let mut broken: HashSet<String> = HashSet::new();

        for name in order {
            let component = self.get(&name)?;
            let blocked = component
                .get_dependencies()
                .into_iter()
                .find(|d| broken.contains(d));

            let outcome = if let Some(dep) = blocked {
                tracing::warn!(component = %name, "skipping {name}: dependency {dep} did not {action}");
                Outcome::Skipped {
                    reason: format!("dependency {dep} did not {action}"),
                }
            } else {
                let ok = match lifecycle {
                    Lifecycle::Install => component.install(config),
                    Lifecycle::Update => component.update(config),
                };
                if ok {
                    Outcome::Succeeded
                } else {
                    Outcome::Failed
                }
            };

            if outcome != Outcome::Succeeded {
                broken.insert(name.clone());
            }
            report.components.push(ComponentOutcome {
                component: name,
                outcome,
            });
        }

        Ok(report)
    }

    /// Uninstall only the requested components (all when empty), dependents
    /// before their dependencies.
    pub fn uninstall(&self, requested: &[String]) -> Result<LifecycleReport> {
        let order = self.resolve_order(requested)?;
        let selected: HashSet<&str> = if requested.is_empty() {
            order.iter().map(String::as_str).collect()
        } else {
            requested.iter().map(String::as_str).collect()
        };

        let mut report = LifecycleReport::new("uninstall");
        for name in order.iter().rev().filter(|n| selected.contains(n.as_str())) {
            let outcome = if self.get(name)?.uninstall() {
                Outcome::Succeeded
            } else {
                Outcome::Failed
            };
            report.components.push(ComponentOutcome {
                component: name.clone(),
                outcome,
            });
        }
        Ok(report)
    }

    pub fn validate(&self, requested: &[String]) -> Result<Vec<ValidationReport>> {
        let names: Vec<String> = if requested.is_empty() {
            self.components.keys().cloned().collect()
        } else {
            requested.to_vec()
        };

        names
            .into_iter()
            .map(|name| {
                let (valid, errors) = self.get(&name)?.validate_installation().into_parts();
                Ok(ValidationReport {
                    component: name,
                    valid,
                    errors,
                })
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<ComponentSummary> {
        self.components.values().map(|c| c.summary()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
