use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    #[error("component '{component}' depends on unknown component '{dependency}'")]
    UnknownDependency {
        component: String,
        dependency: String,
    },

    #[error("dependency cycle detected involving: {0}")]
    DependencyCycle(String),

    #[error("source not found: {0}")]
    MissingSource(String),

    #[error("partial copy: {copied}/{total} files copied")]
    PartialCopy { copied: usize, total: usize },

    #[error("failed to register '{component}' in settings: {reason}")]
    Registration { component: String, reason: String },

    #[error("could not restore {path}: {reason}")]
    Restore { path: String, reason: String },

    #[error("invalid settings document: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
