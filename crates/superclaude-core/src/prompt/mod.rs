//! Turns a casual request into a structured prompt scaffold.
//!
//! The request is classified by keyword, the working directory is sniffed
//! for a project type, and both feed a fixed template for that request type.

mod templates;

use crate::config::PromptConfig;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Feature,
    Bugfix,
    Performance,
    Refactor,
    Testing,
    Documentation,
    Analysis,
    General,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Feature => "feature",
            RequestType::Bugfix => "bugfix",
            RequestType::Performance => "performance",
            RequestType::Refactor => "refactor",
            RequestType::Testing => "testing",
            RequestType::Documentation => "documentation",
            RequestType::Analysis => "analysis",
            RequestType::General => "general",
        }
    }

    /// Prefix of the request line inside `<context>`.
    pub fn request_label(self) -> &'static str {
        match self {
            RequestType::Feature => "User request",
            RequestType::Bugfix => "Issue reported",
            RequestType::Performance => "Performance concern",
            RequestType::Refactor => "Refactoring request",
            RequestType::Testing => "Testing request",
            RequestType::Documentation => "Documentation request",
            RequestType::Analysis => "Analysis request",
            RequestType::General => "Request",
        }
    }

    fn template(self) -> &'static str {
        match self {
            RequestType::Feature => templates::FEATURE,
            RequestType::Bugfix => templates::BUGFIX,
            RequestType::Performance => templates::PERFORMANCE,
            RequestType::Refactor => templates::REFACTOR,
            RequestType::Testing => templates::TESTING,
            RequestType::Documentation => templates::DOCUMENTATION,
            RequestType::Analysis => templates::ANALYSIS,
            RequestType::General => templates::GENERAL,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Keyword rules
// ---------------------------------------------------------------------------

struct KeywordRule {
    kind: RequestType,
    keywords: &'static [&'static str],
}

/// Checked in order; the first rule with any keyword inside the lowercased
/// request wins. Matching is by substring, so "address" counts as "add".
const RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: RequestType::Feature,
        keywords: &["add", "create", "implement", "build", "make"],
    },
    KeywordRule {
        kind: RequestType::Bugfix,
        keywords: &["fix", "bug", "error", "broken", "crash"],
    },
    KeywordRule {
        kind: RequestType::Performance,
        keywords: &["slow", "performance", "optimize", "speed"],
    },
    KeywordRule {
        kind: RequestType::Refactor,
        keywords: &["refactor", "clean", "improve", "reorganize"],
    },
    KeywordRule {
        kind: RequestType::Testing,
        keywords: &["test", "testing", "coverage"],
    },
    KeywordRule {
        kind: RequestType::Documentation,
        keywords: &["document", "docs", "readme", "comment"],
    },
    KeywordRule {
        kind: RequestType::Analysis,
        keywords: &["why", "analyze", "understand", "explain"],
    },
];

pub fn classify_request(request: &str) -> RequestType {
    let lower = request.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.kind)
        .unwrap_or(RequestType::General)
}

// ---------------------------------------------------------------------------
// ProjectContext
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    pub cwd: PathBuf,
    pub files: Vec<String>,
    pub framework: Option<String>,
    pub language: Option<String>,
    pub has_tests: bool,
    pub has_git: bool,
}

impl ProjectContext {
    /// Inspect `dir`. Only the first `max_scanned` entries (by name) are
    /// looked at when collecting `files`; unreadable directories give an
    /// empty list.
    pub fn gather(dir: &Path, max_scanned: usize) -> Self {
        let exists = |name: &str| dir.join(name).exists();
        let mut ctx = ProjectContext {
            cwd: dir.to_path_buf(),
            has_git: exists(".git"),
            ..Default::default()
        };

        if exists("package.json") {
            ctx.framework = Some("Node.js/JavaScript".to_string());
            ctx.language = Some("JavaScript/TypeScript".to_string());
            ctx.has_tests = exists("test") || exists("tests") || exists("__tests__");
        } else if exists("requirements.txt") || exists("pyproject.toml") {
            ctx.framework = Some("Python".to_string());
            ctx.language = Some("Python".to_string());
            ctx.has_tests = exists("tests") || exists("test");
        } else if exists("Cargo.toml") {
            ctx.framework = Some("Rust".to_string());
            ctx.language = Some("Rust".to_string());
        } else if exists("go.mod") {
            ctx.framework = Some("Go".to_string());
            ctx.language = Some("Go".to_string());
        }

        ctx.files = scan_files(dir, max_scanned);
        ctx
    }

    /// Lines for the `<context>` block.
    pub fn describe(&self, max_listed: usize) -> String {
        let mut lines = Vec::new();
        if let Some(framework) = &self.framework {
            lines.push(format!("Project type: {framework}"));
        }
        if let Some(language) = &self.language {
            lines.push(format!("Language: {language}"));
        }
        if !self.files.is_empty() && max_listed > 0 {
            let listed: Vec<&str> = self
                .files
                .iter()
                .take(max_listed)
                .map(String::as_str)
                .collect();
            lines.push(format!("Project contains: {}", listed.join(", ")));
        }

        if lines.is_empty() {
            "Working in current directory".to_string()
        } else {
            lines.join("\n")
        }
    }
}

fn scan_files(dir: &Path, max_scanned: usize) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    names
        .into_iter()
        .take(max_scanned)
        .filter(|name| !name.starts_with('.') && dir.join(name).is_file())
        .collect()
}

// ---------------------------------------------------------------------------
// PromptOptimizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizedPrompt {
    pub original: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub scaffolded: String,
}

pub struct PromptOptimizer {
    context: ProjectContext,
    max_listed_files: usize,
}

impl PromptOptimizer {
    pub fn new(context: ProjectContext) -> Self {
        Self {
            context,
            max_listed_files: PromptConfig::default().max_listed_files,
        }
    }

    pub fn from_dir(dir: &Path, config: &PromptConfig) -> Self {
        let context = ProjectContext::gather(dir, config.max_scanned_entries);
        Self::new(context).with_max_listed_files(config.max_listed_files)
    }

    pub fn with_max_listed_files(mut self, n: usize) -> Self {
        self.max_listed_files = n;
        self
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    pub fn classify_request(&self, request: &str) -> RequestType {
        classify_request(request)
    }

    pub fn scaffold_prompt(&self, request: &str, kind: RequestType) -> String {
        format!(
            "<context>\n{}\n{}: {request}\n</context>\n\n{}",
            self.context.describe(self.max_listed_files),
            kind.request_label(),
            kind.template()
        )
    }

    pub fn optimize(&self, request: &str) -> OptimizedPrompt {
        let request_type = self.classify_request(request);
        tracing::debug!(request_type = %request_type, "classified request");
        OptimizedPrompt {
            original: request.to_string(),
            request_type,
            scaffolded: self.scaffold_prompt(request, request_type),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
