//! Stop hook that flags sycophantic assistant replies.
//!
//! The assistant runs the hook after each response with a JSON payload on
//! stdin naming the session transcript. The last assistant message is
//! scanned against phrase tables; a hit produces a `block` decision asking
//! for a revised, objective answer.

use crate::config::SycophancyConfig;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Phrase tables
// ---------------------------------------------------------------------------

// `'` in these tables stands for any apostrophe form, straight or curly.

const HIGH_CONFIDENCE: &[&str] = &[
    "you're absolutely right",
    "you're completely right",
    "you're totally right",
    "you're entirely correct",
    "you're absolutely correct",
    "absolutely brilliant",
    "that's a brilliant point",
    "excellent observation",
    "great catch",
    "you've made an excellent point",
    "that's a fantastic point",
    "you raise an excellent point",
    "what a great question",
    "that's a great question",
    "excellent question",
    "fantastic question",
    "brilliant question",
    "you're spot on",
    "you've hit the nail on the head",
    "couldn't agree more",
    "perfectly put",
    "beautifully put",
    "excellently stated",
    "very astute",
    "keen observation",
    "sharp observation",
];

/// Phrases prefixed with `^` only count at the start of a line.
const MEDIUM_CONFIDENCE: &[&str] = &[
    "^you're right",
    "^exactly right",
    "^that's right",
    "^good point",
    "^great point",
    "^excellent point",
    "^fair point",
    "^you make a good point",
    "^interesting point",
    "^that's true",
    "^very true",
    "^so true",
    "^absolutely",
    "^definitely",
    "^indeed",
    "^precisely",
    "^good thinking",
    "^smart thinking",
    "^clever thinking",
    "insightful question",
    "thoughtful question",
    "perceptive question",
    "you've identified",
    "you've correctly identified",
    "you've rightly identified",
];

const LOW_CONFIDENCE: &[&str] = &[
    "thank you for pointing that out",
    "thanks for clarifying",
    "thanks for the correction",
    "i appreciate the correction",
    "good idea",
    "interesting idea",
    "that makes sense",
    "i see what you mean",
    "i understand your point",
    "that's helpful",
    "that's useful",
];

/// Agreement about verifiable facts. Any of these in a reply clears it.
const LEGITIMATE: &[&str] = &[
    "mathematically correct",
    "factually correct",
    "technically correct",
    "historically accurate",
    "scientifically accurate",
    "your calculation is correct",
    "the formula is correct",
    "the code is correct",
    "that's the correct syntax",
    "yes, that's how it works",
    "yes, that's the definition",
];

const APOSTROPHE: &str = "['’‘]";

/// Turn a table phrase into a case-insensitive, multi-line pattern.
fn phrase_pattern(phrase: &str) -> String {
    let (anchor, body) = match phrase.strip_prefix('^') {
        Some(rest) => ("^", rest),
        None => ("", phrase),
    };
    let escaped: Vec<String> = body.split('\'').map(regex::escape).collect();
    format!("(?im){anchor}{}", escaped.join(APOSTROPHE))
}

fn compile(phrases: &[&str]) -> Vec<Regex> {
    phrases
        .iter()
        .map(|p| Regex::new(&phrase_pattern(p)).expect("phrase table pattern is valid"))
        .collect()
}

static HIGH_RE: OnceLock<Vec<Regex>> = OnceLock::new();
static MEDIUM_RE: OnceLock<Vec<Regex>> = OnceLock::new();
static LOW_RE: OnceLock<Vec<Regex>> = OnceLock::new();
static LEGITIMATE_RE: OnceLock<Vec<Regex>> = OnceLock::new();

// ---------------------------------------------------------------------------
// Sensitivity / Confidence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// High-confidence phrases only.
    Low,
    /// High and medium.
    #[default]
    Medium,
    /// Every table.
    High,
}

impl Sensitivity {
    pub fn levels(self) -> &'static [Confidence] {
        match self {
            Sensitivity::Low => &[Confidence::High],
            Sensitivity::Medium => &[Confidence::High, Confidence::Medium],
            Sensitivity::High => &[Confidence::High, Confidence::Medium, Confidence::Low],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high_confidence",
            Confidence::Medium => "medium_confidence",
            Confidence::Low => "low_confidence",
        }
    }

    fn patterns(self) -> &'static [Regex] {
        match self {
            Confidence::High => HIGH_RE.get_or_init(|| compile(HIGH_CONFIDENCE)),
            Confidence::Medium => MEDIUM_RE.get_or_init(|| compile(MEDIUM_CONFIDENCE)),
            Confidence::Low => LOW_RE.get_or_init(|| compile(LOW_CONFIDENCE)),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Matched text in scan order, as it appears in the reply.
    pub matched: Vec<String>,
    /// Level of the first match.
    pub confidence: Option<Confidence>,
}

impl Detection {
    pub fn is_sycophantic(&self) -> bool {
        !self.matched.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    sensitivity: Sensitivity,
}

impl Detector {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self { sensitivity }
    }

    pub fn detect(&self, text: &str) -> Detection {
        let mut detection = Detection::default();
        if text.is_empty() {
            return detection;
        }
        let legitimate = has_legitimate_phrase(text);

        for &level in self.sensitivity.levels() {
            for pattern in level.patterns() {
                for m in pattern.find_iter(text) {
                    let matched = m.as_str();
                    if legitimate || is_quoted(text, matched) || is_negated(text, matched) {
                        continue;
                    }
                    detection.matched.push(matched.to_string());
                    detection.confidence.get_or_insert(level);
                }
            }
        }
        detection
    }
}

fn has_legitimate_phrase(text: &str) -> bool {
    LEGITIMATE_RE
        .get_or_init(|| compile(LEGITIMATE))
        .iter()
        .any(|re| re.is_match(text))
}

fn is_quoted(text: &str, matched: &str) -> bool {
    text.contains(&format!("\"{matched}\"")) || text.contains(&format!("'{matched}'"))
}

fn is_negated(text: &str, matched: &str) -> bool {
    let escaped = regex::escape(matched);
    [
        format!(r"(?i)not\s+{escaped}"),
        format!(r"(?i)don{APOSTROPHE}t\s+think\s+{escaped}"),
        format!(r"(?i)wouldn{APOSTROPHE}t\s+say\s+{escaped}"),
    ]
    .iter()
    .any(|p| Regex::new(p).map(|re| re.is_match(text)).unwrap_or(false))
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Read a JSONL transcript. A missing file is empty; lines that are not
/// valid JSON are skipped.
pub fn load_transcript(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(path)?;
    let mut messages = Vec::new();
    for (lineno, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(v) => messages.push(v),
            Err(e) => tracing::debug!(line = lineno + 1, error = %e, "skipping transcript line"),
        }
    }
    Ok(messages)
}

/// Text of the most recent assistant message. Handles the session format
/// (`{"type":"assistant","message":{"role":"assistant",...}}`), bare
/// `{"role":"assistant","content":...}` entries and
/// `{"type":"assistant_message","message":"..."}`.
pub fn extract_assistant_response(messages: &[Value]) -> String {
    for message in messages.iter().rev() {
        let Some(obj) = message.as_object() else {
            continue;
        };

        if obj.get("type").and_then(Value::as_str) == Some("assistant") && obj.contains_key("message") {
            if let Some(inner) = obj.get("message").and_then(Value::as_object) {
                if inner.get("role").and_then(Value::as_str) == Some("assistant") {
                    return content_text(inner.get("content"));
                }
            }
        } else if obj.get("role").and_then(Value::as_str) == Some("assistant") {
            return content_text(obj.get("content"));
        } else if obj.get("type").and_then(Value::as_str) == Some("assistant_message") {
            return obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
        }
    }
    String::new()
}

fn content_text(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .map(|b| b.get("text").and_then(Value::as_str).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Hook protocol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub transcript_path: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub stop_hook_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookDecision {
    pub decision: &'static str,
    pub reason: String,
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

impl HookDecision {
    pub fn block(detection: &Detection, timestamp: &str) -> Self {
        let confidence = detection.confidence.map(Confidence::as_str).unwrap_or("");
        let reason = format!(
            "🚫 ANTI-SYCOPHANT HOOK ACTIVATED\n\
             {RULE}\n\
             Detected phrases: {}\n\
             Confidence level: {confidence}\n\
             Timestamp: {timestamp}\n\
             {RULE}\n\n\
             ⚠️ BEHAVIORAL CORRECTION: Your response contained sycophantic language. \
             Please revise your response to:\n\
             1. Focus on technical accuracy and facts\n\
             2. Provide objective analysis without excessive agreement\n\
             3. Maintain a professional, analytical tone\n\n\
             Revise your response without sycophantic language.",
            detection.matched.join(", ")
        );
        Self {
            decision: "block",
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Nothing to report.
    Pass,
    /// Print the decision as JSON on stdout.
    Block(HookDecision),
    /// Print the message on stderr.
    Warn(String),
}

/// Decide what the Stop hook reports for `input`. Transcript read errors are
/// logged and treated as an empty transcript.
pub fn evaluate(input: &HookInput, config: &SycophancyConfig) -> HookOutcome {
    if input.stop_hook_active {
        tracing::debug!(session = %input.session_id, "stop hook already active, skipping");
        return HookOutcome::Pass;
    }

    let messages = match load_transcript(Path::new(&input.transcript_path)) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("Error loading transcript: {e}");
            return HookOutcome::Pass;
        }
    };
    if messages.is_empty() {
        return HookOutcome::Pass;
    }

    let response = extract_assistant_response(&messages);
    if response.is_empty() {
        return HookOutcome::Pass;
    }

    let detection = Detector::new(config.sensitivity).detect(&response);
    if !detection.is_sycophantic() {
        return HookOutcome::Pass;
    }
    tracing::info!(
        session = %input.session_id,
        matches = detection.matched.len(),
        "sycophantic language detected"
    );

    if config.block_and_revise {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        HookOutcome::Block(HookDecision::block(&detection, &timestamp))
    } else {
        HookOutcome::Warn(format!(
            "⚠️ Sycophantic language detected: {}",
            detection.matched.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
