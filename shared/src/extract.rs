//! Best-effort extraction of one action object from a model reply.
//!
//! The model is instructed to put the action JSON on its own line, but in
//! practice it shows up bare, inside a ```json fence, or wrapped in single
//! backticks. Four patterns are tried in fixed priority order; the first
//! candidate that parses into an object with a usable tag wins.
//!
//! Patterns 1 and 2 use no-inner-brace matching, so an action containing a
//! nested object is never extracted. That limitation is part of the
//! observable contract for callers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Candidate patterns in priority order. Group 1 is the braced object.
static ACTION_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?is)(\{[^{}]*"type"\s*:\s*"[^"]+"[^{}]*\})"#).unwrap(),
        Regex::new(r#"(?is)(\{[^{}]*"action"\s*:\s*"[^"]+"[^{}]*\})"#).unwrap(),
        Regex::new(r"(?is)```json\s*(\{.*?\})\s*```").unwrap(),
        Regex::new(r"(?is)`(\{[^`]+\})`").unwrap(),
    ]
});

// Extraction is case-insensitive but cleaning is not: an upper-cased
// ```JSON fence can still yield an action while staying in the reply text.
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*\{.*?\}\s*```").unwrap());
static BACKTICKED_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`\{[^`]+\}`").unwrap());
static BARE_ACTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\n\s*\{[^{}]*"type"\s*:[^{}]*\}\s*\n?"#).unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Scan a reply for an embedded action object.
///
/// Returns the parsed object with its tag normalized under `"type"`, or
/// `None` when no candidate is accepted. Candidates that fail to parse as
/// JSON are skipped, not errors.
pub fn extract_action(text: &str) -> Option<Map<String, Value>> {
    for pattern in ACTION_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            let candidate = captures[1].trim();

            let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(candidate) else {
                continue;
            };

            if tag_of(&object).is_none() {
                continue;
            }

            if object.contains_key("action") && !object.contains_key("type") {
                if let Some(tag) = object.remove("action") {
                    object.insert("type".to_string(), tag);
                }
            }

            return Some(object);
        }
    }

    None
}

/// The candidate's tag: a non-empty string under `"type"`, falling back to
/// `"action"` when `"type"` is absent or empty.
fn tag_of(object: &Map<String, Value>) -> Option<&str> {
    let tag = match object.get("type") {
        Some(value) if !is_empty_value(value) => value,
        _ => object.get("action").filter(|&value| !is_empty_value(value))?,
    };
    tag.as_str().filter(|tag| !tag.is_empty())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

/// Strip the action JSON back out of the reply so the user does not see it
/// twice. Applied only after an action was actually extracted.
pub fn clean_reply(text: &str) -> String {
    let text = FENCED_BLOCK.replace_all(text, "");
    let text = BACKTICKED_OBJECT.replace_all(&text, "");
    let text = BARE_ACTION_LINE.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
