//! Pulls the JSON payload out of generated text.
//!
//! Generated text usually wraps its answer in a ```` ```json ```` fence,
//! sometimes with prose around it, stray control characters inside, or no
//! fence at all. [`extract`] never fails: when nothing parseable is found it
//! hands back the original text as [`Extracted::Raw`] and the consuming stage
//! decides what "no data" means for it.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const JSON_FENCE_MARKER: &str = "```json";

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid fence pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// Content of a fenced block that parses as JSON, possibly after repair.
    Json { text: String, value: Value },
    /// No parseable fenced block; the original text, unchanged.
    Raw(String),
}

impl Extracted {
    pub fn text(&self) -> &str {
        match self {
            Extracted::Json { text, .. } => text,
            Extracted::Raw(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Extracted::Json { text, .. } => text,
            Extracted::Raw(text) => text,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Extracted::Json { .. })
    }

    /// The decoded payload. Raw text gets one more chance as bare JSON;
    /// `None` is the "no data" outcome.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Extracted::Json { value, .. } => Some(value),
            Extracted::Raw(text) => parse_with_repair(&text).map(|(_, value)| value),
        }
    }
}

pub fn extract(raw: &str) -> Extracted {
    let Some(captures) = FENCED_JSON.captures(raw) else {
        tracing::debug!("No fenced JSON block found in generated text");
        return Extracted::Raw(raw.to_string());
    };

    let content = captures.get(1).map_or("", |m| m.as_str());
    match parse_with_repair(content) {
        Some((text, value)) => Extracted::Json { text, value },
        None => {
            tracing::warn!(
                "Fenced JSON block could not be parsed even after repair ({} chars)",
                content.len()
            );
            Extracted::Raw(raw.to_string())
        }
    }
}

/// Best-effort JSON string: the fenced content when it parses, otherwise the input unchanged.
pub fn extract_json_text(raw: &str) -> String {
    extract(raw).into_text()
}

/// Strips control characters (C0, DEL, C1) and surrounding whitespace.
pub fn repair(content: &str) -> String {
    content.trim().chars().filter(|c| !c.is_control()).collect()
}

fn parse_with_repair(content: &str) -> Option<(String, Value)> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Some((content.to_string(), value));
    }

    // 第一次解析失敗才移除控制字元再試一次
    let repaired = repair(content);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            tracing::debug!("JSON parsed after stripping control characters");
            Some((repaired, value))
        }
        Err(_) => None,
    }
}
