// src/services/extract.rs
//! Pulls the generated text out of an upstream response.
//!
//! The upstream has answered in several shapes over time, so each known shape
//! gets its own extractor and they are tried in [`EXTRACTORS`] order. The
//! first non-empty string wins; if none match, the raw JSON is rendered and
//! truncated to [`MAX_FALLBACK_CHARS`].

use serde_json::Value;

pub const MAX_FALLBACK_CHARS: usize = 2000;

pub type Extractor = fn(&Value) -> Option<&str>;

pub const EXTRACTORS: [(&str, Extractor); 4] = [
    ("candidate_parts", candidate_parts),
    ("candidate_content_array", candidate_content_array),
    ("output", output),
    ("chat_choice", chat_choice),
];

/// `candidates[0].content.parts[0].text`
pub fn candidate_parts(data: &Value) -> Option<&str> {
    data.pointer("/candidates/0/content/parts/0/text")?.as_str()
}

/// `candidates[0].content[0].text`
pub fn candidate_content_array(data: &Value) -> Option<&str> {
    data.pointer("/candidates/0/content/0/text")?.as_str()
}

/// `output[0].text`
pub fn output(data: &Value) -> Option<&str> {
    data.pointer("/output/0/text")?.as_str()
}

/// `choices[0].message.content`
pub fn chat_choice(data: &Value) -> Option<&str> {
    data.pointer("/choices/0/message/content")?.as_str()
}

pub fn extract_reply(data: &Value) -> String {
    EXTRACTORS
        .iter()
        .find_map(|(_, extract)| extract(data).filter(|s| !s.is_empty()))
        .map(str::to_owned)
        .unwrap_or_else(|| fallback_rendering(data))
}

fn fallback_rendering(data: &Value) -> String {
    match data {
        Value::String(s) if !s.is_empty() => s.chars().take(MAX_FALLBACK_CHARS).collect(),
        other => other.to_string().chars().take(MAX_FALLBACK_CHARS).collect(),
    }
}
