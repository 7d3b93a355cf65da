//! Dataset entry model / 데이터 항목 모델
//!
//! Remote records arrive as loosely typed JSON. `load` coerces them into
//! [`Entry`] values and silently drops anything that does not carry both a
//! question and an answer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One question/answer record / 질문-답변 항목
///
/// Serialized with the data API's field names (`instruction` / `output`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "instruction", alias = "question")]
    pub question: String,
    #[serde(rename = "output", alias = "answer")]
    pub answer: String,
}

impl Entry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Build a trimmed entry, `None` when either side is blank after trimming
    pub fn normalized(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self::new(question, answer))
    }
}

/// Coerce arbitrary parsed JSON into entries / 원시 데이터를 항목 목록으로 변환
///
/// Non-array input yields an empty collection. Malformed elements are
/// filtered out, never reported. Array and object field values count as
/// empty rather than being stringified.
pub fn load(raw: &Value) -> Vec<Entry> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let question = field_text(item, "instruction", "question");
            let answer = field_text(item, "output", "answer");
            Entry::normalized(&question, &answer)
        })
        .collect()
}

/// Read `name`, falling back to `alias` when the primary key is absent or null
fn field_text(item: &Value, name: &str, alias: &str) -> String {
    let value = item
        .get(name)
        .filter(|v| !v.is_null())
        .or_else(|| item.get(alias));
    coerce_text(value)
}

/// Falsy values (null, false, 0, missing) become empty text; containers are
/// not text and are treated the same way.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => String::new(),
    }
}

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern is valid"));

/// Remove trailing commas before `]` and `}` / 끝 쉼표 제거
///
/// Hand-edited dataset files tend to pick these up; the pattern does not
/// look inside string literals.
pub fn repair_trailing_commas(content: &str) -> String {
    TRAILING_COMMA.replace_all(content, "$1").into_owned()
}

/// Parse JSON, retrying once with trailing commas removed
pub fn parse_lenient(content: &str) -> Option<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Some(value),
        Err(first) => {
            let repaired = repair_trailing_commas(content);
            match serde_json::from_str(&repaired) {
                Ok(value) => {
                    tracing::debug!("Parsed JSON after removing trailing commas ({})", first);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("Discarding malformed JSON: {}", e);
                    None
                }
            }
        }
    }
}
