//! Pull a component list out of free-form completion text.
//!
//! Candidates, in priority order:
//! 1. the body of a ```` ```json ```` fence
//! 2. the span from the first `{` to the last `}`
//! 3. the raw text
//!
//! Parsing is strict JSON; nothing is repaired.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::tree_builder::ComponentEntry;

/// Larger completions are rejected without being scanned.
pub const MAX_COMPLETION_BYTES: usize = 256 * 1024;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

const TYPE_KEYS: [&str; 3] = ["type", "$Type", "componentType"];
const NAME_KEYS: [&str; 2] = ["name", "$Name"];
const LIST_KEYS: [&str; 3] = ["components", "Components", "$Components"];
const CHILD_KEYS: [&str; 3] = ["children", "components", "$Components"];
const PROPERTIES_KEY: &str = "properties";
const IGNORED_KEYS: [&str; 2] = ["Uuid", "$Version"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("completion is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("no parseable JSON in completion: {0}")]
    Unparseable(String),

    #[error("JSON does not contain a component list")]
    NoComponentList,
}

/// Extract and normalize in one step.
///
/// Each candidate is parsed and normalized in turn, so a braces span that
/// parses but holds no list does not hide a bare array in the raw text.
pub fn extract_components(text: &str) -> Result<Vec<ComponentEntry>, ExtractionError> {
    check_size(text)?;

    let mut failure: Option<ExtractionError> = None;
    for candidate in candidates(text) {
        let result = serde_json::from_str::<Value>(candidate)
            .map_err(|e| ExtractionError::Unparseable(e.to_string()))
            .and_then(|value| normalize_components(&value));
        match result {
            Ok(entries) => return Ok(entries),
            Err(e) => {
                if failure.is_none() || e == ExtractionError::NoComponentList {
                    failure = Some(e);
                }
            }
        }
    }
    Err(failure.unwrap_or_else(|| ExtractionError::Unparseable("empty completion".into())))
}

fn check_size(text: &str) -> Result<(), ExtractionError> {
    if text.len() > MAX_COMPLETION_BYTES {
        return Err(ExtractionError::TooLarge {
            size: text.len(),
            limit: MAX_COMPLETION_BYTES,
        });
    }
    Ok(())
}

fn candidates(text: &str) -> impl Iterator<Item = &str> {
    [fenced(text), braced(text), Some(text.trim())]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
}

fn fenced(text: &str) -> Option<&str> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &text[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(rest[..end].trim())
}

fn braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Accepts `{"components": [...]}` (or `Components` / `$Components`) or a bare array.
pub fn normalize_components(value: &Value) -> Result<Vec<ComponentEntry>, ExtractionError> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(obj) => LIST_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .ok_or(ExtractionError::NoComponentList)?,
        _ => return Err(ExtractionError::NoComponentList),
    };
    if list.is_empty() {
        return Err(ExtractionError::NoComponentList);
    }
    Ok(list.iter().map(normalize_entry).collect())
}

fn normalize_entry(value: &Value) -> ComponentEntry {
    let Some(obj) = value.as_object() else {
        return ComponentEntry::not_an_object();
    };

    let mut entry = ComponentEntry {
        component_type: first_str(obj, &TYPE_KEYS),
        name: first_str(obj, &NAME_KEYS),
        is_object: true,
        ..ComponentEntry::default()
    };

    if let Some(props) = obj.get(PROPERTIES_KEY).and_then(Value::as_object) {
        for (key, value) in props {
            if let Some(text) = scalar_text(value) {
                entry.properties.set(key.clone(), text);
            }
        }
    }

    for (key, value) in obj {
        let key = key.as_str();
        if TYPE_KEYS.contains(&key)
            || NAME_KEYS.contains(&key)
            || CHILD_KEYS.contains(&key)
            || IGNORED_KEYS.contains(&key)
            || key == PROPERTIES_KEY
        {
            continue;
        }
        if let Some(text) = scalar_text(value) {
            entry.properties.set_if_absent(key, text);
        }
    }

    if let Some(children) = CHILD_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
    {
        entry.children = children.iter().map(normalize_entry).collect();
    }
    entry
}

fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// Booleans become `True`/`False`; nested values are ignored.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".into()),
        Value::Bool(false) => Some("False".into()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
