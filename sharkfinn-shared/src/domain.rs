//! Structured documents carried inside rows as JSON.
//!
//! The store keeps these as opaque text; validation happens here, at the API
//! boundary, before anything is written.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::macros::format_description;

pub const DEFAULT_CHILD_AGE: i32 = 5;
pub const DEFAULT_SESSION_STATUS: &str = "open";

/// Rewards inserted by schema bootstrap into an empty rewards table.
pub const DEFAULT_REWARDS: [(&str, i32); 2] = [("Sticker Pack", 5), ("Extra Screen Time", 10)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("payload must be a JSON object")]
    PayloadNotObject,
    #[error("items must be an array")]
    ItemsNotArray,
    #[error("items[{0}] must be an object")]
    ItemNotObject(usize),
    #[error("items[{0}].label required")]
    MissingLabel(usize),
    #[error("items[{index}].time must be HH:MM, got {value:?}")]
    BadTime { index: usize, value: String },
}

/// One entry of a visual schedule, e.g. `{"time": "08:00", "label": "Breakfast"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub label: String,
    /// Extra keys (icons, colours, ...) the frontend attaches; kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleItem {
    pub fn new(time: Option<&str>, label: &str) -> Self {
        Self {
            time: time.map(str::to_string),
            label: label.to_string(),
            extra: Map::new(),
        }
    }
}

/// Validates a raw `items` document and returns the typed schedule entries.
pub fn parse_schedule_items(raw: &Value) -> Result<Vec<ScheduleItem>, DocumentError> {
    let entries = raw.as_array().ok_or(DocumentError::ItemsNotArray)?;
    let fmt = format_description!("[hour]:[minute]");
    let mut out = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let obj = entry
            .as_object()
            .ok_or(DocumentError::ItemNotObject(index))?;
        let label = match obj.get("label").and_then(Value::as_str) {
            Some(l) if !l.trim().is_empty() => l.to_string(),
            _ => return Err(DocumentError::MissingLabel(index)),
        };
        let time = match obj.get("time") {
            None | Some(Value::Null) => None,
            Some(Value::String(t)) => {
                if time::Time::parse(t, &fmt).is_err() {
                    return Err(DocumentError::BadTime {
                        index,
                        value: t.clone(),
                    });
                }
                Some(t.clone())
            }
            Some(other) => {
                return Err(DocumentError::BadTime {
                    index,
                    value: other.to_string(),
                });
            }
        };
        let extra = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "label" && k.as_str() != "time")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.push(ScheduleItem { time, label, extra });
    }
    Ok(out)
}

/// Activity payloads are free-form but must be a JSON object. A missing or
/// `null` payload becomes `{}`.
pub fn normalize_payload(raw: Option<Value>) -> Result<Value, DocumentError> {
    match raw {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(v @ Value::Object(_)) => Ok(v),
        Some(_) => Err(DocumentError::PayloadNotObject),
    }
}
