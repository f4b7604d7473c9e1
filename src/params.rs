//! Typed access to the untyped argument map of a tool call.
//!
//! MCP clients send `tools/call` arguments as a JSON object. [`Arguments`] wraps
//! that object and hands out trimmed strings, flags, lists and enumerated codes,
//! turning every problem into a [`MissingParameter`](Error::MissingParameter) or
//! [`InvalidParameterValue`](Error::InvalidParameterValue) that names the
//! offending parameter.
//!
//! Free-form values such as due-date tokens are not interpreted here; 2Do's own
//! parser decides what `"tomorrow"` or `"2026-03-01 14:30"` means.

use crate::error::Error;
use serde_json::Value;
use std::collections::HashMap;

/// The argument map of one tool call.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use serde_json::json;
/// use twodo_mcp::params::{Arguments, Priority};
///
/// let mut map = HashMap::new();
/// map.insert("task".to_string(), json!("  Buy milk "));
/// map.insert("priority".to_string(), json!(3));
/// let args = Arguments::new(map, &["task", "priority"]).unwrap();
///
/// assert_eq!(args.required_text("task").unwrap(), "Buy milk");
/// assert_eq!(args.choice::<Priority>("priority").unwrap(), Some(Priority::High));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, Value>,
}

impl Arguments {
    /// Wraps `values`, rejecting any name not listed in `accepted`.
    pub fn new(values: HashMap<String, Value>, accepted: &[&str]) -> Result<Self, Error> {
        let mut unknown: Vec<&String> = values
            .keys()
            .filter(|name| !accepted.contains(&name.as_str()))
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(Error::invalid(name, "unknown parameter"));
        }
        Ok(Arguments { values })
    }

    /// Looks up `name`, treating an explicit JSON `null` as absent.
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// A required, non-empty string.
    pub fn required_text(&self, name: &str) -> Result<String, Error> {
        self.text(name)?.ok_or_else(|| Error::missing(name))
    }

    /// An optional string. Empty strings count as absent.
    ///
    /// Numbers are accepted and rendered in their JSON form, so `"due": 1` works
    /// like `"due": "1"`.
    pub fn text(&self, name: &str) -> Result<Option<String>, Error> {
        let text = match self.get(name) {
            None => return Ok(None),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(Error::invalid(
                    name,
                    format!("expected a string, got {}", json_type(other)),
                ));
            }
        };
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    /// A boolean flag, `default` when absent.
    ///
    /// Also accepts the strings `"true"`/`"false"` and `"1"`/`"0"` that some
    /// clients send for booleans.
    pub fn flag(&self, name: &str, default: bool) -> Result<bool, Error> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(Error::invalid(
                    name,
                    format!("expected a boolean, got '{other}'"),
                )),
            },
            Some(other) => Err(Error::invalid(
                name,
                format!("expected a boolean, got {}", json_type(other)),
            )),
        }
    }

    /// A list of non-empty strings.
    ///
    /// Accepts a JSON array of strings, or a single string that is split on
    /// `separator` (blank pieces are dropped, the way 2Do ignores blank lines).
    /// An empty array element is an error; absent and empty inputs yield an
    /// empty list.
    pub fn list(&self, name: &str, separator: &str) -> Result<Vec<String>, Error> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s
                .split(separator)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
                    Value::String(_) => Err(Error::invalid(
                        name,
                        format!("entry {index} is empty"),
                    )),
                    other => Err(Error::invalid(
                        name,
                        format!("entry {index} should be a string, got {}", json_type(other)),
                    )),
                })
                .collect(),
            Some(other) => Err(Error::invalid(
                name,
                format!("expected a string or an array of strings, got {}", json_type(other)),
            )),
        }
    }

    /// An enumerated code such as a priority, `None` when absent.
    pub fn choice<C: Choice>(&self, name: &str) -> Result<Option<C>, Error> {
        let raw = match self.get(name) {
            None => return Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(Error::invalid(
                    name,
                    format!("expected one of {}, got {}", C::DOMAIN, json_type(other)),
                ));
            }
        };
        C::parse(&raw)
            .map(Some)
            .ok_or_else(|| Error::invalid(name, format!("expected one of {}, got '{raw}'", C::DOMAIN)))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A parameter with a small closed set of wire codes.
pub trait Choice: Sized + Copy {
    /// Human-readable list of accepted values, used in error messages.
    const DOMAIN: &'static str;
    /// Parses a wire code or a case-insensitive name.
    fn parse(raw: &str) -> Option<Self>;
    /// The code 2Do expects in the URL.
    fn code(self) -> &'static str;
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Choice for Priority {
    const DOMAIN: &'static str = "0 (none), 1 (low), 2 (medium), 3 (high)";

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "0" | "none" => Some(Priority::None),
            "1" | "low" => Some(Priority::Low),
            "2" | "medium" => Some(Priority::Medium),
            "3" | "high" => Some(Priority::High),
            _ => None,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Priority::None => "0",
            Priority::Low => "1",
            Priority::Medium => "2",
            Priority::High => "3",
        }
    }
}

/// What kind of item `add` creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskType {
    #[default]
    Task,
    Project,
    Checklist,
}

impl Choice for TaskType {
    const DOMAIN: &'static str = "0 (task), 1 (project), 2 (checklist)";

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "0" | "task" => Some(TaskType::Task),
            "1" | "project" => Some(TaskType::Project),
            "2" | "checklist" => Some(TaskType::Checklist),
            _ => None,
        }
    }

    fn code(self) -> &'static str {
        match self {
            TaskType::Task => "0",
            TaskType::Project => "1",
            TaskType::Checklist => "2",
        }
    }
}

/// Recurrence for repeating tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatInterval {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl Choice for RepeatInterval {
    const DOMAIN: &'static str = "1 (daily), 2 (weekly), 3 (bi-weekly), 4 (monthly)";

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "daily" => Some(RepeatInterval::Daily),
            "2" | "weekly" => Some(RepeatInterval::Weekly),
            "3" | "biweekly" | "bi-weekly" => Some(RepeatInterval::BiWeekly),
            "4" | "monthly" => Some(RepeatInterval::Monthly),
            _ => None,
        }
    }

    fn code(self) -> &'static str {
        match self {
            RepeatInterval::Daily => "1",
            RepeatInterval::Weekly => "2",
            RepeatInterval::BiWeekly => "3",
            RepeatInterval::Monthly => "4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        let map: HashMap<String, Value> = serde_json::from_value(value).unwrap();
        let names: Vec<String> = map.keys().cloned().collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        Arguments::new(map, &names).unwrap()
    }

    #[test]
    fn unknown_parameters_are_rejected() {
        let mut map = HashMap::new();
        map.insert("task".to_string(), json!("x"));
        map.insert("colour".to_string(), json!("red"));
        let err = Arguments::new(map, &["task"]).unwrap_err();
        assert_eq!(err, Error::invalid("colour", "unknown parameter"));
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        let a = args(json!({"task": "  Call mom ", "blank": "   ", "none": null}));
        assert_eq!(a.required_text("task").unwrap(), "Call mom");
        assert_eq!(a.required_text("blank").unwrap_err(), Error::missing("blank"));
        assert_eq!(a.required_text("none").unwrap_err(), Error::missing("none"));
        assert_eq!(a.required_text("absent").unwrap_err(), Error::missing("absent"));
    }

    #[test]
    fn text_accepts_numbers_but_not_objects() {
        let a = args(json!({"due": 1, "note": {"a": 1}}));
        assert_eq!(a.text("due").unwrap().as_deref(), Some("1"));
        assert_eq!(a.text("note").unwrap_err().kind(), "InvalidParameterValue");
    }

    #[test]
    fn flags() {
        let a = args(json!({"a": true, "b": "false", "c": "1", "d": 7, "e": "maybe"}));
        assert!(a.flag("a", false).unwrap());
        assert!(!a.flag("b", true).unwrap());
        assert!(a.flag("c", false).unwrap());
        assert!(a.flag("missing", true).unwrap());
        assert!(a.flag("d", false).is_err());
        assert!(a.flag("e", false).is_err());
    }

    #[test]
    fn lists_from_arrays_and_strings() {
        let a = args(json!({
            "tags": ["work", " urgent "],
            "csv": "work, urgent,,",
            "lines": "Milk\n\nBread\n",
            "bad": ["ok", ""],
            "wrong": ["ok", 3],
        }));
        assert_eq!(a.list("tags", ",").unwrap(), vec!["work", "urgent"]);
        assert_eq!(a.list("csv", ",").unwrap(), vec!["work", "urgent"]);
        assert_eq!(a.list("lines", "\n").unwrap(), vec!["Milk", "Bread"]);
        assert!(a.list("absent", ",").unwrap().is_empty());
        assert_eq!(a.list("bad", ",").unwrap_err().kind(), "InvalidParameterValue");
        assert_eq!(a.list("wrong", ",").unwrap_err().kind(), "InvalidParameterValue");
    }

    #[test]
    fn priority_domain() {
        let a = args(json!({"p1": "3", "p2": 0, "p3": "High", "bad": "9", "neg": -1, "float": 1.5}));
        assert_eq!(a.choice::<Priority>("p1").unwrap(), Some(Priority::High));
        assert_eq!(a.choice::<Priority>("p2").unwrap(), Some(Priority::None));
        assert_eq!(a.choice::<Priority>("p3").unwrap(), Some(Priority::High));
        assert_eq!(a.choice::<Priority>("absent").unwrap(), None);
        for name in ["bad", "neg", "float"] {
            let err = a.choice::<Priority>(name).unwrap_err();
            assert_eq!(err.kind(), "InvalidParameterValue", "{name}");
        }
    }

    #[test]
    fn task_type_and_repeat_codes() {
        let a = args(json!({"type": "checklist", "repeat": 3, "bad_repeat": "5"}));
        assert_eq!(a.choice::<TaskType>("type").unwrap().map(TaskType::code), Some("2"));
        assert_eq!(
            a.choice::<RepeatInterval>("repeat").unwrap(),
            Some(RepeatInterval::BiWeekly)
        );
        assert!(a.choice::<RepeatInterval>("bad_repeat").is_err());
    }
}
