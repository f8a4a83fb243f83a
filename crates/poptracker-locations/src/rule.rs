//! Opaque access and visibility rule fragments.
//!
//! The tracker evaluates rules such as `"$has|sword"` or nested arrays of
//! alternatives. This crate never interprets them: a [`Rule`] stores the
//! JSON fragment exactly as authored and emits it again unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single access or visibility rule, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule(pub Value);

impl Rule {
    /// Wrap any JSON-convertible value as a rule.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Whether this rule carries no value.
    ///
    /// Only `null`, the empty string, the empty array, and the empty object
    /// count as empty. `false` and `0` are kept because the tracker may
    /// give them meaning.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Borrow the underlying JSON fragment.
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for Rule {
    fn from(rule: &str) -> Self {
        Self(Value::String(rule.to_owned()))
    }
}

impl From<String> for Rule {
    fn from(rule: String) -> Self {
        Self(Value::String(rule))
    }
}

impl From<Value> for Rule {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Convert a slice of rules into a JSON array, cloning each fragment.
pub(crate) fn rules_to_value(rules: &[Rule]) -> Value {
    Value::Array(rules.iter().map(|rule| rule.0.clone()).collect())
}
