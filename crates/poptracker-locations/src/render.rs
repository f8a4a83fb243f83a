//! Projection of the location tree onto the tracker's JSON schema.
//!
//! Every entity implements [`Render`], which builds the smallest JSON object
//! the tracker accepts: a field is written only when it carries a value, so
//! anything absent falls back to the tracker's own default. The entities'
//! [`Serialize`] impls delegate to [`Render`]; plain data such as [`Rule`]
//! fragments use derived serde impls instead.
//!
//! What counts as "no value" is decided per field type, never by a general
//! falsiness test: empty strings and empty rule lists are dropped, `None`
//! numbers are dropped, and explicit numbers (including `0`) are kept.

use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map as JsonMap, Value};

use crate::area::{Area, Node};
use crate::error::LocationsError;
use crate::location::Location;
use crate::map::MapLocation;
use crate::rule::{Rule, rules_to_value};
use crate::section::Section;

/// Conversion of an entity into the plain JSON object the tracker reads.
pub trait Render {
    /// Build the JSON object for this entity, omitting unset fields.
    fn render(&self) -> JsonMap<String, Value>;
}

/// Implements [`Serialize`] by serializing the [`Render`] output.
macro_rules! serialize_via_render {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.render().serialize(serializer)
                }
            }
        )+
    };
}

serialize_via_render!(Area, Location, MapLocation, Node, Section);

/// Insert `value` under `key` unless it is absent or empty.
pub(crate) fn insert_str(obj: &mut JsonMap<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        obj.insert(key.to_owned(), Value::from(value));
    }
}

/// Insert `rules` under `key` unless the list is empty.
pub(crate) fn insert_rules(obj: &mut JsonMap<String, Value>, key: &str, rules: &[Rule]) {
    if !rules.is_empty() {
        obj.insert(key.to_owned(), rules_to_value(rules));
    }
}

/// Insert a single rule under `key` unless it is absent or empty.
pub(crate) fn insert_rule(obj: &mut JsonMap<String, Value>, key: &str, rule: Option<&Rule>) {
    if let Some(rule) = rule.filter(|r| !r.is_empty()) {
        obj.insert(key.to_owned(), rule.as_value().clone());
    }
}

/// Render every item and collect the objects into a JSON array.
pub(crate) fn render_list<T: Render>(items: &[T]) -> Value {
    Value::Array(items.iter().map(|item| Value::Object(item.render())).collect())
}

/// Serialize a forest as compact JSON.
///
/// # Errors
///
/// Returns [`LocationsError::Serialize`] if encoding fails.
pub fn to_json_string(nodes: &[Node]) -> Result<String, LocationsError> {
    let text = serde_json::to_string(nodes).map_err(LocationsError::Serialize)?;
    tracing::debug!(roots = nodes.len(), bytes = text.len(), "serialized location tree");
    Ok(text)
}

/// Serialize a forest as pretty-printed JSON indented by `indent` spaces.
///
/// # Errors
///
/// Returns [`LocationsError::Serialize`] if encoding fails.
pub fn to_json_string_pretty(nodes: &[Node], indent: usize) -> Result<String, LocationsError> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    nodes
        .serialize(&mut serializer)
        .map_err(LocationsError::Serialize)?;
    let text = String::from_utf8(buf)
        .map_err(|e| LocationsError::Serialize(serde_json::Error::custom(e)))?;
    tracing::debug!(roots = nodes.len(), bytes = text.len(), "serialized location tree");
    Ok(text)
}
