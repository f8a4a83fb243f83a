//! Comparing an export against the source it was imported from.
//!
//! Import and serialization are allowed to drop fields that only restate a
//! tracker default (`false`, `null`, empty strings and lists) and the
//! `location_id` side channel. Anything else the source says must come back
//! out unchanged: a misspelled key the importer does not know, or a
//! fractional coordinate that gets truncated, is reported as [`Drift`].

use std::fmt;

use serde_json::{Number, Value};
use tracing::debug;

use crate::area::Node;
use crate::error::LocationsError;
use crate::import::strip_comment_lines;

/// Keys the serializer may add although the source does not spell them out.
const DERIVED_KEYS: &[&str] = &["item_count"];

/// Keys that never reach the output, whatever their value.
const SIDE_CHANNEL_KEYS: &[&str] = &["location_id"];

/// How an exported value differs from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    /// The value was written, but not as authored.
    Changed,
    /// A meaningful source field is missing from the output.
    Dropped,
}

/// One difference between a source document and its export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    /// Location of the value, such as `[0].children[1].map_locations[0].x`.
    pub path: String,
    /// What happened to it.
    pub kind: DriftKind,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DriftKind::Changed => write!(f, "{}: value changed", self.path),
            DriftKind::Dropped => write!(f, "{}: field dropped", self.path),
        }
    }
}

/// Compare the export of `nodes` against the `source` text they were
/// imported from.
///
/// Returns every place where the export loses or alters what the source
/// says, in document order. An empty list means the export is faithful.
///
/// # Errors
///
/// Returns [`LocationsError::Syntax`] if `source` is not JSON after comment
/// stripping, or [`LocationsError::Serialize`] if `nodes` cannot be encoded.
pub fn source_drift(source: &str, nodes: &[Node]) -> Result<Vec<Drift>, LocationsError> {
    let authored: Value = serde_json::from_str(&strip_comment_lines(source))
        .map_err(LocationsError::from_decode)?;
    let exported = serde_json::to_value(nodes).map_err(LocationsError::Serialize)?;

    let mut drift = Vec::new();
    compare(&authored, &exported, "", &mut drift);
    debug!(roots = nodes.len(), drift = drift.len(), "compared export with source");
    Ok(drift)
}

fn compare(authored: &Value, exported: &Value, path: &str, drift: &mut Vec<Drift>) {
    match (authored, exported) {
        (Value::Object(authored), Value::Object(exported)) => {
            for (key, value) in authored {
                let child = format!("{path}.{key}");
                match exported.get(key) {
                    Some(out) => compare(value, out, &child, drift),
                    None if omitted_by_default(key, value) => {}
                    None => drift.push(Drift {
                        path: child,
                        kind: DriftKind::Dropped,
                    }),
                }
            }
            let unexpected = exported
                .keys()
                .filter(|key| !authored.contains_key(*key) && !DERIVED_KEYS.contains(&key.as_str()));
            for key in unexpected {
                drift.push(Drift {
                    path: format!("{path}.{key}"),
                    kind: DriftKind::Changed,
                });
            }
        }
        (Value::Array(authored), Value::Array(exported)) if authored.len() == exported.len() => {
            for (index, (a, e)) in authored.iter().zip(exported).enumerate() {
                compare(a, e, &format!("{path}[{index}]"), drift);
            }
        }
        (Value::Number(a), Value::Number(e)) if numbers_match(a, e) => {}
        (a, e) if a == e => {}
        _ => drift.push(Drift {
            path: path.to_owned(),
            kind: DriftKind::Changed,
        }),
    }
}

/// Whether leaving `key` out of the output loses nothing the tracker reads.
fn omitted_by_default(key: &str, value: &Value) -> bool {
    if SIDE_CHANNEL_KEYS.contains(&key) {
        return true;
    }
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        // A single hosted item leaves its count implicit.
        Value::Number(count) => key == "item_count" && count.as_u64() == Some(1),
    }
}

/// Integers compare exactly; anything else compares as `f64`, so `16.0`
/// matches `16`.
fn numbers_match(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a.total_cmp(&b).is_eq(),
        _ => false,
    }
}
