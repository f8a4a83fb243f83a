//! Error types for the `poptracker-locations` crate.
//!
//! All fallible operations in this crate return [`LocationsError`]. Nothing
//! here is logged or recovered from; every failure ends the current
//! operation and is handed back to the caller as-is.

use std::path::PathBuf;

/// Errors that can occur while importing or serializing a location tree.
#[derive(Debug, thiserror::Error)]
pub enum LocationsError {
    /// The location source file could not be read.
    #[error("failed to read location source {}: {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The text left after comment stripping is not valid JSON.
    #[error("malformed location JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The JSON is well-formed but does not have the tracker's shape
    /// (for example a descriptor without `name`).
    #[error("location JSON does not match the tracker schema: {0}")]
    Schema(#[source] serde_json::Error),

    /// Encoding the projected tree failed.
    #[error("failed to serialize location tree: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl LocationsError {
    /// Classify a `serde_json` decoding failure as a syntax or schema error.
    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => Self::Schema(err),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof
            | serde_json::error::Category::Io => Self::Syntax(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_are_classified() {
        let err = serde_json::from_str::<serde_json::Value>("[{").err();
        let classified = err.map(LocationsError::from_decode);
        assert!(matches!(classified, Some(LocationsError::Syntax(_))));
    }

    #[test]
    fn data_errors_are_classified_as_schema() {
        let err = serde_json::from_str::<Vec<u32>>(r#"["x"]"#).err();
        let classified = err.map(LocationsError::from_decode);
        assert!(matches!(classified, Some(LocationsError::Schema(_))));
    }
}
