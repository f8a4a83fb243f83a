//! Error types for the pack exporter binary.
//!
//! [`PackError`] is the top-level error type that wraps every failure mode
//! of a single command run.

use std::path::PathBuf;

/// Top-level error for the pack exporter.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Importing or serializing the location tree failed.
    #[error("locations error: {source}")]
    Locations {
        /// The underlying library error.
        #[from]
        source: poptracker_locations::LocationsError,
    },

    /// Reading a location source failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The source path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The export loses or alters something the source says.
    #[error("{} does not survive a round trip unchanged ({count} differences, first {first})", .path.display())]
    RoundTripMismatch {
        /// The source file that was checked.
        path: PathBuf,
        /// Number of differences found.
        count: usize,
        /// The first difference, as `path: what happened`.
        first: String,
    },

    /// Writing the output artifact failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
