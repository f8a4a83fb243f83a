//! Location tree model, JSON projection, and importer for `PopTracker` packs.
//!
//! This crate models the trackable places of a game map as a forest of
//! [`Area`] and [`Location`] nodes, projects that forest onto the exact JSON
//! shape the tracker expects, and parses such JSON back into the same tree.
//!
//! # Modules
//!
//! - [`area`] -- [`Area`] grouping nodes and the [`Node`] variant used for
//!   children and forest roots.
//! - [`error`] -- Error types for import and serialization.
//! - [`import`] -- Comment-tolerant importer that rebuilds a forest from JSON.
//! - [`location`] -- [`Location`], a checkable place owning sections and pins.
//! - [`map`] -- [`Map`] coordinate spaces and [`MapLocation`] pins.
//! - [`render`] -- The [`Render`] projection and the JSON writers.
//! - [`rule`] -- Opaque access/visibility [`Rule`] fragments.
//! - [`section`] -- [`Section`], one checkable unit within a location.
//! - [`verify`] -- Reporting where an export differs from its source.
//!
//! # Example
//!
//! ```
//! use poptracker_locations::{Area, LocationIds, Map, Node, to_json_string};
//!
//! # fn main() -> Result<(), poptracker_locations::LocationsError> {
//! let overworld = Map::new("overworld");
//! let chest = overworld.simple_location("Chest", 10.0, 20.0, Some(LocationIds::Single(5)));
//! let cave = Area::new("Cave").with_child(chest);
//!
//! let json = to_json_string(&[Node::from(cave)])?;
//! assert!(json.starts_with(r#"[{"name":"Cave","children":[{"name":"Chest""#));
//! # Ok(())
//! # }
//! ```

pub mod area;
pub mod error;
pub mod import;
pub mod location;
pub mod map;
pub mod render;
pub mod rule;
pub mod section;
pub mod verify;

// Re-export primary types at crate root.
pub use area::{Area, Node};
pub use error::LocationsError;
pub use import::{
    COMMENT_MARKER, import_locations_from_file, import_locations_from_str, is_round_trip_stable,
    strip_comment_lines,
};
pub use location::Location;
pub use map::{Coordinate, Map, MapLocation};
pub use render::{Render, to_json_string, to_json_string_pretty};
pub use rule::Rule;
pub use section::{LocationIds, Section};
pub use verify::{Drift, DriftKind, source_drift};
