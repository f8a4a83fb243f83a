//! Rebuilding a location forest from tracker JSON.
//!
//! Authored location files are JSON with one extension: any line whose
//! trimmed text starts with `//` is a comment and is removed before parsing.
//! Comments at the end of a line are not recognised.
//!
//! A descriptor with a `children` key becomes an [`Area`]; every other
//! descriptor becomes a [`Location`]. Pins are bound to a fresh identity
//! [`Map`] carrying only the map name, because the JSON holds coordinates
//! that were already transformed. Map scale and offset therefore do not
//! survive a round trip.

use std::path::Path;

use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

use crate::area::{Area, Node};
use crate::error::LocationsError;
use crate::location::Location;
use crate::map::{Coordinate, Map, MapLocation};
use crate::render::to_json_string;
use crate::rule::Rule;
use crate::section::{LocationIds, Section};

/// Prefix marking a whole-line comment in a location source.
pub const COMMENT_MARKER: &str = "//";

/// An area or location as it appears in a source file.
#[derive(Debug, Deserialize)]
struct NodeDescriptor {
    name: String,
    children: Option<Vec<NodeDescriptor>>,
    access_rules: Option<Vec<Rule>>,
    short_name: Option<String>,
    visibility_rules: Option<Vec<Rule>>,
    chest_unopened_img: Option<String>,
    chest_opened_img: Option<String>,
    overlay_background: Option<String>,
    color: Option<String>,
    parent: Option<String>,
    sections: Option<Vec<SectionDescriptor>>,
    map_locations: Option<Vec<MapLocationDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct SectionDescriptor {
    name: String,
    clear_as_group: Option<bool>,
    chest_unopened_img: Option<String>,
    chest_opened_img: Option<String>,
    item_count: Option<u32>,
    hosted_item: Option<String>,
    access_rules: Option<Vec<Rule>>,
    visibility_rules: Option<Rule>,
    location_id: Option<LocationIds>,
}

#[derive(Debug, Deserialize)]
struct MapLocationDescriptor {
    map: String,
    x: Number,
    y: Number,
    size: Option<i64>,
    border_thickness: Option<i64>,
    restrict_visibility_rules: Option<Rule>,
    force_invisibility_rules: Option<Rule>,
}

/// Remove every line whose trimmed text starts with [`COMMENT_MARKER`].
///
/// Line endings of the kept lines are preserved.
pub fn strip_comment_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !is_comment_line(line))
        .collect()
}

fn is_comment_line(line: &str) -> bool {
    line.trim().starts_with(COMMENT_MARKER)
}

/// Import a forest from a location source file.
///
/// # Errors
///
/// Returns [`LocationsError::Io`] if the file cannot be read, and otherwise
/// the same errors as [`import_locations_from_str`].
pub fn import_locations_from_file(path: impl AsRef<Path>) -> Result<Vec<Node>, LocationsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LocationsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let nodes = import_locations_from_str(&text)?;
    debug!(path = %path.display(), roots = nodes.len(), "imported location file");
    Ok(nodes)
}

/// Import a forest from location source text.
///
/// The whole text must parse; a single bad descriptor fails the import.
///
/// # Errors
///
/// Returns [`LocationsError::Syntax`] if the text is not a JSON array after
/// comment stripping, or [`LocationsError::Schema`] if a descriptor lacks a
/// required field or has a field of the wrong shape.
pub fn import_locations_from_str(text: &str) -> Result<Vec<Node>, LocationsError> {
    let stripped = strip_comment_lines(text);
    let descriptors: Vec<NodeDescriptor> =
        serde_json::from_str(&stripped).map_err(LocationsError::from_decode)?;
    let nodes: Vec<Node> = descriptors.into_iter().map(build_node).collect();
    debug!(
        roots = nodes.len(),
        comment_lines = text.lines().filter(|line| is_comment_line(line)).count(),
        "imported location tree"
    );
    Ok(nodes)
}

/// Whether serializing, importing, and serializing again reproduces the
/// first serialization byte for byte.
///
/// This holds for any forest whose maps all use the identity transform.
///
/// # Errors
///
/// Returns any error raised while serializing or re-importing.
pub fn is_round_trip_stable(nodes: &[Node]) -> Result<bool, LocationsError> {
    let first = to_json_string(nodes)?;
    let reimported = import_locations_from_str(&first)?;
    let second = to_json_string(&reimported)?;
    Ok(first == second)
}

fn build_node(descriptor: NodeDescriptor) -> Node {
    let NodeDescriptor {
        name,
        children,
        access_rules,
        short_name,
        visibility_rules,
        chest_unopened_img,
        chest_opened_img,
        overlay_background,
        color,
        parent,
        sections,
        map_locations,
    } = descriptor;

    let mut node = if let Some(children) = children {
        let mut area = Area::new(name);
        area.short_name = short_name;
        area.visibility_rules = visibility_rules.unwrap_or_default();
        area.chest_unopened_img = chest_unopened_img;
        area.chest_opened_img = chest_opened_img;
        area.overlay_background = overlay_background;
        area.color = color;
        area.parent = parent;
        area.children = children.into_iter().map(build_node).collect();
        Node::Area(area)
    } else {
        let mut location = Location::new(name);
        location.chest_unopened_img = chest_unopened_img;
        location.chest_opened_img = chest_opened_img;
        location.sections = sections
            .unwrap_or_default()
            .into_iter()
            .map(build_section)
            .collect();
        location.map_locations = map_locations
            .unwrap_or_default()
            .into_iter()
            .map(build_map_location)
            .collect();
        Node::Location(location)
    };

    // A non-empty top-level rule list replaces whatever the node holds.
    if let Some(rules) = access_rules.filter(|rules| !rules.is_empty()) {
        node.set_access_rules(rules);
    }
    node
}

fn build_section(descriptor: SectionDescriptor) -> Section {
    let mut section = Section::new(descriptor.name);
    if let Some(ids) = descriptor.location_id {
        section = section.with_location_id(ids);
    }
    if let Some(count) = descriptor.item_count {
        section = section.with_item_count(count);
    }
    section.clear_as_group = descriptor.clear_as_group.unwrap_or(false);
    section.chest_unopened_img = descriptor.chest_unopened_img;
    section.chest_opened_img = descriptor.chest_opened_img;
    section.hosted_item = descriptor.hosted_item;
    section.access_rules = descriptor.access_rules.unwrap_or_default();
    section.visibility_rules = descriptor.visibility_rules;
    section
}

fn build_map_location(descriptor: MapLocationDescriptor) -> MapLocation {
    let mut pin = MapLocation::new(
        Map::new(descriptor.map),
        Coordinate::from(&descriptor.x),
        Coordinate::from(&descriptor.y),
    );
    pin.size = descriptor.size;
    pin.border_thickness = descriptor.border_thickness;
    pin.restrict_visibility_rules = descriptor.restrict_visibility_rules;
    pin.force_invisibility_rules = descriptor.force_invisibility_rules;
    pin
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn strips_whole_line_comments_only() {
        let text = "[\n  // a comment\n\t//indented\n  {\"name\": \"A // not a comment\"}\n]";
        assert_eq!(
            strip_comment_lines(text),
            "[\n  {\"name\": \"A // not a comment\"}\n]"
        );
    }

    #[test]
    fn keeps_text_without_comments() {
        let text = "[\r\n{\"name\": \"A\"}\r\n]\r\n";
        assert_eq!(strip_comment_lines(text), text);
    }

    #[test]
    fn descriptor_with_children_becomes_area() {
        let nodes = import_locations_from_str(
            r#"[{"name": "Cave", "children": [{"name": "Torch Room"}]}]"#,
        )
        .unwrap();
        let area = nodes.first().and_then(Node::as_area);
        assert_eq!(area.map(|a| a.name.as_str()), Some("Cave"));
        let child = area.and_then(|a| a.children.first());
        assert_eq!(child.and_then(Node::as_location).map(|l| l.name.as_str()), Some("Torch Room"));
    }

    #[test]
    fn empty_children_still_make_an_area() {
        let nodes =
            import_locations_from_str(r#"[{"name": "Empty", "children": []}]"#).unwrap();
        assert!(nodes.first().and_then(Node::as_area).is_some());
    }

    #[test]
    fn section_item_count_is_derived_from_location_ids() {
        let nodes = import_locations_from_str(
            r#"[{"name": "Vault", "sections": [
                {"name": "Pair", "location_id": [1, 2]},
                {"name": "Single", "location_id": 9},
                {"name": "Explicit", "location_id": [1, 2], "item_count": 7}
            ]}]"#,
        )
        .unwrap();
        let counts: Vec<u32> = nodes
            .first()
            .and_then(Node::as_location)
            .map(|l| l.sections.iter().map(Section::item_count).collect())
            .unwrap();
        assert_eq!(counts, [2, 1, 7]);
    }

    #[test]
    fn map_locations_use_identity_maps() {
        let nodes = import_locations_from_str(
            r#"[{"name": "Well", "map_locations": [{"map": "overworld", "x": 16, "y": 20, "size": 8}]}]"#,
        )
        .unwrap();
        let pin = nodes
            .first()
            .and_then(Node::as_location)
            .and_then(|l| l.map_locations.first());
        assert_eq!(pin.map(|p| p.map.clone()), Some(Map::new("overworld")));
        assert_eq!(pin.map(MapLocation::rendered_x), Some(16));
        assert_eq!(pin.and_then(|p| p.size), Some(8));
    }

    #[test]
    fn large_integer_coordinates_are_kept_exact() {
        let source = r#"[{"name":"L","map_locations":[{"map":"m","x":9007199254740993,"y":1}]}]"#;
        let nodes = import_locations_from_str(source).unwrap();
        assert_eq!(to_json_string(&nodes).unwrap(), source);
    }

    #[test]
    fn top_level_access_rules_apply_to_both_kinds() {
        let nodes = import_locations_from_str(
            r#"[
                {"name": "Area", "children": [], "access_rules": ["$has|key"]},
                {"name": "Loc", "access_rules": ["$has|lamp", "bow"]}
            ]"#,
        )
        .unwrap();
        let rules: Vec<usize> = nodes.iter().map(|n| n.access_rules().len()).collect();
        assert_eq!(rules, [1, 2]);
    }

    #[test]
    fn missing_name_is_a_schema_error() {
        let result = import_locations_from_str(r#"[{"children": []}]"#);
        assert!(matches!(result, Err(LocationsError::Schema(_))));
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        let result = import_locations_from_str(r#"[{"name": "A"},"#);
        assert!(matches!(result, Err(LocationsError::Syntax(_))));
    }

    #[test]
    fn trailing_comments_are_not_stripped() {
        let result = import_locations_from_str("[{\"name\": \"A\"} // trailing\n]");
        assert!(matches!(result, Err(LocationsError::Syntax(_))));
    }

    #[test]
    fn top_level_object_is_rejected() {
        let result = import_locations_from_str(r#"{"name": "A"}"#);
        assert!(matches!(result, Err(LocationsError::Schema(_))));
    }
}
