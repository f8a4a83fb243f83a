//! Areas and the [`Node`] variant that makes up the location tree.
//!
//! An [`Area`] groups other areas and locations under a common name and
//! can push shared settings (access rules, chest images, colours) down to
//! them in the tracker. Areas nest to any depth; the resulting forest is a
//! `Vec<Node>`.

use serde_json::{Map as JsonMap, Value};

use crate::location::Location;
use crate::render::{Render, insert_rules, insert_str, render_list};
use crate::rule::Rule;

/// A named grouping node owning child areas and locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// Full display name.
    pub name: String,
    /// Abbreviated name.
    pub short_name: Option<String>,
    /// Rules that must hold for the area to be accessible.
    pub access_rules: Vec<Rule>,
    /// Rules that must hold for the area to be shown.
    pub visibility_rules: Vec<Rule>,
    /// Image for unopened chests in the area.
    pub chest_unopened_img: Option<String>,
    /// Image for opened chests in the area.
    pub chest_opened_img: Option<String>,
    /// Background colour behind the opened-chest counter.
    pub overlay_background: Option<String>,
    /// Tooltip colour.
    pub color: Option<String>,
    /// Name of the node this area should be moved under in the tracker.
    ///
    /// Only the tracker acts on this; the tree here is not rearranged.
    pub parent: Option<String>,
    /// Child areas and locations, in output order.
    pub children: Vec<Node>,
}

impl Area {
    /// Create an area with no children and every optional field unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            access_rules: Vec::new(),
            visibility_rules: Vec::new(),
            chest_unopened_img: None,
            chest_opened_img: None,
            overlay_background: None,
            color: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the abbreviated name.
    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Append an access rule.
    #[must_use]
    pub fn with_access_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.access_rules.push(rule.into());
        self
    }

    /// Append a visibility rule.
    #[must_use]
    pub fn with_visibility_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.visibility_rules.push(rule.into());
        self
    }

    /// Set the unopened and opened chest images.
    #[must_use]
    pub fn with_chest_images(mut self, unopened: impl Into<String>, opened: impl Into<String>) -> Self {
        self.chest_unopened_img = Some(unopened.into());
        self.chest_opened_img = Some(opened.into());
        self
    }

    /// Set the counter background colour.
    #[must_use]
    pub fn with_overlay_background(mut self, background: impl Into<String>) -> Self {
        self.overlay_background = Some(background.into());
        self
    }

    /// Set the tooltip colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Ask the tracker to move this area under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Append a child area or location.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a child area or location in place.
    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }
}

impl Render for Area {
    fn render(&self) -> JsonMap<String, Value> {
        let mut obj = JsonMap::new();
        obj.insert("name".to_owned(), Value::from(self.name.as_str()));
        insert_str(&mut obj, "short_name", self.short_name.as_deref());
        insert_rules(&mut obj, "access_rules", &self.access_rules);
        insert_rules(&mut obj, "visibility_rules", &self.visibility_rules);
        insert_str(&mut obj, "chest_unopened_img", self.chest_unopened_img.as_deref());
        insert_str(&mut obj, "chest_opened_img", self.chest_opened_img.as_deref());
        insert_str(&mut obj, "overlay_background", self.overlay_background.as_deref());
        insert_str(&mut obj, "color", self.color.as_deref());
        insert_str(&mut obj, "parent", self.parent.as_deref());
        obj.insert("children".to_owned(), render_list(&self.children));
        obj
    }
}

/// One node of the location tree: either an [`Area`] or a [`Location`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A grouping node.
    Area(Area),
    /// A checkable leaf.
    Location(Location),
}

impl Node {
    /// The node's display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Area(area) => &area.name,
            Self::Location(location) => &location.name,
        }
    }

    /// The node's access rules.
    pub fn access_rules(&self) -> &[Rule] {
        match self {
            Self::Area(area) => &area.access_rules,
            Self::Location(location) => &location.access_rules,
        }
    }

    /// Replace the node's access rules.
    pub fn set_access_rules(&mut self, rules: Vec<Rule>) {
        match self {
            Self::Area(area) => area.access_rules = rules,
            Self::Location(location) => location.access_rules = rules,
        }
    }

    /// Borrow the area, if this node is one.
    pub const fn as_area(&self) -> Option<&Area> {
        match self {
            Self::Area(area) => Some(area),
            Self::Location(_) => None,
        }
    }

    /// Borrow the location, if this node is one.
    pub const fn as_location(&self) -> Option<&Location> {
        match self {
            Self::Area(_) => None,
            Self::Location(location) => Some(location),
        }
    }

    /// Number of locations in this subtree.
    pub fn location_count(&self) -> usize {
        match self {
            Self::Area(area) => area
                .children
                .iter()
                .map(Self::location_count)
                .fold(0, usize::saturating_add),
            Self::Location(_) => 1,
        }
    }

    /// Number of sections in this subtree.
    pub fn section_count(&self) -> usize {
        match self {
            Self::Area(area) => area
                .children
                .iter()
                .map(Self::section_count)
                .fold(0, usize::saturating_add),
            Self::Location(location) => location.sections.len(),
        }
    }
}

impl From<Area> for Node {
    fn from(area: Area) -> Self {
        Self::Area(area)
    }
}

impl From<Location> for Node {
    fn from(location: Location) -> Self {
        Self::Location(location)
    }
}

impl Render for Node {
    fn render(&self) -> JsonMap<String, Value> {
        match self {
            Self::Area(area) => area.render(),
            Self::Location(location) => location.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::map::Map;
    use crate::section::Section;

    #[test]
    fn empty_area_still_renders_children() {
        let area = Area::new("Overworld");
        assert_eq!(
            Value::Object(area.render()),
            json!({"name": "Overworld", "children": []})
        );
    }

    #[test]
    fn renders_optional_fields_in_tracker_order() {
        let area = Area::new("Dungeon")
            .with_short_name("DG")
            .with_access_rule("$has|key")
            .with_visibility_rule("$setting|dungeons")
            .with_chest_images("closed.png", "open.png")
            .with_overlay_background("#000000")
            .with_color("#ff0000")
            .with_parent("Overworld");
        let keys: Vec<String> = area.render().keys().cloned().collect();
        assert_eq!(
            keys,
            [
                "name",
                "short_name",
                "access_rules",
                "visibility_rules",
                "chest_unopened_img",
                "chest_opened_img",
                "overlay_background",
                "color",
                "parent",
                "children"
            ]
        );
    }

    #[test]
    fn nested_children_render_recursively() {
        let map = Map::new("overworld");
        let area = Area::new("Kingdom")
            .with_child(Area::new("Town").with_child(map.simple_location("Well", 1.0, 2.0, None)))
            .with_child(Location::new("Gate"));

        assert_eq!(
            Value::Object(area.render()),
            json!({
                "name": "Kingdom",
                "children": [
                    {
                        "name": "Town",
                        "children": [{
                            "name": "Well",
                            "sections": [{"name": "Well", "item_count": 1}],
                            "map_locations": [{"map": "overworld", "x": 1, "y": 2}]
                        }]
                    },
                    {"name": "Gate"}
                ]
            })
        );
    }

    #[test]
    fn counts_locations_and_sections() {
        let tree = Node::from(
            Area::new("Kingdom")
                .with_child(
                    Area::new("Town")
                        .with_child(Location::new("Well").with_section(Section::new("Bucket"))),
                )
                .with_child(
                    Location::new("Gate")
                        .with_section(Section::new("Left"))
                        .with_section(Section::new("Right")),
                ),
        );
        assert_eq!(tree.location_count(), 2);
        assert_eq!(tree.section_count(), 3);
    }

    #[test]
    fn set_access_rules_replaces_for_both_variants() {
        let mut area = Node::from(Area::new("A").with_access_rule("old"));
        area.set_access_rules(vec![Rule::from("new")]);
        assert_eq!(area.access_rules(), [Rule::from("new")]);

        let mut location = Node::from(Location::new("L"));
        location.set_access_rules(vec![Rule::from("new")]);
        assert_eq!(location.access_rules(), [Rule::from("new")]);
        assert!(location.as_location().is_some());
        assert!(location.as_area().is_none());
    }
}
