//! Locations: named checkable places.
//!
//! A [`Location`] exclusively owns its [`Section`]s (what can be checked)
//! and its [`MapLocation`]s (where it is drawn). It is always a leaf of the
//! location tree; grouping is done by [`Area`](crate::Area).

use serde_json::{Map as JsonMap, Value};

use crate::map::MapLocation;
use crate::render::{Render, insert_rules, insert_str, render_list};
use crate::rule::Rule;
use crate::section::Section;

/// A named checkable place with its sections and map pins.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Display name.
    pub name: String,
    /// Rules that must hold for the location to be accessible.
    pub access_rules: Vec<Rule>,
    /// Image for unopened chests at this location.
    pub chest_unopened_img: Option<String>,
    /// Image for opened chests at this location.
    pub chest_opened_img: Option<String>,
    /// Pins drawing this location on one or more maps.
    pub map_locations: Vec<MapLocation>,
    /// The checkable units at this location.
    pub sections: Vec<Section>,
}

impl Location {
    /// Create an empty location.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access_rules: Vec::new(),
            chest_unopened_img: None,
            chest_opened_img: None,
            map_locations: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Append an access rule.
    #[must_use]
    pub fn with_access_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.access_rules.push(rule.into());
        self
    }

    /// Set the unopened and opened chest images.
    #[must_use]
    pub fn with_chest_images(mut self, unopened: impl Into<String>, opened: impl Into<String>) -> Self {
        self.chest_unopened_img = Some(unopened.into());
        self.chest_opened_img = Some(opened.into());
        self
    }

    /// Append a map pin.
    #[must_use]
    pub fn with_map_location(mut self, pin: MapLocation) -> Self {
        self.map_locations.push(pin);
        self
    }

    /// Append a section.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Sum of the item counts of every section.
    pub fn total_item_count(&self) -> u64 {
        self.sections
            .iter()
            .map(|section| u64::from(section.item_count()))
            .fold(0, u64::saturating_add)
    }
}

impl Render for Location {
    fn render(&self) -> JsonMap<String, Value> {
        let mut obj = JsonMap::new();
        obj.insert("name".to_owned(), Value::from(self.name.as_str()));
        insert_rules(&mut obj, "access_rules", &self.access_rules);
        insert_str(&mut obj, "chest_unopened_img", self.chest_unopened_img.as_deref());
        insert_str(&mut obj, "chest_opened_img", self.chest_opened_img.as_deref());
        if !self.sections.is_empty() {
            obj.insert("sections".to_owned(), render_list(&self.sections));
        }
        if !self.map_locations.is_empty() {
            obj.insert("map_locations".to_owned(), render_list(&self.map_locations));
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::map::Map;
    use crate::section::LocationIds;

    #[test]
    fn bare_location_renders_name_only() {
        let location = Location::new("Shrine");
        assert_eq!(Value::Object(location.render()), json!({"name": "Shrine"}));
    }

    #[test]
    fn renders_sections_before_map_locations() {
        let location = Location::new("Torch Room")
            .with_access_rule("$has|torch")
            .with_chest_images("images/closed.png", "images/open.png")
            .with_map_location(Map::new("cave").location(4.0, 8.0))
            .with_section(Section::new("Chest"));

        assert_eq!(
            Value::Object(location.render()),
            json!({
                "name": "Torch Room",
                "access_rules": ["$has|torch"],
                "chest_unopened_img": "images/closed.png",
                "chest_opened_img": "images/open.png",
                "sections": [{"name": "Chest", "item_count": 1}],
                "map_locations": [{"map": "cave", "x": 4, "y": 8}]
            })
        );
        let keys: Vec<String> = location.render().keys().cloned().collect();
        assert_eq!(
            keys,
            [
                "name",
                "access_rules",
                "chest_unopened_img",
                "chest_opened_img",
                "sections",
                "map_locations"
            ]
        );
    }

    #[test]
    fn empty_strings_are_omitted() {
        let location = Location::new("Shrine").with_chest_images("", "");
        assert_eq!(Value::Object(location.render()), json!({"name": "Shrine"}));
    }

    #[test]
    fn total_item_count_sums_sections() {
        let location = Location::new("Vault")
            .with_section(Section::new("Left").with_location_id(LocationIds::Many(vec![1, 2])))
            .with_section(Section::new("Right"))
            .with_section(Section::new("Boss").with_hosted_item("boss"));
        assert_eq!(location.total_item_count(), 4);
    }
}
