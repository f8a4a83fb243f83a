//! Map coordinate spaces and the pins placed on them.
//!
//! A [`Map`] names one of the tracker's map images and carries a linear
//! transform (scale, then offset) from authored coordinates to pixel
//! coordinates. A [`MapLocation`] is a single pin on such a map. Pins own a
//! copy of their map; maps are small and never mutated after construction.

use serde_json::{Map as JsonMap, Number, Value};

use crate::location::Location;
use crate::render::{Render, insert_rule};
use crate::rule::Rule;
use crate::section::{LocationIds, Section};

/// Largest magnitude at which every integral `f64` is exactly representable.
const EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// A raw coordinate as authored.
///
/// Integers are kept exact so that large pixel positions read from a pack
/// are written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    /// An integral coordinate.
    Int(i64),
    /// A fractional coordinate, or one outside the `i64` range.
    Float(f64),
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&Number> for Coordinate {
    fn from(number: &Number) -> Self {
        number
            .as_i64()
            .map_or_else(|| Self::Float(number.as_f64().unwrap_or_default()), Self::Int)
    }
}

/// A named coordinate space with a scale factor and an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Map name as referenced by the tracker's map definitions.
    pub name: String,
    /// Multiplier applied to raw coordinates.
    pub scale: f64,
    /// Added to the scaled, truncated coordinate.
    pub offset: i64,
}

impl Map {
    /// Create a map with the identity transform (scale 1, offset 0).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
            offset: 0,
        }
    }

    /// Create a map with an explicit scale and offset.
    pub fn with_transform(name: impl Into<String>, scale: f64, offset: i64) -> Self {
        Self {
            name: name.into(),
            scale,
            offset,
        }
    }

    /// Map a raw coordinate onto the tracker's pixel grid.
    ///
    /// The scaled value is truncated toward zero before the offset is added.
    /// Integer coordinates on a map with an integral scale stay in integer
    /// arithmetic. Values outside the `i64` range saturate.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::arithmetic_side_effects
    )]
    pub fn transform(&self, raw: impl Into<Coordinate>) -> i64 {
        let scaled = match (raw.into(), self.integer_scale()) {
            (Coordinate::Int(value), Some(scale)) => value.saturating_mul(scale),
            (Coordinate::Int(value), None) => (value as f64 * self.scale).trunc() as i64,
            (Coordinate::Float(value), _) => (value * self.scale).trunc() as i64,
        };
        scaled.saturating_add(self.offset)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer_scale(&self) -> Option<i64> {
        let whole = self.scale.trunc();
        (whole.total_cmp(&self.scale).is_eq() && whole.abs() <= EXACT_F64_INT)
            .then_some(whole as i64)
    }

    /// Create a pin on this map at raw coordinates `(x, y)`.
    ///
    /// No range validation is performed. Optional overrides are set with the
    /// `with_*` builders on [`MapLocation`].
    pub fn location(&self, x: impl Into<Coordinate>, y: impl Into<Coordinate>) -> MapLocation {
        MapLocation::new(self.clone(), x.into(), y.into())
    }

    /// Create a one-check, one-pin [`Location`].
    ///
    /// The location gets a single [`Section`] with the same name, carrying
    /// `location_id`, and a single pin at `(x, y)` on this map.
    pub fn simple_location(
        &self,
        name: &str,
        x: impl Into<Coordinate>,
        y: impl Into<Coordinate>,
        location_id: Option<LocationIds>,
    ) -> Location {
        let section = match location_id {
            Some(ids) => Section::new(name).with_location_id(ids),
            None => Section::new(name),
        };
        Location::new(name)
            .with_map_location(self.location(x, y))
            .with_section(section)
    }
}

/// A single pin bound to a [`Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapLocation {
    /// The map this pin is drawn on.
    pub map: Map,
    /// Raw x coordinate, before the map transform.
    pub x: Coordinate,
    /// Raw y coordinate, before the map transform.
    pub y: Coordinate,
    /// Pin size, overriding the map's default.
    pub size: Option<i64>,
    /// Border thickness, overriding the map's default.
    pub border_thickness: Option<i64>,
    /// The pin is only visible while this rule holds.
    pub restrict_visibility_rules: Option<Rule>,
    /// The pin is hidden while this rule holds.
    pub force_invisibility_rules: Option<Rule>,
}

impl MapLocation {
    /// Create a pin with no overrides.
    pub const fn new(map: Map, x: Coordinate, y: Coordinate) -> Self {
        Self {
            map,
            x,
            y,
            size: None,
            border_thickness: None,
            restrict_visibility_rules: None,
            force_invisibility_rules: None,
        }
    }

    /// Override the pin size.
    #[must_use]
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Override the border thickness.
    #[must_use]
    pub fn with_border_thickness(mut self, thickness: i64) -> Self {
        self.border_thickness = Some(thickness);
        self
    }

    /// Only show the pin while `rule` holds.
    #[must_use]
    pub fn with_restrict_visibility_rules(mut self, rule: impl Into<Rule>) -> Self {
        self.restrict_visibility_rules = Some(rule.into());
        self
    }

    /// Hide the pin while `rule` holds.
    #[must_use]
    pub fn with_force_invisibility_rules(mut self, rule: impl Into<Rule>) -> Self {
        self.force_invisibility_rules = Some(rule.into());
        self
    }

    /// The x coordinate as written to the tracker.
    pub fn rendered_x(&self) -> i64 {
        self.map.transform(self.x)
    }

    /// The y coordinate as written to the tracker.
    pub fn rendered_y(&self) -> i64 {
        self.map.transform(self.y)
    }
}

impl Render for MapLocation {
    fn render(&self) -> JsonMap<String, Value> {
        let mut obj = JsonMap::new();
        obj.insert("map".to_owned(), Value::from(self.map.name.as_str()));
        obj.insert("x".to_owned(), Value::from(self.rendered_x()));
        obj.insert("y".to_owned(), Value::from(self.rendered_y()));
        if let Some(size) = self.size {
            obj.insert("size".to_owned(), Value::from(size));
        }
        if let Some(thickness) = self.border_thickness {
            obj.insert("border_thickness".to_owned(), Value::from(thickness));
        }
        insert_rule(&mut obj, "restrict_visibility_rules", self.restrict_visibility_rules.as_ref());
        insert_rule(&mut obj, "force_invisibility_rules", self.force_invisibility_rules.as_ref());
        obj
    }
}
