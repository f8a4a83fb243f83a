//! Sections: the individually checkable units inside a location.
//!
//! A section is one chest, one boss, or one group of items that the player
//! clears together. Besides the tracker-facing fields it can carry the
//! external location ID(s) it corresponds to. Those IDs never reach the
//! serialized output, but they determine the default item count.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

use crate::render::{Render, insert_rule, insert_rules, insert_str};
use crate::rule::Rule;

/// External check identifier(s) correlated with a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationIds {
    /// A single identifier.
    Single(i64),
    /// One identifier per item in the section.
    Many(Vec<i64>),
}

impl LocationIds {
    /// The item count implied by these identifiers.
    ///
    /// A list implies one item per entry; a single identifier implies one.
    pub fn implied_item_count(&self) -> u32 {
        match self {
            Self::Single(_) => 1,
            Self::Many(ids) => u32::try_from(ids.len()).unwrap_or(u32::MAX),
        }
    }
}

impl From<i64> for LocationIds {
    fn from(id: i64) -> Self {
        Self::Single(id)
    }
}

impl From<Vec<i64>> for LocationIds {
    fn from(ids: Vec<i64>) -> Self {
        Self::Many(ids)
    }
}

/// One checkable unit of a [`Location`](crate::Location).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Display name.
    pub name: String,
    /// Whether all items are cleared with a single click.
    pub clear_as_group: bool,
    /// Image for unopened chests in this section.
    pub chest_unopened_img: Option<String>,
    /// Image for opened chests in this section.
    pub chest_opened_img: Option<String>,
    /// Item code checked off when this section is cleared.
    pub hosted_item: Option<String>,
    /// Rules that must hold for the section to be accessible.
    pub access_rules: Vec<Rule>,
    /// Rule that must hold for the section to be shown.
    pub visibility_rules: Option<Rule>,
    /// External identifier(s) for this section. Never serialized, and
    /// reassigning it does not change [`Section::item_count`].
    pub location_id: Option<LocationIds>,
    /// Number of items, fixed while the section is built.
    item_count: u32,
    /// Whether `item_count` was given explicitly rather than derived.
    item_count_is_explicit: bool,
}

impl Section {
    /// Create a section with every optional field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clear_as_group: false,
            chest_unopened_img: None,
            chest_opened_img: None,
            hosted_item: None,
            access_rules: Vec::new(),
            visibility_rules: None,
            location_id: None,
            item_count: 1,
            item_count_is_explicit: false,
        }
    }

    /// Set an explicit item count, overriding the one implied by
    /// [`Section::location_id`].
    #[must_use]
    pub const fn with_item_count(mut self, count: u32) -> Self {
        self.item_count = count;
        self.item_count_is_explicit = true;
        self
    }

    /// Attach external identifier(s).
    ///
    /// Unless an explicit count was set, the item count becomes the one the
    /// identifiers imply.
    #[must_use]
    pub fn with_location_id(mut self, ids: impl Into<LocationIds>) -> Self {
        let ids = ids.into();
        if !self.item_count_is_explicit {
            self.item_count = ids.implied_item_count();
        }
        self.location_id = Some(ids);
        self
    }

    /// Mark the section as cleared as a group.
    #[must_use]
    pub const fn with_clear_as_group(mut self, clear_as_group: bool) -> Self {
        self.clear_as_group = clear_as_group;
        self
    }

    /// Set the item code checked off when the section is cleared.
    #[must_use]
    pub fn with_hosted_item(mut self, item: impl Into<String>) -> Self {
        self.hosted_item = Some(item.into());
        self
    }

    /// Set the unopened and opened chest images.
    #[must_use]
    pub fn with_chest_images(mut self, unopened: impl Into<String>, opened: impl Into<String>) -> Self {
        self.chest_unopened_img = Some(unopened.into());
        self.chest_opened_img = Some(opened.into());
        self
    }

    /// Append an access rule.
    #[must_use]
    pub fn with_access_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.access_rules.push(rule.into());
        self
    }

    /// Set the visibility rule.
    #[must_use]
    pub fn with_visibility_rules(mut self, rule: impl Into<Rule>) -> Self {
        self.visibility_rules = Some(rule.into());
        self
    }

    /// Number of items in this section.
    ///
    /// An explicit count wins. Otherwise the count is the length of the
    /// `location_id` list given to [`Section::with_location_id`], and `1` in
    /// every other case.
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Whether the section hosts an item (a non-empty `hosted_item`).
    pub fn has_hosted_item(&self) -> bool {
        self.hosted_item.as_deref().is_some_and(|item| !item.is_empty())
    }
}

impl Render for Section {
    fn render(&self) -> JsonMap<String, Value> {
        let mut obj = JsonMap::new();
        obj.insert("name".to_owned(), Value::from(self.name.as_str()));
        // A lone hosted item (a boss kill, say) leaves the count implicit.
        let item_count = self.item_count();
        if item_count != 1 || !self.has_hosted_item() {
            obj.insert("item_count".to_owned(), Value::from(item_count));
        }
        if self.clear_as_group {
            obj.insert("clear_as_group".to_owned(), Value::Bool(true));
        }
        insert_str(&mut obj, "chest_unopened_img", self.chest_unopened_img.as_deref());
        insert_str(&mut obj, "chest_opened_img", self.chest_opened_img.as_deref());
        insert_rules(&mut obj, "access_rules", &self.access_rules);
        insert_rule(&mut obj, "visibility_rules", self.visibility_rules.as_ref());
        insert_str(&mut obj, "hosted_item", self.hosted_item.as_deref());
        obj
    }
}
