//! # Catalog Module
//!
//! Item and material records plus the two ways they enter the system:
//! JSON catalog files and the pipe-delimited text format used for bulk entry.
//!
//! Records are plain data. They may carry non-positive rarities or point
//! values straight from user files; the selection pipeline decides what is
//! usable, not the loader.

pub mod loader;
pub mod text;

pub use loader::*;
pub use text::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single entry in the loot catalog.
///
/// Lower `rarity` numbers are drawn more often: the selection weight of an
/// item is `1 / rarity`.
///
/// # Examples
///
/// ```
/// use lootgen::LootItem;
///
/// let sword = LootItem::new("Sword", 1, "Sharp blade", 10, vec!["weapon".into(), "melee".into()]);
/// assert!(sword.has_any_tag(&["melee".to_string()]));
/// assert!(!sword.has_any_tag(&["magic".to_string()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LootItem {
    /// Display name, may contain material placeholders such as `[Metal]`
    pub name: String,
    /// Inverse selection weight
    pub rarity: i32,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Cost charged against the point budget
    pub point_value: i32,
    /// Labels used by include/exclude filters, in display order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LootItem {
    /// Creates a new item record.
    pub fn new(
        name: impl Into<String>,
        rarity: i32,
        description: impl Into<String>,
        point_value: i32,
        tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rarity,
            description: description.into(),
            point_value,
            tags,
        }
    }

    /// Returns true when any of `tags` is carried by this item.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// Selection weight used by the sampler.
    pub fn weight(&self) -> f64 {
        1.0 / f64::from(self.rarity)
    }
}

impl fmt::Display for LootItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Rarity: {}) - {}",
            self.name, self.rarity, self.description
        )
    }
}

/// A material that can be substituted into an item name placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Text inserted into the item name
    pub name: String,
    /// Multiplier applied to the item's point value
    pub modifier: f64,
    /// Category matched against placeholder types, e.g. `Metal`
    #[serde(rename = "type")]
    pub kind: String,
}

impl Material {
    /// Creates a new material.
    pub fn new(name: impl Into<String>, modifier: f64, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier,
            kind: kind.into(),
        }
    }

    /// Case-insensitive category match.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

/// Sorted distinct tags across a set of items.
pub fn distinct_tags(items: &[LootItem]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
