//! # Presets Module
//!
//! Named selection configurations persisted as a single JSON object.
//!
//! The store has no partial-update API: callers load the whole mapping,
//! change it and save it back. Concurrent writers are not coordinated.

use crate::catalog::loader::{read_optional, write_json};
use crate::generation::SelectionConfig;
use crate::LootResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Preset name to preset, ordered by name.
pub type PresetMap = BTreeMap<String, Preset>;

/// A saved selection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preset {
    /// Point budget
    pub loot_points: u32,
    #[serde(default)]
    pub include_tags: Vec<String>,
    #[serde(default)]
    pub exclude_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rarity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rarity: Option<i32>,
}

impl From<&Preset> for SelectionConfig {
    fn from(preset: &Preset) -> Self {
        SelectionConfig::new(preset.loot_points)
            .with_include_tags(preset.include_tags.clone())
            .with_exclude_tags(preset.exclude_tags.clone())
            .with_rarity_range(preset.min_rarity, preset.max_rarity)
    }
}

impl From<&SelectionConfig> for Preset {
    fn from(config: &SelectionConfig) -> Self {
        Self {
            loot_points: config.points,
            include_tags: config.include_tags.clone(),
            exclude_tags: config.exclude_tags.clone(),
            min_rarity: config.min_rarity,
            max_rarity: config.max_rarity,
        }
    }
}

/// File-backed preset mapping.
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every preset. A missing file is an empty store.
    pub fn load_presets(&self) -> LootResult<PresetMap> {
        let Some(text) = read_optional(&self.path)? else {
            return Ok(PresetMap::new());
        };
        let presets: PresetMap = serde_json::from_str(&text)?;
        log::debug!(
            "Loaded {} presets from {}",
            presets.len(),
            self.path.display()
        );
        Ok(presets)
    }

    /// Replaces the stored mapping with `presets`.
    pub fn save_presets(&self, presets: &PresetMap) -> LootResult<()> {
        write_json(&self.path, presets)?;
        log::debug!(
            "Saved {} presets to {}",
            presets.len(),
            self.path.display()
        );
        Ok(())
    }
}
