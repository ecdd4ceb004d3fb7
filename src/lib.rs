//! # Lootgen
//!
//! Randomized loot generation under a point budget.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a small selection core and the data plumbing
//! that feeds it:
//!
//! - **Catalog**: item and material records, JSON loading/saving and the
//!   pipe-delimited text format used for bulk entry
//! - **Generation**: candidate filtering, validity pruning and the weighted
//!   sampling loop that spends the point budget
//! - **Presets**: named selection configurations persisted as a single mapping
//!
//! ## Example
//!
//! ```
//! use lootgen::{generate_loot, generation::utils::create_rng, LootItem, SelectionConfig};
//!
//! let items = vec![
//!     LootItem::new("Sword", 1, "A sword", 10, vec!["weapon".into()]),
//!     LootItem::new("Potion", 2, "Heals", 5, vec!["consumable".into()]),
//! ];
//! let config = SelectionConfig::new(20).with_include_tags(vec!["weapon".into()]);
//! let mut rng = create_rng(7);
//!
//! let loot = generate_loot(&items, &config, &mut rng).unwrap();
//! assert!(loot.iter().all(|item| item.name == "Sword"));
//! assert!(lootgen::total_points(&loot) <= 20);
//! ```

pub mod catalog;
pub mod generation;
pub mod presets;

pub use catalog::*;
pub use generation::*;
pub use presets::*;

/// Core error type for loot generation and its data files.
#[derive(thiserror::Error, Debug)]
pub enum LootError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Every filtered candidate was pruned for a non-positive field
    #[error("All filtered items have non-positive {field}: {}", .names.join(", "))]
    InvalidItemData {
        /// Field that failed validation
        field: &'static str,
        /// Names of the offending items
        names: Vec<String>,
    },

    /// Malformed text record
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Requested preset does not exist
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the lootgen codebase.
pub type LootResult<T> = Result<T, LootError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default locations and budgets.
pub mod config {
    use std::path::{Path, PathBuf};

    /// Directory holding the data files when none is given
    pub const DEFAULT_DATA_DIR: &str = "data";

    /// Item catalog file name
    pub const ITEMS_FILE: &str = "loot_items.json";

    /// Preset store file name
    pub const PRESETS_FILE: &str = "presets.json";

    /// Materials file name
    pub const MATERIALS_FILE: &str = "materials.json";

    /// Point budget used when neither a flag nor a preset supplies one
    pub const DEFAULT_LOOT_POINTS: u32 = 20;

    /// Resolves the data files under a single directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use lootgen::config::DataPaths;
    ///
    /// let paths = DataPaths::new("/srv/loot");
    /// assert!(paths.items().ends_with("loot_items.json"));
    /// ```
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DataPaths {
        root: PathBuf,
    }

    impl DataPaths {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        pub fn items(&self) -> PathBuf {
            self.root.join(ITEMS_FILE)
        }

        pub fn presets(&self) -> PathBuf {
            self.root.join(PRESETS_FILE)
        }

        pub fn materials(&self) -> PathBuf {
            self.root.join(MATERIALS_FILE)
        }
    }

    impl Default for DataPaths {
        fn default() -> Self {
            Self::new(DEFAULT_DATA_DIR)
        }
    }
}
