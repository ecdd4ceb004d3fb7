//! # Generation Module
//!
//! Loot selection: candidate filtering, validity pruning and weighted sampling
//! under a point budget, with optional material substitution.
//!
//! Randomness is always injected by the caller. Pass a seeded generator from
//! [`utils::create_rng`] to get reproducible draws.

pub mod materials;
pub mod selector;

pub use materials::*;
pub use selector::*;

use crate::LootResult;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters for a single loot roll.
///
/// Empty tag lists mean "no constraint". Rarity bounds are inclusive; a
/// minimum above the maximum simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Point budget the output may not exceed
    pub points: u32,
    /// Items must carry at least one of these tags
    pub include_tags: Vec<String>,
    /// Items must carry none of these tags
    pub exclude_tags: Vec<String>,
    /// Lowest rarity accepted
    pub min_rarity: Option<i32>,
    /// Highest rarity accepted
    pub max_rarity: Option<i32>,
}

impl SelectionConfig {
    /// Creates an unfiltered configuration with the given budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use lootgen::SelectionConfig;
    ///
    /// let config = SelectionConfig::new(30)
    ///     .with_exclude_tags(vec!["magic".into()])
    ///     .with_rarity_range(Some(2), Some(3));
    /// assert_eq!(config.points, 30);
    /// assert_eq!(config.min_rarity, Some(2));
    /// ```
    pub fn new(points: u32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn with_include_tags(mut self, tags: Vec<String>) -> Self {
        self.include_tags = tags;
        self
    }

    pub fn with_exclude_tags(mut self, tags: Vec<String>) -> Self {
        self.exclude_tags = tags;
        self
    }

    pub fn with_rarity_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_rarity = min;
        self.max_rarity = max;
        self
    }

    /// Tag and rarity filter for a single item, before validity pruning.
    pub fn matches(&self, item: &crate::LootItem) -> bool {
        (self.include_tags.is_empty() || item.has_any_tag(&self.include_tags))
            && (self.exclude_tags.is_empty() || !item.has_any_tag(&self.exclude_tags))
            && self.min_rarity.map_or(true, |min| item.rarity >= min)
            && self.max_rarity.map_or(true, |max| item.rarity <= max)
    }
}

/// Trait for loot generators.
///
/// Generators draw from an injected random source so callers control
/// reproducibility.
pub trait Generator<T> {
    /// Generates content for `config` using `rng`.
    fn generate<R: Rng + ?Sized>(&self, config: &SelectionConfig, rng: &mut R) -> LootResult<T>;

    /// Validates that generated content satisfies `config`.
    fn validate(&self, content: &T, config: &SelectionConfig) -> LootResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Creates a generator seeded from system entropy.
    pub fn entropy_rng() -> StdRng {
        StdRng::from_entropy()
    }
}
