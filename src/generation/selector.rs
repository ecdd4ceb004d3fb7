//! # Loot Selection
//!
//! The budgeted weighted sampler.
//!
//! Selection runs as a pipeline: tag/rarity filter, rarity pruning,
//! point-value pruning, then sampling with replacement weighted by
//! `1 / rarity`. The first draw that does not fit the remaining budget ends
//! the roll.

use crate::catalog::{LootItem, Material};
use crate::generation::{materials, Generator, SelectionConfig};
use crate::{LootError, LootResult};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Builds the candidate pool for `config`.
///
/// Items with a non-positive rarity are dropped first, then items with a
/// non-positive point value. If either pruning step removes every remaining
/// candidate the call fails with [`LootError::InvalidItemData`]; a filter
/// that simply matches nothing yields an empty pool.
pub fn filter_candidates<'a>(
    items: &'a [LootItem],
    config: &SelectionConfig,
) -> LootResult<Vec<&'a LootItem>> {
    let filtered: Vec<&LootItem> = items.iter().filter(|item| config.matches(item)).collect();

    let pool = prune(filtered, "rarity", |item| item.rarity > 0)?;
    let pool = prune(pool, "point value", |item| item.point_value > 0)?;

    log::debug!(
        "Candidate pool: {} of {} catalog items",
        pool.len(),
        items.len()
    );
    Ok(pool)
}

fn prune<'a>(
    pool: Vec<&'a LootItem>,
    field: &'static str,
    is_valid: impl Fn(&LootItem) -> bool,
) -> LootResult<Vec<&'a LootItem>> {
    let (valid, invalid): (Vec<&LootItem>, Vec<&LootItem>) =
        pool.into_iter().partition(|item| is_valid(*item));

    if invalid.is_empty() {
        return Ok(valid);
    }

    let names: Vec<String> = invalid.iter().map(|item| item.name.clone()).collect();
    if valid.is_empty() {
        return Err(LootError::InvalidItemData { field, names });
    }

    log::warn!(
        "Skipping items with non-positive {}: {}",
        field,
        names.join(", ")
    );
    Ok(valid)
}

/// Rolls loot from `items` under `config` using `rng`.
///
/// # Examples
///
/// ```
/// use lootgen::{generate_loot, generation::utils::create_rng, LootItem, SelectionConfig};
///
/// let items = vec![LootItem::new("Coin", 1, "", 3, Vec::new())];
/// let loot = generate_loot(&items, &SelectionConfig::new(10), &mut create_rng(1)).unwrap();
///
/// // 3 + 3 + 3 = 9; the fourth coin would overshoot the budget.
/// assert_eq!(loot.len(), 3);
/// ```
pub fn generate_loot<R: Rng + ?Sized>(
    items: &[LootItem],
    config: &SelectionConfig,
    rng: &mut R,
) -> LootResult<Vec<LootItem>> {
    LootSelector::new(items).generate(config, rng)
}

/// Sum of point values of a roll.
pub fn total_points(loot: &[LootItem]) -> i64 {
    loot.iter().map(|item| i64::from(item.point_value)).sum()
}

/// Catalog-backed loot generator with optional material substitution.
#[derive(Debug, Clone, Copy)]
pub struct LootSelector<'a> {
    items: &'a [LootItem],
    materials: Option<&'a [Material]>,
}

impl<'a> LootSelector<'a> {
    pub fn new(items: &'a [LootItem]) -> Self {
        Self {
            items,
            materials: None,
        }
    }

    /// Enables placeholder substitution from `materials` for every draw.
    pub fn with_materials(mut self, materials: &'a [Material]) -> Self {
        self.materials = Some(materials);
        self
    }

    fn realize<R: Rng + ?Sized>(&self, drawn: &LootItem, rng: &mut R) -> LootItem {
        match self.materials {
            Some(list) => materials::resolve_materials(drawn, list, rng),
            None => drawn.clone(),
        }
    }
}

impl Generator<Vec<LootItem>> for LootSelector<'_> {
    fn generate<R: Rng + ?Sized>(
        &self,
        config: &SelectionConfig,
        rng: &mut R,
    ) -> LootResult<Vec<LootItem>> {
        let pool = filter_candidates(self.items, config)?;
        let mut loot = Vec::new();

        if pool.is_empty() {
            return Ok(loot);
        }

        let weights: Vec<f64> = pool.iter().map(|item| item.weight()).collect();
        let dist = WeightedIndex::new(&weights)
            .map_err(|e| LootError::GenerationFailed(e.to_string()))?;

        let budget = i64::from(config.points);
        let mut total = 0i64;

        // Accepted draws always add a positive value, rejected ones stop the
        // loop, so this terminates without a draw counter.
        while total < budget {
            let item = self.realize(pool[dist.sample(rng)], rng);
            let value = i64::from(item.point_value);
            if total + value > budget {
                log::debug!(
                    "Draw '{}' ({} pts) exceeds remaining {} pts, stopping",
                    item.name,
                    value,
                    budget - total
                );
                break;
            }
            total += value;
            loot.push(item);
        }

        log::debug!("Rolled {} items for {}/{} pts", loot.len(), total, budget);
        Ok(loot)
    }

    fn validate(&self, content: &Vec<LootItem>, config: &SelectionConfig) -> LootResult<()> {
        let spent = total_points(content);
        if spent > i64::from(config.points) {
            return Err(LootError::GenerationFailed(format!(
                "loot spends {} pts over a budget of {}",
                spent, config.points
            )));
        }
        if let Some(item) = content.iter().find(|item| !config.matches(item)) {
            return Err(LootError::GenerationFailed(format!(
                "'{}' does not satisfy the selection filters",
                item.name
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LootSelector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn catalog() -> Vec<LootItem> {
        vec![
            LootItem::new("Sword", 1, "A sword", 10, tags(&["weapon", "melee"])),
            LootItem::new("Potion", 2, "Heals", 5, tags(&["consumable"])),
            LootItem::new("Staff", 3, "Glows", 8, tags(&["weapon", "magic"])),
            LootItem::new("Crown", 5, "Heavy", 20, tags(&["treasure"])),
        ]
    }

    #[test]
    fn test_filter_candidates_applies_all_filters() {
        let items = catalog();
        let config = SelectionConfig::new(50)
            .with_include_tags(tags(&["weapon", "treasure"]))
            .with_exclude_tags(tags(&["magic"]))
            .with_rarity_range(None, Some(4));

        let pool = filter_candidates(&items, &config).unwrap();
        let names: Vec<&str> = pool.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Sword"]);
    }

    #[test]
    fn test_filter_to_nothing_is_empty_not_error() {
        let items = catalog();
        let config = SelectionConfig::new(10).with_include_tags(tags(&["nonexistent"]));
        let mut rng = create_rng(0);

        assert!(filter_candidates(&items, &config).unwrap().is_empty());
        assert!(generate_loot(&items, &config, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_rarity_items_are_skipped() {
        let mut items = catalog();
        items.push(LootItem::new("Broken", 0, "", 5, Vec::new()));
        items.push(LootItem::new("Cursed", -2, "", 5, Vec::new()));

        let pool = filter_candidates(&items, &SelectionConfig::new(10)).unwrap();
        assert_eq!(pool.len(), 4);
        assert!(pool.iter().all(|item| item.rarity > 0));
    }

    #[test]
    fn test_all_invalid_rarity_is_an_error() {
        let items = vec![
            LootItem::new("Broken", 0, "", 5, Vec::new()),
            LootItem::new("Cursed", -2, "", 5, Vec::new()),
        ];
        match filter_candidates(&items, &SelectionConfig::new(10)) {
            Err(LootError::InvalidItemData { field, names }) => {
                assert_eq!(field, "rarity");
                assert_eq!(names, vec!["Broken", "Cursed"]);
            }
            other => panic!("expected InvalidItemData, got {:?}", other),
        }
    }

    #[test]
    fn test_all_invalid_point_values_is_an_error() {
        let items = vec![
            LootItem::new("Bad1", 1, "", 0, Vec::new()),
            LootItem::new("Bad2", 1, "", -5, Vec::new()),
        ];
        let mut rng = create_rng(0);

        let err = generate_loot(&items, &SelectionConfig::new(5), &mut rng).unwrap_err();
        assert!(matches!(err, LootError::InvalidItemData { field: "point value", .. }));
        assert!(err.to_string().contains("Bad1, Bad2"));
    }

    #[test]
    fn test_point_validation_runs_on_rarity_survivors() {
        // The zero-rarity item is gone before point values are checked, so
        // only the zero-value item is reported.
        let items = vec![
            LootItem::new("NoRarity", 0, "", 5, Vec::new()),
            LootItem::new("NoValue", 1, "", 0, Vec::new()),
        ];
        match filter_candidates(&items, &SelectionConfig::new(5)) {
            Err(LootError::InvalidItemData { field, names }) => {
                assert_eq!(field, "point value");
                assert_eq!(names, vec!["NoValue"]);
            }
            other => panic!("expected InvalidItemData, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_items_outside_filter_are_ignored() {
        let items = vec![
            LootItem::new("Bad", 0, "", 0, tags(&["junk"])),
            LootItem::new("Good", 1, "", 2, tags(&["weapon"])),
        ];
        let config = SelectionConfig::new(4).with_include_tags(tags(&["weapon"]));
        let pool = filter_candidates(&items, &config).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_single_candidate_fills_budget_exactly() {
        let items = vec![LootItem::new("Coin", 1, "", 5, Vec::new())];
        let mut rng = create_rng(99);

        let loot = generate_loot(&items, &SelectionConfig::new(20), &mut rng).unwrap();
        assert_eq!(loot.len(), 4);
        assert_eq!(total_points(&loot), 20);
    }

    #[test]
    fn test_first_rejection_stops_the_roll() {
        let items = vec![LootItem::new("Gem", 1, "", 4, Vec::new())];
        let mut rng = create_rng(3);

        let loot = generate_loot(&items, &SelectionConfig::new(10), &mut rng).unwrap();
        assert_eq!(loot.len(), 2);
        assert_eq!(total_points(&loot), 8);
    }

    #[test]
    fn test_zero_budget_returns_nothing() {
        let items = catalog();
        let mut rng = create_rng(1);
        assert!(generate_loot(&items, &SelectionConfig::new(0), &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_budget_smaller_than_every_item() {
        let items = catalog();
        let mut rng = create_rng(1);
        assert!(generate_loot(&items, &SelectionConfig::new(4), &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_same_seed_same_loot() {
        let items = catalog();
        let config = SelectionConfig::new(60);

        let first = generate_loot(&items, &config, &mut create_rng(2024)).unwrap();
        let second = generate_loot(&items, &config, &mut create_rng(2024)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_low_rarity_drawn_more_often() {
        let items = vec![
            LootItem::new("Common", 1, "", 1, Vec::new()),
            LootItem::new("Scarce", 10, "", 1, Vec::new()),
        ];
        let mut rng = create_rng(7);

        let loot = generate_loot(&items, &SelectionConfig::new(2000), &mut rng).unwrap();
        let common = loot.iter().filter(|item| item.name == "Common").count();
        let scarce = loot.len() - common;

        assert_eq!(loot.len(), 2000);
        assert!(common > scarce * 5, "common={} scarce={}", common, scarce);
    }

    #[test]
    fn test_validate_rejects_overspent_loot() {
        let items = catalog();
        let selector = LootSelector::new(&items);
        let config = SelectionConfig::new(10);

        assert!(selector.validate(&vec![items[1].clone()], &config).is_ok());
        assert!(selector
            .validate(&vec![items[0].clone(), items[1].clone()], &config)
            .is_err());
        assert_eq!(selector.generator_type(), "LootSelector");
    }

    #[test]
    fn test_generated_loot_passes_validation() {
        let items = catalog();
        let selector = LootSelector::new(&items);
        let config = SelectionConfig::new(45).with_exclude_tags(tags(&["treasure"]));

        for seed in 0..20 {
            let loot = selector.generate(&config, &mut create_rng(seed)).unwrap();
            selector.validate(&loot, &config).unwrap();
        }
    }

    #[test]
    fn test_selector_with_materials_resolves_names() {
        let items = vec![LootItem::new("[Metal] Sword", 1, "", 10, tags(&["weapon"]))];
        let materials = vec![Material::new("Gold", 2.0, "Metal")];
        let selector = LootSelector::new(&items).with_materials(&materials);

        let loot = selector
            .generate(&SelectionConfig::new(45), &mut create_rng(5))
            .unwrap();
        assert_eq!(loot.len(), 2);
        assert!(loot
            .iter()
            .all(|item| item.name == "Gold Sword" && item.point_value == 20));
    }
}
