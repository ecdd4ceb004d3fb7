//! # Material Substitution
//!
//! Item names may embed placeholders that are filled from the materials list
//! when an item is drawn:
//!
//! - `[Metal]` picks any material of type `Metal`
//! - `[Metal/Wood]` picks from either type
//! - `[Gem/o]` is optional and is left out half of the time
//!
//! Each chosen material multiplies the item's point value by its modifier.

use crate::catalog::{LootItem, Material};
use rand::Rng;

const OPTIONAL_SUFFIX: &str = "/o";

/// A placeholder found in an item name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte range of the whole `[...]` token
    pub span: std::ops::Range<usize>,
    /// Material types accepted
    pub kinds: Vec<&'a str>,
    /// Whether the placeholder may be dropped
    pub optional: bool,
}

/// Finds every placeholder in `name`, left to right.
///
/// Only brackets whose content is ASCII letters and `/` count; anything else
/// is ordinary text.
pub fn find_placeholders(name: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(open) = name[cursor..].find('[').map(|i| cursor + i) {
        let Some(close) = name[open..].find(']').map(|i| open + i) else {
            break;
        };
        let body = &name[open + 1..close];

        if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphabetic() || c == '/') {
            cursor = open + 1;
            continue;
        }

        let (types, optional) = match body.strip_suffix(OPTIONAL_SUFFIX) {
            Some(rest) if !rest.is_empty() => (rest, true),
            _ => (body, false),
        };

        found.push(Placeholder {
            span: open..close + 1,
            kinds: types.split('/').filter(|t| !t.is_empty()).collect(),
            optional,
        });
        cursor = close + 1;
    }

    found
}

/// Returns a copy of `item` with its placeholders filled from `materials`.
///
/// The point value is scaled by the product of the chosen modifiers and
/// rounded half to even, never dropping below one point.
pub fn resolve_materials<R: Rng + ?Sized>(
    item: &LootItem,
    materials: &[Material],
    rng: &mut R,
) -> LootItem {
    let placeholders = find_placeholders(&item.name);
    if placeholders.is_empty() {
        return item.clone();
    }

    let mut name = String::with_capacity(item.name.len());
    let mut modifier = 1.0;
    let mut last = 0;

    for placeholder in &placeholders {
        name.push_str(&item.name[last..placeholder.span.start]);
        last = placeholder.span.end;

        if placeholder.optional && rng.gen_bool(0.5) {
            continue;
        }

        let options: Vec<&Material> = materials
            .iter()
            .filter(|m| placeholder.kinds.iter().any(|kind| m.is_kind(kind)))
            .collect();
        if options.is_empty() {
            log::debug!(
                "No material of type {:?} for '{}'",
                placeholder.kinds,
                item.name
            );
            continue;
        }

        let choice = options[rng.gen_range(0..options.len())];
        modifier *= choice.modifier;
        name.push_str(&choice.name);
    }
    name.push_str(&item.name[last..]);

    let scaled = (f64::from(item.point_value) * modifier).round_ties_even() as i32;

    LootItem {
        name: name.split_whitespace().collect::<Vec<_>>().join(" "),
        point_value: scaled.max(1),
        ..item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    fn item(name: &str, value: i32) -> LootItem {
        LootItem::new(name, 1, "", value, vec!["weapon".to_string()])
    }

    #[test]
    fn test_find_placeholders() {
        let found = find_placeholders("[Metal/Wood] Shield of [Gem/o]");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kinds, vec!["Metal", "Wood"]);
        assert!(!found[0].optional);
        assert_eq!(found[0].span, 0..12);
        assert_eq!(found[1].kinds, vec!["Gem"]);
        assert!(found[1].optional);
    }

    #[test]
    fn test_find_placeholders_ignores_non_placeholder_brackets() {
        assert!(find_placeholders("Sword [+1]").is_empty());
        assert!(find_placeholders("Unclosed [Metal").is_empty());
        assert!(find_placeholders("Empty []").is_empty());

        let found = find_placeholders("[[Metal] Axe");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, 1..8);
    }

    #[test]
    fn test_plain_item_is_unchanged() {
        let sword = item("Sword", 10);
        let mut rng = create_rng(1);
        assert_eq!(resolve_materials(&sword, &[], &mut rng), sword);
    }

    #[test]
    fn test_resolve_applies_name_and_modifier() {
        let materials = vec![Material::new("Iron", 1.5, "metal")];
        let mut rng = create_rng(1);

        let resolved = resolve_materials(&item("[Metal] Sword", 10), &materials, &mut rng);
        assert_eq!(resolved.name, "Iron Sword");
        assert_eq!(resolved.point_value, 15);
        assert_eq!(resolved.tags, vec!["weapon"]);
    }

    #[test]
    fn test_resolve_only_uses_matching_types() {
        let materials = vec![
            Material::new("Oak", 0.5, "Wood"),
            Material::new("Steel", 2.0, "Metal"),
        ];
        for seed in 0..20 {
            let resolved =
                resolve_materials(&item("[Wood] Bow", 10), &materials, &mut create_rng(seed));
            assert_eq!(resolved.name, "Oak Bow");
            assert_eq!(resolved.point_value, 5);
        }
    }

    #[test]
    fn test_missing_material_type_removes_placeholder() {
        let materials = vec![Material::new("Oak", 0.5, "Wood")];
        let mut rng = create_rng(1);

        let resolved = resolve_materials(&item("[Gem] Ring", 8), &materials, &mut rng);
        assert_eq!(resolved.name, "Ring");
        assert_eq!(resolved.point_value, 8);
    }

    #[test]
    fn test_optional_placeholder_sometimes_dropped() {
        let materials = vec![Material::new("Ruby", 2.0, "Gem")];
        let mut with_gem = 0;
        let mut without_gem = 0;

        for seed in 0..100 {
            let resolved =
                resolve_materials(&item("Ring of [Gem/o]", 5), &materials, &mut create_rng(seed));
            match resolved.name.as_str() {
                "Ring of Ruby" => {
                    assert_eq!(resolved.point_value, 10);
                    with_gem += 1;
                }
                "Ring of" => {
                    assert_eq!(resolved.point_value, 5);
                    without_gem += 1;
                }
                other => panic!("unexpected name {}", other),
            }
        }

        assert!(with_gem > 0);
        assert!(without_gem > 0);
    }

    #[test]
    fn test_half_points_round_to_even() {
        let materials = vec![Material::new("Oak", 0.5, "Wood")];
        let mut rng = create_rng(1);

        let club = resolve_materials(&item("[Wood] Club", 5), &materials, &mut rng);
        assert_eq!(club.name, "Oak Club");
        assert_eq!(club.point_value, 2);

        let staff = resolve_materials(&item("[Wood] Staff", 7), &materials, &mut rng);
        assert_eq!(staff.point_value, 4);

        let bow = resolve_materials(&item("[Wood] Bow", 6), &materials, &mut rng);
        assert_eq!(bow.point_value, 3);
    }

    #[test]
    fn test_resolved_value_never_below_one() {
        let materials = vec![Material::new("Straw", 0.0, "Fiber")];
        let mut rng = create_rng(1);

        let resolved = resolve_materials(&item("[Fiber] Hat", 3), &materials, &mut rng);
        assert_eq!(resolved.name, "Straw Hat");
        assert_eq!(resolved.point_value, 1);
    }
}
