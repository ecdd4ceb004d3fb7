//! # Text Records
//!
//! Pipe-delimited single-line formats for quick or bulk entry:
//!
//! - items: `name|rarity|description|point_value|tag1,tag2`
//! - materials: `name|modifier|type`

use crate::catalog::{LootItem, Material};
use crate::{LootError, LootResult};

const ITEM_FIELDS: usize = 5;
const MATERIAL_FIELDS: usize = 3;

/// Parses one item record.
///
/// # Examples
///
/// ```
/// use lootgen::parse_item_line;
///
/// let item = parse_item_line("Sword|1|Sharp blade|10|weapon,melee").unwrap();
/// assert_eq!(item.name, "Sword");
/// assert_eq!(item.tags, vec!["weapon", "melee"]);
///
/// assert!(parse_item_line("Bad|data").is_err());
/// ```
pub fn parse_item_line(line: &str) -> LootResult<LootItem> {
    parse_item_at(line, 1)
}

/// Parses one record per non-blank line. Errors report the 1-based line.
pub fn parse_items_text(text: &str) -> LootResult<Vec<LootItem>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_item_at(line, idx + 1))
        .collect()
}

/// Parses one material record.
pub fn parse_material_line(line: &str) -> LootResult<Material> {
    parse_material_at(line, 1)
}

/// Parses one material per non-blank line.
pub fn parse_materials_text(text: &str) -> LootResult<Vec<Material>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_material_at(line, idx + 1))
        .collect()
}

fn parse_item_at(line: &str, line_no: usize) -> LootResult<LootItem> {
    let fields = split_fields(line, ITEM_FIELDS, line_no)?;
    require_name(fields[0], line_no)?;
    let rarity = parse_number(fields[1], "rarity", line_no)?;
    let point_value = parse_number(fields[3], "point value", line_no)?;
    let tags = fields[4]
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect();

    Ok(LootItem::new(fields[0], rarity, fields[2], point_value, tags))
}

fn parse_material_at(line: &str, line_no: usize) -> LootResult<Material> {
    let fields = split_fields(line, MATERIAL_FIELDS, line_no)?;
    require_name(fields[0], line_no)?;
    let modifier: f64 = fields[1].parse().map_err(|_| LootError::Parse {
        line: line_no,
        reason: format!("modifier '{}' is not a number", fields[1]),
    })?;
    Ok(Material::new(fields[0], modifier, fields[2]))
}

fn split_fields(line: &str, expected: usize, line_no: usize) -> LootResult<Vec<&str>> {
    let fields: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if fields.len() != expected {
        return Err(LootError::Parse {
            line: line_no,
            reason: format!("expected {} fields, found {}", expected, fields.len()),
        });
    }
    Ok(fields)
}

fn require_name(name: &str, line_no: usize) -> LootResult<()> {
    if name.is_empty() {
        return Err(LootError::Parse {
            line: line_no,
            reason: "name is empty".to_string(),
        });
    }
    Ok(())
}

fn parse_number(field: &str, what: &str, line_no: usize) -> LootResult<i32> {
    field.parse().map_err(|_| LootError::Parse {
        line: line_no,
        reason: format!("{} '{}' is not an integer", what, field),
    })
}
