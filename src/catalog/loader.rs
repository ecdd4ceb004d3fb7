//! # Catalog Loader
//!
//! Reads and writes the item catalog and materials files.
//!
//! Two on-disk shapes are accepted for each file: the older bare JSON array
//! and an object wrapping the array (`{"items": [...], "tags": [...]}` or
//! `{"materials": [...]}`). Saves always write the object shape.

use crate::catalog::{distinct_tags, LootItem, Material};
use crate::LootResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk catalog, in either the bare-list or the object shape.
#[derive(Debug)]
struct CatalogFile {
    items: Vec<LootItem>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CatalogObject {
    #[serde(default)]
    items: Vec<LootItem>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct CatalogFileRef<'a> {
    items: &'a [LootItem],
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MaterialsObject {
    #[serde(default)]
    materials: Vec<Material>,
}

#[derive(Debug, Serialize)]
struct MaterialsFileRef<'a> {
    materials: &'a [Material],
}

/// File-backed access to the item catalog and materials list.
///
/// Nothing is cached: every call reads the file again.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    items_path: PathBuf,
    materials_path: PathBuf,
}

impl CatalogLoader {
    /// Creates a loader for the given catalog and materials files.
    pub fn new(items_path: impl Into<PathBuf>, materials_path: impl Into<PathBuf>) -> Self {
        Self {
            items_path: items_path.into(),
            materials_path: materials_path.into(),
        }
    }

    /// Creates a loader for the default file names under a data directory.
    pub fn from_paths(paths: &crate::config::DataPaths) -> Self {
        Self::new(paths.items(), paths.materials())
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    pub fn materials_path(&self) -> &Path {
        &self.materials_path
    }

    /// Loads every item record from the catalog.
    ///
    /// A missing catalog file yields an empty list.
    pub fn load_items(&self) -> LootResult<Vec<LootItem>> {
        let items = self
            .read_catalog()?
            .map(|catalog| catalog.items)
            .unwrap_or_default();
        log::debug!(
            "Loaded {} items from {}",
            items.len(),
            self.items_path.display()
        );
        Ok(items)
    }

    /// Returns the tag vocabulary of the catalog.
    ///
    /// Uses the stored `tags` list when the file has one, otherwise derives
    /// the sorted distinct tags of all items.
    pub fn load_all_tags(&self) -> LootResult<Vec<String>> {
        Ok(match self.read_catalog()? {
            Some(CatalogFile {
                tags: Some(tags), ..
            }) => tags,
            Some(CatalogFile { items, tags: None }) => distinct_tags(&items),
            None => Vec::new(),
        })
    }

    /// Writes the catalog in the object shape, regenerating the tag list.
    pub fn save_items(&self, items: &[LootItem]) -> LootResult<()> {
        let file = CatalogFileRef {
            items,
            tags: distinct_tags(items),
        };
        write_json(&self.items_path, &file)?;
        log::debug!(
            "Saved {} items to {}",
            items.len(),
            self.items_path.display()
        );
        Ok(())
    }

    /// Loads the materials list. A missing file yields an empty list.
    pub fn load_materials(&self) -> LootResult<Vec<Material>> {
        let Some(text) = read_optional(&self.materials_path)? else {
            return Ok(Vec::new());
        };
        Ok(match serde_json::from_str::<Value>(&text)? {
            Value::Array(list) => Vec::<Material>::deserialize(Value::Array(list))?,
            other => MaterialsObject::deserialize(other)?.materials,
        })
    }

    /// Writes the materials list in the object shape.
    pub fn save_materials(&self, materials: &[Material]) -> LootResult<()> {
        write_json(&self.materials_path, &MaterialsFileRef { materials })
    }

    fn read_catalog(&self) -> LootResult<Option<CatalogFile>> {
        let Some(text) = read_optional(&self.items_path)? else {
            log::warn!("Catalog {} not found", self.items_path.display());
            return Ok(None);
        };
        // Branch on the top-level shape so item-level errors keep their detail.
        let catalog = match serde_json::from_str::<Value>(&text)? {
            Value::Array(list) => CatalogFile {
                items: Vec::<LootItem>::deserialize(Value::Array(list))?,
                tags: None,
            },
            other => {
                let object = CatalogObject::deserialize(other)?;
                CatalogFile {
                    items: object.items,
                    tags: object.tags,
                }
            }
        };
        Ok(Some(catalog))
    }
}

/// Reads `path` to a string, mapping only a missing file to `None`.
pub(crate) fn read_optional(path: &Path) -> LootResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pretty-prints `value` with four-space indentation.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> LootResult<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    fs::write(path, buf)?;
    Ok(())
}
