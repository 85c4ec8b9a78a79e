//! Item footprint sizes and the lookup seam the grid uses to find them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::item::Item;
use crate::rotation::Rotation;

/// Width and height of an item, in grid cells, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSize {
    pub width: u8,
    pub height: u8,
}

impl Default for ItemSize {
    fn default() -> Self {
        Self::ONE
    }
}

impl ItemSize {
    pub const ONE: ItemSize = ItemSize {
        width: 1,
        height: 1,
    };

    pub fn new(width: u8, height: u8) -> Self {
        Self { width, height }
    }

    /// Footprint after applying `rotation`: sideways rotations swap the axes.
    pub fn footprint(&self, rotation: Rotation) -> ItemSize {
        if rotation.is_sideways() {
            ItemSize::new(self.height, self.width)
        } else {
            *self
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.width <= 1 && self.height <= 1
    }
}

/// Resolves the catalog size of a tile.
pub trait SizeLookup<T> {
    fn size_of(&self, tile: &T) -> ItemSize;
}

impl<T, F> SizeLookup<T> for F
where
    F: Fn(&T) -> ItemSize,
{
    fn size_of(&self, tile: &T) -> ItemSize {
        self(tile)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SizeTableEntry {
    item_id: u16,
    width: u8,
    height: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SizeTableFile {
    #[serde(default)]
    default: Option<ItemSize>,
    items: Vec<SizeTableEntry>,
}

/// Item id to footprint table. Unlisted ids use the default size (1x1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemSizeTable {
    default: ItemSize,
    entries: BTreeMap<u16, ItemSize>,
}

impl ItemSizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(default: ItemSize) -> Self {
        Self {
            default,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, item_id: u16, size: ItemSize) -> Option<ItemSize> {
        self.entries.insert(item_id, size)
    }

    pub fn get(&self, item_id: u16) -> ItemSize {
        self.entries.get(&item_id).copied().unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a table of the form
    /// `{"default": {"width":1,"height":1}, "items": [{"item_id":..,"width":..,"height":..}]}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: SizeTableFile =
            serde_json::from_str(text).map_err(|e| GridError::SizeTable(e.to_string()))?;

        let mut table = Self::with_default(file.default.unwrap_or_default());
        for entry in file.items {
            if entry.item_id == Item::NONE || entry.item_id == Item::EXTENSION {
                return Err(GridError::SizeTable(format!(
                    "reserved item id 0x{:04X} cannot have a size",
                    entry.item_id
                )));
            }
            let size = ItemSize::new(entry.width, entry.height);
            if table.insert(entry.item_id, size).is_some() {
                log::warn!(
                    "duplicate size entry for item 0x{:04X}; keeping the last one",
                    entry.item_id
                );
            }
        }
        log::debug!("loaded {} item sizes", table.len());
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl SizeLookup<Item> for ItemSizeTable {
    fn size_of(&self, tile: &Item) -> ItemSize {
        self.get(tile.item_id)
    }
}
