use std::io::{Cursor, Read, Seek};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::reader::LittleEndianReader;
use crate::record::TileRecord;
use crate::rotation::Rotation;

const ITEM_SIZE: usize = 8;
const FLAG_BURIED: u8 = 0x04;

// Extension markers reuse the free param: x offset, y offset, anchor id.
const EXT_X_SHIFT: u32 = 0;
const EXT_Y_SHIFT: u32 = 8;
const EXT_ITEM_ID_SHIFT: u32 = 16;

/// One 8-byte slot of an item array.
///
/// Layout (little-endian): item id `u16`, system param `u8` (rotation in
/// bits 0-1, buried flag in bit 2), additional param `u8`, free param `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub item_id: u16,
    pub system_param: u8,
    pub additional_param: u8,
    pub free_param: u32,
}

impl Default for Item {
    fn default() -> Self {
        Self::NO_ITEM
    }
}

impl Item {
    pub const SIZE: usize = ITEM_SIZE;
    pub const NONE: u16 = 0xFFFE;
    pub const EXTENSION: u16 = 0xFFFD;
    pub const NO_ITEM: Item = Item {
        item_id: Self::NONE,
        system_param: 0,
        additional_param: 0,
        free_param: 0,
    };

    pub fn new(item_id: u16) -> Self {
        Self {
            item_id,
            system_param: 0,
            additional_param: 0,
            free_param: 0,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_count(mut self, count: u16) -> Self {
        self.set_count(count);
        self
    }

    pub fn is_none(&self) -> bool {
        self.item_id == Self::NONE
    }

    pub fn is_extension(&self) -> bool {
        self.item_id == Self::EXTENSION
    }

    /// An occupied cell that is not an extension marker.
    pub fn is_root(&self) -> bool {
        !self.is_none() && !self.is_extension()
    }

    pub fn rotation(&self) -> Rotation {
        Rotation::from_raw(self.system_param)
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.system_param = (self.system_param & !Rotation::MASK) | rotation.raw();
    }

    pub fn is_buried(&self) -> bool {
        self.system_param & FLAG_BURIED != 0
    }

    pub fn set_buried(&mut self, buried: bool) {
        if buried {
            self.system_param |= FLAG_BURIED;
        } else {
            self.system_param &= !FLAG_BURIED;
        }
    }

    pub fn count(&self) -> u16 {
        self.free_param as u16
    }

    pub fn set_count(&mut self, count: u16) {
        self.free_param = (self.free_param & 0xFFFF_0000) | u32::from(count);
    }

    pub fn use_count(&self) -> u16 {
        (self.free_param >> 16) as u16
    }

    pub fn set_use_count(&mut self, use_count: u16) {
        self.free_param = (self.free_param & 0x0000_FFFF) | (u32::from(use_count) << 16);
    }

    pub fn extension_x(&self) -> u8 {
        (self.free_param >> EXT_X_SHIFT) as u8
    }

    pub fn extension_y(&self) -> u8 {
        (self.free_param >> EXT_Y_SHIFT) as u8
    }

    pub fn extension_item_id(&self) -> u16 {
        (self.free_param >> EXT_ITEM_ID_SHIFT) as u16
    }

    pub fn set_as_extension(&mut self, anchor: &Item, x: u8, y: u8) {
        self.item_id = Self::EXTENSION;
        self.system_param = 0;
        self.additional_param = 0;
        self.free_param = (u32::from(x) << EXT_X_SHIFT)
            | (u32::from(y) << EXT_Y_SHIFT)
            | (u32::from(anchor.item_id) << EXT_ITEM_ID_SHIFT);
    }

    pub fn delete(&mut self) {
        *self = Self::NO_ITEM;
    }

    pub fn parse<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> std::io::Result<Self> {
        Ok(Self {
            item_id: r.read_u16()?,
            system_param: r.read_u8()?,
            additional_param: r.read_u8()?,
            free_param: r.read_u32()?,
        })
    }

    pub fn emit_to_vec(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.item_id.to_le_bytes());
        out.push(self.system_param);
        out.push(self.additional_param);
        out.extend_from_slice(&self.free_param.to_le_bytes());
    }

    pub fn to_bytes(&self) -> [u8; ITEM_SIZE] {
        let mut out = Vec::with_capacity(ITEM_SIZE);
        self.emit_to_vec(&mut out);
        let mut bytes = [0u8; ITEM_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }

    /// Split a buffer into consecutive records.
    pub fn read_array(data: &[u8]) -> Result<Vec<Item>> {
        if data.len() % ITEM_SIZE != 0 {
            return Err(GridError::ShapeMismatch {
                expected: data.len() - data.len() % ITEM_SIZE,
                actual: data.len(),
            });
        }

        let mut r = LittleEndianReader::new(Cursor::new(data));
        let mut items = Vec::with_capacity(data.len() / ITEM_SIZE);
        while r.remaining()? > 0 {
            items.push(Item::parse(&mut r)?);
        }
        Ok(items)
    }

    pub fn write_array(items: &[Item]) -> Vec<u8> {
        let mut out = Vec::with_capacity(items.len() * ITEM_SIZE);
        for item in items {
            item.emit_to_vec(&mut out);
        }
        out
    }
}

impl TileRecord for Item {
    const SIZE: usize = ITEM_SIZE;

    fn none() -> Self {
        Self::NO_ITEM
    }

    fn is_none(&self) -> bool {
        Item::is_none(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ITEM_SIZE {
            return Err(GridError::ShapeMismatch {
                expected: ITEM_SIZE,
                actual: bytes.len(),
            });
        }
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        Ok(Item::parse(&mut r)?)
    }

    fn emit_to_vec(&self, out: &mut Vec<u8>) {
        Item::emit_to_vec(self, out);
    }

    fn rotation(&self) -> Rotation {
        Item::rotation(self)
    }

    fn extension_offset(&self) -> Option<(u8, u8)> {
        self.is_extension()
            .then(|| (self.extension_x(), self.extension_y()))
    }

    fn set_as_extension(&mut self, anchor: &Self, ix: u8, iy: u8) {
        Item::set_as_extension(self, anchor, ix, iy);
    }

    fn delete(&mut self) {
        Item::delete(self);
    }
}
