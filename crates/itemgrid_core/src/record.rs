use crate::error::Result;
use crate::rotation::Rotation;

/// The record-level contract a grid needs from its slot type.
///
/// The byte layout belongs to the implementor; the grid only relies on a
/// fixed `SIZE`, the NONE sentinel, and the extension-marker operations.
pub trait TileRecord: Clone + PartialEq {
    const SIZE: usize;

    /// The empty-slot record.
    fn none() -> Self;

    fn is_none(&self) -> bool;

    /// Decode one record. `bytes` is exactly `SIZE` long.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    fn emit_to_vec(&self, out: &mut Vec<u8>);

    fn rotation(&self) -> Rotation;

    /// Offset from this cell back to its anchor, if this is an extension marker.
    fn extension_offset(&self) -> Option<(u8, u8)>;

    /// Turn this slot into a marker pointing `(ix, iy)` cells away from `anchor`.
    fn set_as_extension(&mut self, anchor: &Self, ix: u8, iy: u8);

    fn delete(&mut self) {
        *self = Self::none();
    }

    fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    fn is_extension(&self) -> bool {
        self.extension_offset().is_some()
    }
}
