use serde::{Deserialize, Serialize};

use crate::addressing::{Addressing, Rect};
use crate::error::{GridError, Result};
use crate::item::Item;
use crate::record::TileRecord;
use crate::size::SizeLookup;

/// Outcome of checking whether an item can be placed at an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacedItemPermission {
    OutOfBounds,
    Collision,
    NoCollision,
}

impl PlacedItemPermission {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::OutOfBounds => "out_of_bounds",
            Self::Collision => "collision",
            Self::NoCollision => "no_collision",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSummary {
    pub tiles: usize,
    pub roots: usize,
    pub extensions: usize,
    pub empty: usize,
}

/// A fixed-size grid of item records over a flat array.
///
/// The array always holds exactly `max_width * max_height` records; every
/// mutation happens in place and is applied immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemLayer<T: TileRecord = Item> {
    tiles: Vec<T>,
    addressing: Addressing,
}

impl<T: TileRecord> ItemLayer<T> {
    pub fn new(tiles: Vec<T>, addressing: Addressing) -> Result<Self> {
        if tiles.len() != addressing.tile_count() {
            return Err(GridError::ShapeMismatch {
                expected: addressing.tile_count() * T::SIZE,
                actual: tiles.len() * T::SIZE,
            });
        }
        Ok(Self { tiles, addressing })
    }

    /// A grid where every slot holds the NONE record.
    pub fn empty(addressing: Addressing) -> Self {
        Self {
            tiles: vec![T::none(); addressing.tile_count()],
            addressing,
        }
    }

    pub fn from_bytes(data: &[u8], addressing: Addressing) -> Result<Self> {
        let mut layer = Self::empty(addressing);
        layer.import_all(data)?;
        Ok(layer)
    }

    pub fn addressing(&self) -> &Addressing {
        &self.addressing
    }

    pub fn max_width(&self) -> usize {
        self.addressing.max_width
    }

    pub fn max_height(&self) -> usize {
        self.addressing.max_height
    }

    pub fn tiles(&self) -> &[T] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<T> {
        self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn byte_len(&self) -> usize {
        self.tiles.len() * T::SIZE
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T> {
        let index = self.addressing.checked_index(x, y)?;
        Ok(&self.tiles[index])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut T> {
        let index = self.addressing.checked_index(x, y)?;
        Ok(&mut self.tiles[index])
    }

    pub fn set(&mut self, x: usize, y: usize, tile: &T) -> Result<()> {
        self.get_mut(x, y)?.copy_from(tile);
        Ok(())
    }

    pub fn get_index(&self, index: usize) -> Result<&T> {
        let len = self.tiles.len();
        self.tiles
            .get(index)
            .ok_or(GridError::IndexOutOfRange { index, len })
    }

    pub fn set_index(&mut self, index: usize, tile: &T) -> Result<()> {
        let len = self.tiles.len();
        let slot = self
            .tiles
            .get_mut(index)
            .ok_or(GridError::IndexOutOfRange { index, len })?;
        slot.copy_from(tile);
        Ok(())
    }

    /// Serialize every record in linear order.
    pub fn dump_all(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for tile in &self.tiles {
            tile.emit_to_vec(&mut out);
        }
        out
    }

    /// Overwrite every slot from `data`, which must be exactly the grid's
    /// byte size. On error the grid is left untouched.
    pub fn import_all(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.byte_len() {
            log::warn!(
                "rejecting import of {} bytes into a {}-byte grid",
                data.len(),
                self.byte_len()
            );
            return Err(GridError::ShapeMismatch {
                expected: self.byte_len(),
                actual: data.len(),
            });
        }

        let decoded = data
            .chunks_exact(T::SIZE)
            .map(T::from_bytes)
            .collect::<Result<Vec<T>>>()?;
        for (slot, tile) in self.tiles.iter_mut().zip(&decoded) {
            slot.copy_from(tile);
        }
        log::debug!("imported {} tiles", decoded.len());
        Ok(())
    }

    /// Delete every record in `region` matching `criteria`, visiting x outer
    /// and y inner. The region is clamped to the grid. Returns the count deleted.
    pub fn remove_all<F>(&mut self, region: Rect, mut criteria: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let region = region.clamp_to(&self.addressing);
        let mut count = 0;
        for (x, y) in region.cells_column_major() {
            let index = self.addressing.index_of(x, y);
            if !criteria(&self.tiles[index]) {
                continue;
            }
            self.tiles[index].delete();
            count += 1;
        }
        count
    }

    /// Rotated footprint of `tile` anchored at `(x, y)`, clamped to the grid.
    pub fn extension_footprint<S>(&self, tile: &T, x: usize, y: usize, sizes: &S) -> (usize, usize)
    where
        S: SizeLookup<T> + ?Sized,
    {
        let footprint = sizes.size_of(tile).footprint(tile.rotation());
        let mut w = usize::from(footprint.width);
        let mut h = usize::from(footprint.height);

        if x + w > self.addressing.max_width {
            w = self.addressing.max_width.saturating_sub(x);
            log::debug!("clamped footprint width at ({x}, {y}) to {w}");
        }
        if y + h > self.addressing.max_height {
            h = self.addressing.max_height.saturating_sub(y);
            log::debug!("clamped footprint height at ({x}, {y}) to {h}");
        }
        (w, h)
    }

    /// The secondary cells of `tile` anchored at `(x, y)`: the clamped
    /// footprint minus the anchor, x outer and y inner, each with its offset.
    pub fn extension_cells<S>(
        &self,
        tile: &T,
        x: usize,
        y: usize,
        sizes: &S,
    ) -> Result<Vec<(usize, usize, u8, u8)>>
    where
        S: SizeLookup<T> + ?Sized,
    {
        self.addressing.checked_index(x, y)?;
        let (w, h) = self.extension_footprint(tile, x, y, sizes);

        let mut cells = Vec::with_capacity((w * h).saturating_sub(1));
        for ix in 0..w {
            for iy in 0..h {
                if ix == 0 && iy == 0 {
                    continue;
                }
                // footprints come from u8 sizes, so offsets fit
                cells.push((x + ix, y + iy, ix as u8, iy as u8));
            }
        }
        Ok(cells)
    }

    /// Write extension markers over the secondary cells of `tile`'s footprint.
    /// The anchor cell itself is left to the caller. Returns the cells written.
    pub fn set_extension_tiles<S>(
        &mut self,
        tile: &T,
        x: usize,
        y: usize,
        sizes: &S,
    ) -> Result<usize>
    where
        S: SizeLookup<T> + ?Sized,
    {
        let cells = self.extension_cells(tile, x, y, sizes)?;
        for &(cx, cy, ix, iy) in &cells {
            let index = self.addressing.index_of(cx, cy);
            self.tiles[index].set_as_extension(tile, ix, iy);
        }
        Ok(cells.len())
    }

    /// Delete the secondary cells of `tile`'s footprint; the exact inverse of
    /// [`ItemLayer::set_extension_tiles`]. Returns the cells deleted.
    pub fn delete_extension_tiles<S>(
        &mut self,
        tile: &T,
        x: usize,
        y: usize,
        sizes: &S,
    ) -> Result<usize>
    where
        S: SizeLookup<T> + ?Sized,
    {
        let cells = self.extension_cells(tile, x, y, sizes)?;
        for &(cx, cy, _, _) in &cells {
            let index = self.addressing.index_of(cx, cy);
            self.tiles[index].delete();
        }
        Ok(cells.len())
    }

    /// Check whether `tile` fits at `(x, y)` without overwriting anything.
    ///
    /// Bounds are checked on the unrotated size first; the rotated footprint
    /// is then checked again so the scan never leaves the grid.
    pub fn is_occupied<S>(&self, tile: &T, x: usize, y: usize, sizes: &S) -> PlacedItemPermission
    where
        S: SizeLookup<T> + ?Sized,
    {
        if !self.addressing.contains(x, y) {
            return PlacedItemPermission::OutOfBounds;
        }

        let size = sizes.size_of(tile);
        if x + usize::from(size.width) > self.addressing.max_width
            || y + usize::from(size.height) > self.addressing.max_height
        {
            return PlacedItemPermission::OutOfBounds;
        }

        let footprint = size.footprint(tile.rotation());
        let w = usize::from(footprint.width);
        let h = usize::from(footprint.height);
        if x + w > self.addressing.max_width || y + h > self.addressing.max_height {
            return PlacedItemPermission::OutOfBounds;
        }

        for ix in 0..w {
            for iy in 0..h {
                let index = self.addressing.index_of(x + ix, y + iy);
                if !self.tiles[index].is_none() {
                    return PlacedItemPermission::Collision;
                }
            }
        }
        PlacedItemPermission::NoCollision
    }

    /// Find the anchor cell of whatever occupies `(x, y)`. Extension markers
    /// are followed back through their stored offset; a marker whose anchor
    /// is missing resolves to `None`, as does an empty cell.
    pub fn resolve_anchor(&self, x: usize, y: usize) -> Result<Option<(usize, usize)>> {
        let tile = self.get(x, y)?;
        if tile.is_none() {
            return Ok(None);
        }
        let Some((ix, iy)) = tile.extension_offset() else {
            return Ok(Some((x, y)));
        };

        let (ix, iy) = (usize::from(ix), usize::from(iy));
        if ix > x || iy > y {
            return Ok(None);
        }
        let (ax, ay) = (x - ix, y - iy);
        let anchor = &self.tiles[self.addressing.index_of(ax, ay)];
        if anchor.is_none() || anchor.is_extension() {
            return Ok(None);
        }
        Ok(Some((ax, ay)))
    }

    /// Validate, then write `tile` at `(x, y)` along with its extension
    /// markers. Nothing is written unless the result is `NoCollision`.
    pub fn place_item<S>(
        &mut self,
        tile: &T,
        x: usize,
        y: usize,
        sizes: &S,
    ) -> Result<PlacedItemPermission>
    where
        S: SizeLookup<T> + ?Sized,
    {
        let permission = self.is_occupied(tile, x, y, sizes);
        if permission != PlacedItemPermission::NoCollision {
            log::debug!("placement at ({x}, {y}) refused: {}", permission.as_str());
            return Ok(permission);
        }

        self.set_extension_tiles(tile, x, y, sizes)?;
        self.set(x, y, tile)?;
        Ok(permission)
    }

    /// Remove the item covering `(x, y)`, wherever its anchor is. Returns the
    /// anchor record that was removed.
    pub fn remove_item<S>(&mut self, x: usize, y: usize, sizes: &S) -> Result<Option<T>>
    where
        S: SizeLookup<T> + ?Sized,
    {
        let Some((ax, ay)) = self.resolve_anchor(x, y)? else {
            return Ok(None);
        };

        let index = self.addressing.index_of(ax, ay);
        let anchor = self.tiles[index].clone();
        self.delete_extension_tiles(&anchor, ax, ay, sizes)?;
        self.tiles[index].delete();
        Ok(Some(anchor))
    }

    /// Overwrite every record equal to `from` with `to`.
    pub fn replace_all(&mut self, from: &T, to: &T) -> usize {
        let mut count = 0;
        for tile in self.tiles.iter_mut().filter(|t| **t == *from) {
            tile.copy_from(to);
            count += 1;
        }
        count
    }

    /// Copy `items` into empty slots in linear order, skipping occupied ones.
    /// Stops when the grid has no empty slot left; returns the count written.
    pub fn fill_empty<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut next = 0;
        let mut written = 0;
        for item in items {
            let Some(offset) = self.tiles[next..].iter().position(|t| t.is_none()) else {
                break;
            };
            next += offset;
            self.tiles[next].copy_from(&item);
            next += 1;
            written += 1;
        }
        written
    }

    /// Copy the record at `index` into every other slot.
    pub fn clone_to_all(&mut self, index: usize) -> Result<usize> {
        let source = self.get_index(index)?.clone();
        let mut count = 0;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            tile.copy_from(&source);
            count += 1;
        }
        Ok(count)
    }

    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.delete();
        }
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        self.tiles.len().div_ceil(per_page)
    }

    /// The `page`-th run of `per_page` records; the last page may be short.
    pub fn page(&self, page: usize, per_page: usize) -> Option<&[T]> {
        if page >= self.page_count(per_page) {
            return None;
        }
        let start = page * per_page;
        let end = (start + per_page).min(self.tiles.len());
        Some(&self.tiles[start..end])
    }

    pub fn summary(&self) -> LayerSummary {
        let mut summary = LayerSummary {
            tiles: self.tiles.len(),
            roots: 0,
            extensions: 0,
            empty: 0,
        };
        for tile in &self.tiles {
            if tile.is_none() {
                summary.empty += 1;
            } else if tile.is_extension() {
                summary.extensions += 1;
            } else {
                summary.roots += 1;
            }
        }
        summary
    }
}
