use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// How `(x, y)` maps onto the flat record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileOrder {
    /// `x + y * max_width`
    #[default]
    RowMajor,
    /// `x * max_height + y`
    ColumnMajor,
}

/// Rectangular addressing for a grid: the full map bounds plus the size of
/// the view window an editor shows at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addressing {
    pub width: usize,
    pub height: usize,
    pub max_width: usize,
    pub max_height: usize,
    pub order: TileOrder,
}

impl Addressing {
    /// Addressing whose view covers the whole map.
    pub fn new(max_width: usize, max_height: usize) -> Result<Self> {
        Self::with_view(max_width, max_height, max_width, max_height)
    }

    pub fn with_view(
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    ) -> Result<Self> {
        if max_width == 0 || max_height == 0 {
            return Err(GridError::invalid_dimensions(format!(
                "map must be at least 1x1, got {max_width}x{max_height}"
            )));
        }
        if max_width.checked_mul(max_height).is_none() {
            return Err(GridError::invalid_dimensions(format!(
                "{max_width}x{max_height} tiles overflow"
            )));
        }
        if width == 0 || height == 0 || width > max_width || height > max_height {
            return Err(GridError::invalid_dimensions(format!(
                "view {width}x{height} must fit inside map {max_width}x{max_height}"
            )));
        }

        Ok(Self {
            width,
            height,
            max_width,
            max_height,
            order: TileOrder::RowMajor,
        })
    }

    pub fn with_order(mut self, order: TileOrder) -> Self {
        self.order = order;
        self
    }

    pub fn tile_count(&self) -> usize {
        self.max_width * self.max_height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.max_width && y < self.max_height
    }

    /// Linear index of `(x, y)`. The caller guarantees the coordinate is in range.
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        match self.order {
            TileOrder::RowMajor => x + y * self.max_width,
            TileOrder::ColumnMajor => x * self.max_height + y,
        }
    }

    pub fn checked_index(&self, x: usize, y: usize) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        Ok(self.index_of(x, y))
    }

    pub fn coordinates_of(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.tile_count() {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.tile_count(),
            });
        }
        Ok(match self.order {
            TileOrder::RowMajor => (index % self.max_width, index / self.max_width),
            TileOrder::ColumnMajor => (index / self.max_height, index % self.max_height),
        })
    }

    /// Pull a view origin back so the `width x height` view stays on the map.
    pub fn clamp_view_origin(&self, x: usize, y: usize) -> (usize, usize) {
        (
            x.min(self.max_width - self.width),
            y.min(self.max_height - self.height),
        )
    }

    /// The view rectangle whose top-left corner is `(x, y)`, kept on the map.
    pub fn view_at(&self, x: usize, y: usize) -> Rect {
        let (x, y) = self.clamp_view_origin(x, y);
        Rect::new(x, y, self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.max_width, self.max_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }

    /// Shrink the rectangle to the part that lies on the map. A rectangle
    /// starting off the map comes back empty.
    pub fn clamp_to(&self, addressing: &Addressing) -> Rect {
        let room_x = addressing.max_width.saturating_sub(self.x);
        let room_y = addressing.max_height.saturating_sub(self.y);
        let width = self.width.min(room_x);
        let height = self.height.min(room_y);
        Rect::new(self.x, self.y, width, height)
    }

    /// Every cell, x outer and y inner.
    pub fn cells_column_major(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let Rect {
            x,
            y,
            width,
            height,
        } = *self;
        (x..x + width).flat_map(move |cx| (y..y + height).map(move |cy| (cx, cy)))
    }
}
