pub mod addressing;
pub mod error;
pub mod item;
pub mod layer;
pub mod reader;
pub mod record;
pub mod rotation;
pub mod size;

pub use addressing::{Addressing, Rect, TileOrder};
pub use error::{ErrorCode, GridError, Result};
pub use item::Item;
pub use layer::{ItemLayer, LayerSummary, PlacedItemPermission};
pub use record::TileRecord;
pub use rotation::Rotation;
pub use size::{ItemSize, ItemSizeTable, SizeLookup};
