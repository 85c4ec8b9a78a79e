use std::fmt::Write as _;

use itemgrid_core::{Item, ItemLayer, LayerSummary, PlacedItemPermission, Rect};
use serde_json::{Map as JsonMap, Value as JsonValue};

const CELL_EMPTY: char = '.';
const CELL_ROOT: char = '#';
const CELL_EXTENSION: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Prefix each row with its y coordinate and add an x ruler.
    pub ruler: bool,
}

fn cell_char(item: &Item) -> char {
    if item.is_none() {
        CELL_EMPTY
    } else if item.is_extension() {
        CELL_EXTENSION
    } else {
        CELL_ROOT
    }
}

/// One line per row of the whole map.
pub fn render_text_map(layer: &ItemLayer, options: TextRenderOptions) -> String {
    render_text_region(layer, layer.addressing().bounds(), options)
}

/// One line per row of `region`, clamped to the map.
pub fn render_text_region(layer: &ItemLayer, region: Rect, options: TextRenderOptions) -> String {
    let region = region.clamp_to(layer.addressing());
    let mut out = String::new();

    if options.ruler {
        out.push_str("    ");
        for x in region.x..region.x + region.width {
            out.push(char::from_digit((x % 10) as u32, 10).unwrap_or('?'));
        }
        out.push('\n');
    }

    for y in region.y..region.y + region.height {
        if options.ruler {
            write!(&mut out, "{y:>3} ").expect("writing to String cannot fail");
        }
        for x in region.x..region.x + region.width {
            let c = layer.get(x, y).map(cell_char).unwrap_or(CELL_EMPTY);
            out.push(c);
        }
        out.push('\n');
    }
    out
}

pub fn render_summary_text(layer: &ItemLayer) -> String {
    let summary = layer.summary();
    let addressing = layer.addressing();
    let mut out = String::new();
    let (width, height) = (addressing.max_width, addressing.max_height);
    writeln!(&mut out, "size={width}x{height}").expect("writing to String cannot fail");
    writeln!(&mut out, "order={:?}", addressing.order).expect("writing to String cannot fail");
    writeln!(&mut out, "tiles={}", summary.tiles).expect("writing to String cannot fail");
    writeln!(&mut out, "items={}", summary.roots).expect("writing to String cannot fail");
    writeln!(&mut out, "extensions={}", summary.extensions).expect("writing to String cannot fail");
    writeln!(&mut out, "empty={}", summary.empty).expect("writing to String cannot fail");
    out
}

pub fn summary_to_json(summary: &LayerSummary) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("tiles".to_string(), JsonValue::from(summary.tiles));
    out.insert("items".to_string(), JsonValue::from(summary.roots));
    out.insert("extensions".to_string(), JsonValue::from(summary.extensions));
    out.insert("empty".to_string(), JsonValue::from(summary.empty));
    JsonValue::Object(out)
}

pub fn render_json_summary(layer: &ItemLayer) -> JsonValue {
    let addressing = layer.addressing();
    let mut out = JsonMap::new();
    out.insert("width".to_string(), JsonValue::from(addressing.max_width));
    out.insert("height".to_string(), JsonValue::from(addressing.max_height));
    out.insert(
        "order".to_string(),
        JsonValue::String(format!("{:?}", addressing.order)),
    );
    out.insert("summary".to_string(), summary_to_json(&layer.summary()));
    JsonValue::Object(out)
}

/// Every occupied anchor, in linear order.
pub fn render_json_tiles(layer: &ItemLayer) -> JsonValue {
    let addressing = layer.addressing();
    let mut tiles = Vec::new();
    for (index, item) in layer.tiles().iter().enumerate() {
        if !item.is_root() {
            continue;
        }
        let Ok((x, y)) = addressing.coordinates_of(index) else {
            continue;
        };
        tiles.push(item_to_json(item, x, y));
    }
    JsonValue::Array(tiles)
}

pub fn item_to_json(item: &Item, x: usize, y: usize) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("x".to_string(), JsonValue::from(x));
    out.insert("y".to_string(), JsonValue::from(y));
    out.insert(
        "item_id".to_string(),
        JsonValue::String(format!("0x{:04X}", item.item_id)),
    );
    out.insert(
        "rotation".to_string(),
        JsonValue::from(item.rotation().raw()),
    );
    out.insert("count".to_string(), JsonValue::from(item.count()));
    out.insert("buried".to_string(), JsonValue::Bool(item.is_buried()));
    JsonValue::Object(out)
}

pub fn permission_to_json(permission: PlacedItemPermission, x: usize, y: usize) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("x".to_string(), JsonValue::from(x));
    out.insert("y".to_string(), JsonValue::from(y));
    out.insert(
        "permission".to_string(),
        JsonValue::String(permission.as_str().to_string()),
    );
    JsonValue::Object(out)
}
