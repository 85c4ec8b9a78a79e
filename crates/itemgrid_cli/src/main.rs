use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use itemgrid_core::{
    Addressing, ErrorCode, GridError, Item, ItemLayer, ItemSizeTable, PlacedItemPermission, Rect,
    Rotation, TileOrder,
};
use itemgrid_render::{
    TextRenderOptions, item_to_json, permission_to_json, render_json_summary, render_json_tiles,
    render_summary_text, render_text_map,
};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GridArgs {
    #[arg(value_name = "ITEMS.BIN")]
    path: PathBuf,
    #[arg(long)]
    width: usize,
    #[arg(long)]
    height: usize,
    #[arg(long = "column-major")]
    column_major: bool,
    #[arg(long, value_name = "SIZES.json")]
    sizes: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long = "item", value_name = "ID", value_parser = parse_item_id)]
    item_id: u16,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    rotation: u8,
    #[arg(long, default_value_t = 0)]
    count: u16,
}

impl ItemArgs {
    fn to_item(&self) -> Item {
        Item::new(self.item_id)
            .with_rotation(Rotation::from_raw(self.rotation))
            .with_count(self.count)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print tile counts for a dump.
    Info {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Draw the map: `.` empty, `#` item, `+` extension.
    Show {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        ruler: bool,
    },
    /// Check whether an item fits at a coordinate.
    Check {
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        item: ItemArgs,
        #[arg(long)]
        x: usize,
        #[arg(long)]
        y: usize,
    },
    /// Place an item and write the edited dump.
    Place {
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        item: ItemArgs,
        #[arg(long)]
        x: usize,
        #[arg(long)]
        y: usize,
        #[arg(long)]
        output: PathBuf,
    },
    /// Remove the item covering a coordinate and write the edited dump.
    Remove {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        x: usize,
        #[arg(long)]
        y: usize,
        #[arg(long)]
        output: PathBuf,
    },
    /// Delete every tile (or every tile with one item id) in a rectangle.
    ClearRegion {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        x: usize,
        #[arg(long)]
        y: usize,
        #[arg(long = "region-width")]
        region_width: usize,
        #[arg(long = "region-height")]
        region_height: usize,
        #[arg(long = "item", value_name = "ID", value_parser = parse_item_id)]
        item_id: Option<u16>,
        #[arg(long)]
        output: PathBuf,
    },
}

fn parse_item_id(raw: &str) -> Result<u16, String> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => raw.parse::<u16>(),
    }
    .map_err(|e| format!("invalid item id {raw:?}: {e}"))?;

    if parsed == Item::NONE || parsed == Item::EXTENSION {
        return Err(format!("item id 0x{parsed:04X} is reserved"));
    }
    Ok(parsed)
}

/// Coordinates outside the grid come from the command line, so they are
/// usage errors; everything else is a failure on the dump itself.
fn exit_code(err: &GridError) -> i32 {
    match err.code() {
        ErrorCode::Bounds => 2,
        ErrorCode::Shape | ErrorCode::Io | ErrorCode::Parse => 1,
    }
}

fn fail(context: &str, err: GridError) -> ! {
    eprintln!("{context}: {err}");
    process::exit(exit_code(&err));
}

fn load_layer(grid: &GridArgs) -> ItemLayer {
    let addressing = Addressing::new(grid.width, grid.height).unwrap_or_else(|e| {
        eprintln!("Invalid grid dimensions: {e}");
        process::exit(2);
    });
    let order = if grid.column_major {
        TileOrder::ColumnMajor
    } else {
        TileOrder::RowMajor
    };

    let bytes = fs::read(&grid.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", grid.path.display());
        process::exit(1);
    });
    log::debug!("read {} bytes from {}", bytes.len(), grid.path.display());

    ItemLayer::from_bytes(&bytes, addressing.with_order(order)).unwrap_or_else(|e| {
        fail(&format!("Error loading item grid {}", grid.path.display()), e)
    })
}

fn load_sizes(grid: &GridArgs) -> ItemSizeTable {
    let Some(path) = grid.sizes.as_ref() else {
        return ItemSizeTable::new();
    };
    ItemSizeTable::load(path).unwrap_or_else(|e| {
        fail(&format!("Error loading item sizes from {}", path.display()), e)
    })
}

fn write_layer(layer: &ItemLayer, path: &Path) {
    fs::write(path, layer.dump_all()).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", path.display());
        process::exit(1);
    });
    log::info!("wrote {} bytes to {}", layer.byte_len(), path.display());
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Info { grid } => {
            let layer = load_layer(&grid);
            if grid.json {
                print_json(&render_json_summary(&layer));
            } else {
                print!("{}", render_summary_text(&layer));
            }
        }
        Command::Show { grid, ruler } => {
            let layer = load_layer(&grid);
            if grid.json {
                print_json(&render_json_tiles(&layer));
            } else {
                print!("{}", render_text_map(&layer, TextRenderOptions { ruler }));
            }
        }
        Command::Check { grid, item, x, y } => {
            let layer = load_layer(&grid);
            let sizes = load_sizes(&grid);
            let permission = layer.is_occupied(&item.to_item(), x, y, &sizes);
            if grid.json {
                print_json(&permission_to_json(permission, x, y));
            } else {
                println!("permission={}", permission.as_str());
            }
        }
        Command::Place {
            grid,
            item,
            x,
            y,
            output,
        } => {
            let mut layer = load_layer(&grid);
            let sizes = load_sizes(&grid);
            let permission = layer
                .place_item(&item.to_item(), x, y, &sizes)
                .unwrap_or_else(|e| fail("Error placing item", e));
            if permission != PlacedItemPermission::NoCollision {
                eprintln!(
                    "Cannot place item 0x{:04X} at ({x}, {y}): {}",
                    item.item_id,
                    permission.as_str()
                );
                process::exit(1);
            }
            write_layer(&layer, &output);
            if grid.json {
                print_json(&permission_to_json(permission, x, y));
            } else {
                println!("Wrote edited grid to {}", output.display());
            }
        }
        Command::Remove { grid, x, y, output } => {
            let mut layer = load_layer(&grid);
            let sizes = load_sizes(&grid);
            let anchor = layer
                .resolve_anchor(x, y)
                .unwrap_or_else(|e| fail("Error removing item", e));
            let removed = layer
                .remove_item(x, y, &sizes)
                .unwrap_or_else(|e| fail("Error removing item", e));
            write_layer(&layer, &output);

            match (removed, anchor) {
                (Some(item), Some((ax, ay))) if grid.json => {
                    let mut out = JsonMap::new();
                    out.insert("removed".to_string(), item_to_json(&item, ax, ay));
                    print_json(&JsonValue::Object(out));
                }
                (Some(item), Some((ax, ay))) => {
                    println!("removed=0x{:04X} at=({ax}, {ay})", item.item_id);
                }
                _ if grid.json => {
                    let mut out = JsonMap::new();
                    out.insert("removed".to_string(), JsonValue::Null);
                    print_json(&JsonValue::Object(out));
                }
                _ => println!("removed=none"),
            }
        }
        Command::ClearRegion {
            grid,
            x,
            y,
            region_width,
            region_height,
            item_id,
            output,
        } => {
            let mut layer = load_layer(&grid);
            let region = Rect::new(x, y, region_width, region_height);
            // An id filter also takes the item's extension markers.
            let removed = layer.remove_all(region, |tile| match item_id {
                Some(id) if tile.is_extension() => tile.extension_item_id() == id,
                Some(id) => tile.item_id == id,
                None => !tile.is_none(),
            });
            write_layer(&layer, &output);
            if grid.json {
                let mut out = JsonMap::new();
                out.insert("removed".to_string(), JsonValue::from(removed));
                print_json(&JsonValue::Object(out));
            } else {
                println!("removed={removed}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_item_id;

    #[test]
    fn item_ids_parse_as_hex_or_decimal() {
        assert_eq!(parse_item_id("0x00FF"), Ok(255));
        assert_eq!(parse_item_id("0X10"), Ok(16));
        assert_eq!(parse_item_id("300"), Ok(300));
        assert!(parse_item_id("0xFFFE").is_err());
        assert!(parse_item_id("65533").is_err());
        assert!(parse_item_id("banana").is_err());
    }
}
