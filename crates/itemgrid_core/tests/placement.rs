use itemgrid_core::{
    Addressing, Item, ItemLayer, ItemSize, ItemSizeTable, PlacedItemPermission, Rotation,
};

const TABLE: u16 = 0x0100;
const BED: u16 = 0x0200;
const LAMP: u16 = 0x0300;
const FENCE: u16 = 0x0400;

fn sizes() -> ItemSizeTable {
    let mut sizes = ItemSizeTable::new();
    sizes.insert(TABLE, ItemSize::new(2, 2));
    sizes.insert(BED, ItemSize::new(2, 3));
    sizes.insert(FENCE, ItemSize::new(2, 1));
    sizes
}

fn grid(w: usize, h: usize) -> ItemLayer {
    ItemLayer::empty(Addressing::new(w, h).expect("valid dimensions"))
}

fn occupied_indices(layer: &ItemLayer) -> Vec<usize> {
    layer
        .tiles()
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_none())
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn two_by_two_at_one_one_on_four_by_four() {
    let sizes = sizes();
    let mut layer = grid(4, 4);
    let table = Item::new(TABLE);

    assert_eq!(
        layer.is_occupied(&table, 1, 1, &sizes),
        PlacedItemPermission::NoCollision
    );
    layer.set(1, 1, &table).expect("anchor in range");
    assert_eq!(
        layer
            .set_extension_tiles(&table, 1, 1, &sizes)
            .expect("anchor in range"),
        3
    );

    let bytes = layer.dump_all();
    assert_eq!(bytes.len(), 16 * Item::SIZE);
    let exported = ItemLayer::from_bytes(&bytes, *layer.addressing()).expect("same shape");
    assert_eq!(occupied_indices(&exported), vec![5, 6, 9, 10]);
    assert_eq!(exported.get(1, 1).expect("in range").item_id, TABLE);
    for (x, y) in [(2, 1), (1, 2), (2, 2)] {
        let ext = exported.get(x, y).expect("in range");
        assert!(ext.is_extension());
        assert_eq!(ext.extension_item_id(), TABLE);
        assert_eq!(
            (usize::from(ext.extension_x()), usize::from(ext.extension_y())),
            (x - 1, y - 1)
        );
    }
}

#[test]
fn single_cell_item_has_no_extension_tiles() {
    let sizes = sizes();
    let mut layer = grid(4, 4);
    let lamp = Item::new(LAMP);

    assert!(
        layer
            .extension_cells(&lamp, 3, 3, &sizes)
            .expect("anchor in range")
            .is_empty()
    );
    assert_eq!(
        layer
            .set_extension_tiles(&lamp, 3, 3, &sizes)
            .expect("anchor in range"),
        0
    );
    assert!(occupied_indices(&layer).is_empty());
}

#[test]
fn placement_then_removal_restores_empty_cells() {
    let sizes = sizes();
    let mut layer = grid(6, 6);
    let bed = Item::new(BED);

    let placed = layer.extension_cells(&bed, 2, 1, &sizes).expect("in range");
    layer.set(2, 1, &bed).expect("in range");
    assert_eq!(layer.set_extension_tiles(&bed, 2, 1, &sizes).expect("in range"), 5);

    let removed = layer.extension_cells(&bed, 2, 1, &sizes).expect("in range");
    assert_eq!(placed, removed);
    let coords: Vec<(usize, usize)> = placed.iter().map(|&(x, y, _, _)| (x, y)).collect();
    assert_eq!(coords, vec![(2, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);

    assert_eq!(layer.delete_extension_tiles(&bed, 2, 1, &sizes).expect("in range"), 5);
    layer.get_mut(2, 1).expect("in range").delete();
    assert_eq!(layer.summary().empty, 36);
}

#[test]
fn overflowing_footprint_is_clamped_for_both_directions() {
    let sizes = sizes();
    let mut layer = grid(4, 4);
    let bed = Item::new(BED);

    assert_eq!(layer.extension_footprint(&bed, 3, 2, &sizes), (1, 2));
    layer.set(3, 2, &bed).expect("in range");
    assert_eq!(layer.set_extension_tiles(&bed, 3, 2, &sizes).expect("in range"), 1);
    assert_eq!(occupied_indices(&layer), vec![11, 15]);

    assert_eq!(layer.delete_extension_tiles(&bed, 3, 2, &sizes).expect("in range"), 1);
    assert_eq!(occupied_indices(&layer), vec![11]);
}

#[test]
fn extension_tiles_require_an_anchor_on_the_grid() {
    let sizes = sizes();
    let mut layer = grid(4, 4);
    assert!(layer.set_extension_tiles(&Item::new(TABLE), 4, 0, &sizes).is_err());
    assert!(layer.delete_extension_tiles(&Item::new(TABLE), 0, 9, &sizes).is_err());
}

#[test]
fn rotation_swaps_the_extension_footprint() {
    let sizes = sizes();
    let layer = grid(6, 6);
    let bed = Item::new(BED).with_rotation(Rotation::Quarter);

    assert_eq!(layer.extension_footprint(&bed, 0, 0, &sizes), (3, 2));
    let bed = bed.with_rotation(Rotation::Half);
    assert_eq!(layer.extension_footprint(&bed, 0, 0, &sizes), (2, 3));
}

#[test]
fn validation_reports_out_of_bounds_on_unrotated_size() {
    let sizes = sizes();
    let layer = grid(4, 4);
    let fence = Item::new(FENCE);

    assert_eq!(
        layer.is_occupied(&fence, 3, 0, &sizes),
        PlacedItemPermission::OutOfBounds
    );
    assert_eq!(
        layer.is_occupied(&fence, 2, 3, &sizes),
        PlacedItemPermission::NoCollision
    );
    assert_eq!(
        layer.is_occupied(&Item::new(LAMP), 4, 4, &sizes),
        PlacedItemPermission::OutOfBounds
    );

    // A sideways 2x3 would fit as 3x2 on the last two rows, but the
    // unrotated height is checked first.
    let bed = Item::new(BED).with_rotation(Rotation::Quarter);
    assert_eq!(layer.extension_footprint(&bed, 0, 2, &sizes), (3, 2));
    assert_eq!(
        layer.is_occupied(&bed, 0, 2, &sizes),
        PlacedItemPermission::OutOfBounds
    );

    // The rotated footprint is still kept on the grid.
    let fence = fence.with_rotation(Rotation::ThreeQuarter);
    assert_eq!(
        layer.is_occupied(&fence, 0, 3, &sizes),
        PlacedItemPermission::OutOfBounds
    );
}

#[test]
fn validation_reports_collision_on_rotated_footprint() {
    let sizes = sizes();
    let mut layer = grid(5, 5);
    layer.set(0, 2, &Item::new(LAMP)).expect("in range");

    let fence = Item::new(FENCE);
    assert_eq!(
        layer.is_occupied(&fence, 0, 1, &sizes),
        PlacedItemPermission::NoCollision
    );
    let fence = fence.with_rotation(Rotation::Quarter);
    assert_eq!(
        layer.is_occupied(&fence, 0, 1, &sizes),
        PlacedItemPermission::Collision
    );
    assert_eq!(
        layer.is_occupied(&fence, 0, 2, &sizes),
        PlacedItemPermission::Collision
    );
}

#[test]
fn place_item_writes_nothing_unless_clear() {
    let sizes = sizes();
    let mut layer = grid(4, 4);
    let table = Item::new(TABLE);

    assert_eq!(
        layer.place_item(&table, 0, 0, &sizes).expect("placement"),
        PlacedItemPermission::NoCollision
    );
    let before = layer.clone();

    assert_eq!(
        layer.place_item(&table, 1, 1, &sizes).expect("placement"),
        PlacedItemPermission::Collision
    );
    assert_eq!(
        layer.place_item(&table, 3, 3, &sizes).expect("placement"),
        PlacedItemPermission::OutOfBounds
    );
    assert_eq!(layer, before);
    assert_eq!(layer.summary().roots, 1);
    assert_eq!(layer.summary().extensions, 3);
}

#[test]
fn any_cell_resolves_to_its_anchor() {
    let sizes = sizes();
    let mut layer = grid(6, 6);
    let bed = Item::new(BED).with_rotation(Rotation::Quarter);
    layer.place_item(&bed, 1, 2, &sizes).expect("placement");

    for x in 1..4 {
        for y in 2..4 {
            assert_eq!(layer.resolve_anchor(x, y).expect("in range"), Some((1, 2)));
        }
    }
    assert_eq!(layer.resolve_anchor(0, 0).expect("in range"), None);
    assert!(layer.resolve_anchor(6, 0).is_err());
}

#[test]
fn dangling_extension_marker_has_no_anchor() {
    let mut layer = grid(4, 4);
    let mut marker = Item::NO_ITEM;
    marker.set_as_extension(&Item::new(TABLE), 1, 1);
    layer.set(2, 2, &marker).expect("in range");
    assert_eq!(layer.resolve_anchor(2, 2).expect("in range"), None);

    layer.set(0, 0, &marker).expect("in range");
    assert_eq!(layer.resolve_anchor(0, 0).expect("in range"), None);
}

#[test]
fn remove_item_from_any_covered_cell() {
    let sizes = sizes();
    let mut layer = grid(5, 5);
    let bed = Item::new(BED).with_count(1);
    layer.place_item(&bed, 2, 2, &sizes).expect("placement");
    layer
        .place_item(&Item::new(LAMP), 0, 0, &sizes)
        .expect("placement");

    let removed = layer.remove_item(3, 4, &sizes).expect("in range");
    assert_eq!(removed, Some(bed));
    assert_eq!(occupied_indices(&layer), vec![0]);
    assert_eq!(layer.remove_item(3, 4, &sizes).expect("in range"), None);
}
