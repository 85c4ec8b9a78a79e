use itemgrid_core::{Addressing, Item, ItemLayer, ItemSize, ItemSizeTable, Rect, Rotation};
use itemgrid_render::{
    TextRenderOptions, render_json_summary, render_json_tiles, render_text_map,
    render_text_region,
};

fn furnished_layer() -> ItemLayer {
    let mut sizes = ItemSizeTable::new();
    sizes.insert(0x0100, ItemSize::new(2, 2));
    let mut layer = ItemLayer::empty(Addressing::new(4, 4).expect("valid"));
    layer
        .place_item(&Item::new(0x0100), 1, 1, &sizes)
        .expect("placement");
    layer
        .place_item(
            &Item::new(0x0042).with_rotation(Rotation::Half).with_count(3),
            0,
            3,
            &sizes,
        )
        .expect("placement");
    layer
}

#[test]
fn text_map_marks_anchors_and_extensions() {
    let text = render_text_map(&furnished_layer(), TextRenderOptions::default());
    assert_eq!(text, "....\n.#+.\n.++.\n#...\n");
}

#[test]
fn text_region_with_ruler() {
    let text = render_text_region(
        &furnished_layer(),
        Rect::new(1, 1, 9, 2),
        TextRenderOptions { ruler: true },
    );
    assert_eq!(text, "    123\n  1 #+.\n  2 ++.\n");
}

#[test]
fn json_summary_uses_stable_key_order() {
    let value = render_json_summary(&furnished_layer());
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["width", "height", "order", "summary"]);
    assert_eq!(value["summary"]["items"], 2);
    assert_eq!(value["summary"]["extensions"], 3);
    assert_eq!(value["summary"]["empty"], 11);
    assert_eq!(value["order"], "RowMajor");
}

#[test]
fn json_tiles_list_anchors_only() {
    let value = render_json_tiles(&furnished_layer());
    let tiles = value.as_array().expect("json should be an array");
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0]["x"], 1);
    assert_eq!(tiles[0]["y"], 1);
    assert_eq!(tiles[0]["item_id"], "0x0100");
    assert_eq!(tiles[1]["item_id"], "0x0042");
    assert_eq!(tiles[1]["rotation"], 2);
    assert_eq!(tiles[1]["count"], 3);
}
