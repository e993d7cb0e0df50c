use super::*;
use crate::frame::RgbaFrame;
use std::sync::Arc;

const BACKGROUND: [u8; 4] = [0xe8, 0xdc, 0xd9, 255];

fn photo(color: [u8; 4]) -> Arc<RgbaFrame> {
    Arc::new(RgbaFrame::filled(40, 30, color))
}

fn scene() -> SceneGraph {
    SceneGraph::new(800, 800, BACKGROUND)
}

#[test]
fn test_add_image_defaults() {
    let mut scene = scene();
    let id = scene.add_image(photo([255, 0, 0, 255]), None, None);

    assert_eq!(scene.item_count(), 1);
    assert_eq!(scene.active_id(), Some(id));

    let item = &scene.items()[0];
    assert_eq!(item.scale, DEFAULT_IMAGE_SCALE);
    // Scatter band keeps default placements inside the central region
    assert!(item.x >= 100.0 && item.x <= 500.0);
    assert!(item.y >= 100.0 && item.y <= 500.0);
}

#[test]
fn test_add_sticker_near_center() {
    let mut scene = scene();
    scene.add_sticker("★");

    let item = &scene.items()[0];
    assert!(item.x >= 350.0 && item.x <= 450.0);
    assert!(item.y >= 350.0 && item.y <= 450.0);
    match &item.content {
        ItemContent::Glyph { glyph, font_size } => {
            assert_eq!(glyph, "★");
            assert_eq!(*font_size, STICKER_FONT_SIZE);
        }
        _ => panic!("expected glyph item"),
    }
}

#[test]
fn test_grid2x2_drops_items_beyond_capacity() {
    let mut scene = scene();
    let frames: Vec<_> = (0..6).map(|i| photo([i as u8 * 40, 0, 0, 255])).collect();

    let placed = scene.apply_layout(LayoutKind::Grid2x2, &frames);

    assert_eq!(placed, 4);
    assert_eq!(scene.item_count(), 4);
}

#[test]
fn test_grid3x3_drops_items_beyond_capacity() {
    let mut scene = scene();
    let frames: Vec<_> = (0..12).map(|i| photo([0, i as u8 * 20, 0, 255])).collect();

    let placed = scene.apply_layout(LayoutKind::Grid3x3, &frames);

    assert_eq!(placed, 9);
    assert_eq!(scene.item_count(), 9);
}

#[test]
fn test_layout_clears_previous_items() {
    let mut scene = scene();
    scene.add_sticker("♥");
    scene.add_image(photo([1, 2, 3, 255]), None, None);

    let frames = vec![photo([9, 9, 9, 255])];
    scene.apply_layout(LayoutKind::Grid2x2, &frames);

    assert_eq!(scene.item_count(), 1);
    assert_eq!(scene.active_id(), None);
}

#[test]
fn test_unknown_layout_is_a_no_op() {
    let mut scene = scene();
    scene.add_image(photo([1, 2, 3, 255]), Some((10.0, 10.0)), None);

    let frames = vec![photo([4, 5, 6, 255]), photo([7, 8, 9, 255])];
    scene.apply_layout_named("hexagon-swirl", &frames);

    // Canvas untouched: still the one original item
    assert_eq!(scene.item_count(), 1);
    assert_eq!(scene.items()[0].x, 10.0);
}

#[test]
fn test_scrapbook_applies_cycling_tilts() {
    let mut scene = scene();
    let frames: Vec<_> = (0..9).map(|_| photo([50, 50, 50, 255])).collect();

    scene.apply_layout(LayoutKind::Scrapbook, &frames);

    let rotations: Vec<f32> = scene.items().iter().map(|i| i.rotation_deg).collect();
    assert_eq!(rotations[0], -8.0);
    assert_eq!(rotations[1], 5.0);
    assert_eq!(rotations[8], -8.0);
}

#[test]
fn test_transform_rotate_steps_by_fifteen_degrees() {
    let mut scene = scene();
    scene.add_image(photo([1, 1, 1, 255]), Some((0.0, 0.0)), None);

    assert_eq!(
        scene.transform_active(TransformOp::RotateStep),
        TransformOutcome::Applied
    );
    assert_eq!(scene.items()[0].rotation_deg, 15.0);

    scene.transform_active(TransformOp::RotateStep);
    assert_eq!(scene.items()[0].rotation_deg, 30.0);
}

#[test]
fn test_transform_without_selection_reports_nothing_selected() {
    let mut scene = scene();
    scene.add_image(photo([1, 1, 1, 255]), None, None);
    scene.deselect();

    assert_eq!(
        scene.transform_active(TransformOp::RotateStep),
        TransformOutcome::NothingSelected
    );
    assert_eq!(
        scene.transform_active(TransformOp::Delete),
        TransformOutcome::NothingSelected
    );
    assert_eq!(scene.item_count(), 1);
}

#[test]
fn test_transform_delete_removes_selected_item() {
    let mut scene = scene();
    scene.add_image(photo([1, 1, 1, 255]), None, None);
    let second = scene.add_image(photo([2, 2, 2, 255]), None, None);

    assert_eq!(scene.active_id(), Some(second));
    scene.transform_active(TransformOp::Delete);

    assert_eq!(scene.item_count(), 1);
    assert_eq!(scene.active_id(), None);
}

#[test]
fn test_hit_test_returns_topmost_item() {
    let mut scene = scene();
    let bottom = scene.add_image(photo([1, 1, 1, 255]), Some((100.0, 100.0)), Some(1.0));
    let top = scene.add_image(photo([2, 2, 2, 255]), Some((110.0, 110.0)), Some(1.0));

    // Overlap region belongs to the later (topmost) item
    assert_eq!(scene.hit_test(115.0, 115.0), Some(top));
    // Outside the top item but inside the bottom one
    assert_eq!(scene.hit_test(101.0, 101.0), Some(bottom));
    assert_eq!(scene.hit_test(700.0, 700.0), None);
}

#[test]
fn test_clear_empties_canvas() {
    let mut scene = scene();
    scene.add_image(photo([1, 1, 1, 255]), None, None);
    scene.add_sticker("✿");

    scene.clear();

    assert_eq!(scene.item_count(), 0);
    assert_eq!(scene.active_id(), None);
}

#[test]
fn test_flatten_dimensions_respect_multiplier() {
    let mut scene = scene();
    scene.add_image(photo([200, 10, 10, 255]), Some((50.0, 50.0)), Some(0.5));

    let backend = RasterBackend::new();
    let raster = scene
        .flatten(&backend, FlattenOptions { multiplier: 2 })
        .unwrap();

    assert_eq!(raster.width, 1600);
    assert_eq!(raster.height, 1600);
}

#[test]
fn test_flatten_paints_background_and_items() {
    let mut scene = scene();
    scene.add_image(photo([200, 10, 10, 255]), Some((100.0, 100.0)), Some(1.0));

    let backend = RasterBackend::new();
    let raster = scene
        .flatten(&backend, FlattenOptions { multiplier: 1 })
        .unwrap();

    // Empty corner shows the background
    assert_eq!(raster.pixel(5, 5), BACKGROUND);
    // Center of the placed image shows the photo
    assert_eq!(raster.pixel(120, 115), [200, 10, 10, 255]);
}

#[test]
fn test_flatten_deselects_active_item() {
    let mut scene = scene();
    scene.add_image(photo([1, 1, 1, 255]), None, None);
    assert!(scene.active_id().is_some());

    let backend = RasterBackend::new();
    scene.flatten(&backend, FlattenOptions::default()).unwrap();

    assert_eq!(scene.active_id(), None);
}

#[test]
fn test_flatten_without_font_skips_glyphs_gracefully() {
    let mut scene = scene();
    scene.add_sticker("♥");

    let backend = RasterBackend::new();
    let raster = scene.flatten(&backend, FlattenOptions { multiplier: 1 });

    assert!(raster.is_ok());
}
