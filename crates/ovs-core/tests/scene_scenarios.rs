//! Integration tests: bytes → decode → scene store.
//!
//! Exercises the store the way an editing session does: real encoded
//! images, overlays on top, templates from disk.

use image::{ImageFormat, Rgba, RgbaImage};
use ovs_core::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ─── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn add_and_select_text() {
    init_logs();
    let mut store = SceneStore::default();
    let overlay = store
        .add_text_overlay("SALE", 24.0, FontFamily::Arial, Color::BLACK)
        .expect("text overlay");
    let id = overlay.id();

    assert!((overlay.width() - 4.0 * 24.0 * 0.6).abs() < 1e-9);
    assert!((overlay.height() - 28.8).abs() < 1e-9);
    assert_eq!((overlay.x(), overlay.y()), (50.0, 50.0));
    assert_eq!(store.selected(), Some(id));
}

#[test]
fn image_overlay_clamp() {
    let mut store = SceneStore::default();
    let image = decode_image(&png(400, 100)).unwrap();
    let overlay = store.add_image_overlay(image, 200.0).expect("image overlay");
    assert_eq!(overlay.bounds(), Bounds::new(50.0, 50.0, 200.0, 25.0));
}

#[test]
fn delete_selected() {
    let mut store = SceneStore::default();
    let keep = store
        .add_text_overlay("keep", 20.0, FontFamily::CourierNew, Color::BLACK)
        .unwrap()
        .id();
    let x = store
        .add_text_overlay("drop", 20.0, FontFamily::Arial, Color::WHITE)
        .unwrap()
        .id();
    assert_eq!(store.selected(), Some(x));

    let removed = store.remove_selected().expect("selected overlay removed");
    assert_eq!(removed.id(), x);
    assert!(store.overlay(x).is_none());
    assert!(store.overlay(keep).is_some());
    assert_eq!(store.selected(), None);
    assert!(store.remove_selected().is_none());
}

#[test]
fn base_image_replace_resets_canvas() {
    init_logs();
    let mut store = SceneStore::default();
    assert_eq!(store.canvas_size(), None);

    store.load_base_image(&png(800, 600)).unwrap();
    assert_eq!(store.canvas_size(), Some((800, 600)));

    let id = store
        .add_text_overlay("hello", 30.0, FontFamily::TimesNewRoman, Color::BLACK)
        .unwrap()
        .id();
    store.move_overlay(id, 700.0, 550.0);

    store.load_base_image(&png(400, 300)).unwrap();
    assert_eq!(store.canvas_size(), Some((400, 300)));
    let overlay = store.overlay(id).unwrap();
    assert_eq!((overlay.x(), overlay.y()), (700.0, 550.0));
}

#[test]
fn decode_failure_preserves_state() {
    let mut store = SceneStore::default();
    store.load_base_image(&png(64, 48)).unwrap();
    let id = store
        .add_text_overlay("ok", 12.0, FontFamily::Arial, Color::BLACK)
        .unwrap()
        .id();

    let err = store.load_base_image(b"\x89PNG but not really").unwrap_err();
    assert!(matches!(err, DecodeError::Image(_)));
    assert_eq!(store.canvas_size(), Some((64, 48)));
    assert_eq!(store.overlays().len(), 1);
    assert_eq!(store.selected(), Some(id));
}

#[test]
fn ids_are_never_reused() {
    let mut store = SceneStore::default();
    let a = store
        .add_text_overlay("a", 12.0, FontFamily::Arial, Color::BLACK)
        .unwrap()
        .id();
    store.remove_overlay(a);
    let b = store
        .add_text_overlay("a", 12.0, FontFamily::Arial, Color::BLACK)
        .unwrap()
        .id();
    assert_ne!(a, b);
}

#[test]
fn configured_spawn_and_floor() {
    let config = EditorConfig::from_json(r#"{ "spawn_x": 5, "spawn_y": 7, "min_overlay_size": 10 }"#)
        .unwrap();
    let mut store = SceneStore::new(config);
    let id = store
        .add_image_overlay(decode_image(&png(20, 20)).unwrap(), 200.0)
        .unwrap()
        .id();
    assert_eq!(store.overlay(id).unwrap().bounds(), Bounds::new(5.0, 7.0, 20.0, 20.0));

    store.resize_overlay(id, 1.0, 1.0);
    assert_eq!(store.overlay(id).unwrap().bounds(), Bounds::new(5.0, 7.0, 10.0, 10.0));
}

// ─── Templates ───────────────────────────────────────────────────────────

#[test]
fn templates_share_pixels_across_overlays() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("badge.png"), png(40, 20)).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();

    let mut library = TemplateLibrary::new(dir.path());
    assert_eq!(library.names().unwrap(), vec!["badge".to_string()]);
    assert!(!library.is_cached("badge"));

    let first = library.load("badge").unwrap();
    let second = library.load("badge.png").unwrap();
    assert!(library.is_cached("badge"));
    assert_eq!(first.dimensions(), (40, 20));

    let mut store = SceneStore::default();
    let a = store.add_image_overlay(first, 200.0).unwrap().id();
    let b = store.add_image_overlay(second, 200.0).unwrap().id();

    let pixels = |id| match store.overlay(id).unwrap().kind() {
        OverlayKind::Image { image } => image.clone(),
        OverlayKind::Text { .. } => panic!("expected image overlay"),
    };
    let cached = library.load("badge").unwrap();
    assert!(pixels(a).shares_pixels(&cached));
    assert!(pixels(b).shares_pixels(&cached));
}

#[test]
fn template_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"garbage").unwrap();
    let mut library = TemplateLibrary::new(dir.path());

    assert!(matches!(
        library.load("../outside"),
        Err(AssetError::InvalidName(_))
    ));
    assert!(matches!(
        library.load("missing"),
        Err(AssetError::NotFound { .. })
    ));
    assert!(matches!(
        library.load("broken"),
        Err(AssetError::Decode { .. })
    ));
    assert!(!library.is_cached("broken"));
}
