//! End-to-end editing scenarios through the public API: session edits,
//! preview descriptors, bake and the save flow with the real codec.

use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use lensbake::adjust::Adjustment;
use lensbake::export::{EditRecord, to_data_url};
use lensbake::filters::FilterCatalog;
use lensbake::imaging::{
    BakeOptions, ExportFormat, ExportParams, RustCodec, SourceImage, bake, save_edit,
};
use lensbake::pipeline::build_color_pipeline;
use lensbake::session::EditSession;

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .unwrap();
    out.into_inner()
}

fn quadrants(size: u32) -> RgbaImage {
    let half = size / 2;
    RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
        (true, true) => Rgba([255, 0, 0, 255]),
        (false, true) => Rgba([0, 255, 0, 255]),
        (true, false) => Rgba([0, 0, 255, 255]),
        (false, false) => Rgba([255, 255, 0, 255]),
    })
}

#[test]
fn preview_and_bake_share_the_colour_pipeline() {
    let catalog = FilterCatalog::default();
    let mut session = EditSession::new("p1", "https://photos.example/p1.jpg");
    session.select_filter(Some("warm".into()));
    session.set_adjustment(Adjustment::Brightness, 10);
    session.set_adjustment(Adjustment::Contrast, -10);
    session.set_adjustment(Adjustment::Temperature, 20);

    let preview = session.preview(&catalog);
    assert_eq!(
        preview.color.to_css(),
        "sepia(0.3) saturate(1.4) brightness(1.1) contrast(0.9) sepia(0.2)"
    );

    let snapshot = session.snapshot();
    assert_eq!(
        build_color_pipeline(&snapshot.adjustments, &catalog),
        preview.color
    );
}

#[test]
fn rotated_flipped_png_export_keeps_quadrants() {
    let mut session = EditSession::new("q", "q.png");
    session.rotate_90();
    session.toggle_flip();

    let params = ExportParams {
        format: ExportFormat::Png,
        ..ExportParams::default()
    };
    let saved = save_edit(
        &RustCodec::new(),
        &png_bytes(&quadrants(8)),
        "q.png",
        &session.snapshot(),
        &FilterCatalog::default(),
        &params,
    )
    .unwrap();

    let out = image::load_from_memory(&saved.bytes).unwrap().into_rgba8();
    assert_eq!(out.dimensions(), (8, 8));
    // flip: red ↔ green on top; then 90° clockwise: the mirrored bottom-left
    // (yellow) ends up top-left
    assert_eq!(out.get_pixel(0, 0).0, [255, 255, 0, 255]);
    assert_eq!(out.get_pixel(7, 0).0, [0, 255, 0, 255]);
    assert_eq!(out.get_pixel(7, 7).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(0, 7).0, [0, 0, 255, 255]);

    assert_eq!(saved.record.crop_data.rotation, 90);
    assert!(saved.record.crop_data.flip_x);
}

#[test]
fn jpeg_export_is_a_data_url_and_digest() {
    let session = EditSession::new("j", "j.png");
    let saved = save_edit(
        &RustCodec::new(),
        &png_bytes(&quadrants(16)),
        "j.png",
        &session.snapshot(),
        &FilterCatalog::default(),
        &ExportParams::default(),
    )
    .unwrap();

    assert_eq!(saved.format, ExportFormat::Jpeg);
    assert!(saved.data_url().starts_with("data:image/jpeg;base64,/9j/"));
    assert_eq!(saved.data_url(), to_data_url(ExportFormat::Jpeg, &saved.bytes));
    assert_eq!(saved.digest.len(), 64);
}

#[test]
fn saved_record_rebakes_identically() {
    let catalog = FilterCatalog::default();
    let source = SourceImage::new("src", quadrants(12));

    let mut session = EditSession::new("r", "src");
    session.select_filter(Some("dramatic".into()));
    session.set_adjustment(Adjustment::Saturation, -30);
    session.set_adjustment(Adjustment::Sharpness, 20);
    session.set_rotation(-90);

    let snapshot = session.snapshot();
    let first = bake(
        &source,
        &snapshot.adjustments,
        &snapshot.crop,
        &catalog,
        &BakeOptions::default(),
    )
    .unwrap();

    let json = serde_json::to_string(&EditRecord::new(&snapshot.adjustments, &snapshot.crop)).unwrap();
    let record: EditRecord = serde_json::from_str(&json).unwrap();
    let (adjustments, crop) = record.to_state().unwrap();
    let second = bake(&source, &adjustments, &crop, &catalog, &BakeOptions::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn session_resets_after_save() {
    let mut session = EditSession::new("s", "s.png");
    session.set_adjustment(Adjustment::Brightness, 40);
    session.rotate_90();

    save_edit(
        &RustCodec::new(),
        &png_bytes(&quadrants(4)),
        "s.png",
        &session.snapshot(),
        &FilterCatalog::default(),
        &ExportParams::default(),
    )
    .unwrap();
    session.reset();

    assert!(session.adjustments().is_identity());
    assert_eq!(session.crop().rotation(), 0);
    assert!(session.preview(&FilterCatalog::default()).filter_css().is_empty());
}

#[test]
fn brightness_saturates_at_white() {
    let source = SourceImage::new("grey", RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255])));
    let mut session = EditSession::new("b", "grey");
    session.set_adjustment(Adjustment::Brightness, 200);
    assert_eq!(session.adjustments().brightness(), 50);

    let snapshot = session.snapshot();
    let out = bake(
        &source,
        &snapshot.adjustments,
        &snapshot.crop,
        &FilterCatalog::default(),
        &BakeOptions::default(),
    )
    .unwrap();
    assert!(out.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}
