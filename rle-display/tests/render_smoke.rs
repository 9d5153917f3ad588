//! Smoke tests for rle-display rendering
//!
//! These drive the viewport and compositor end to end against an in-memory
//! panel, without any real device attached.

use rle_codec::{ContextOptions, DecoderContext, Palette};
use rle_common::{Point, Rect, BACKGROUND};
use rle_display::{Compositor, FrameCapture, NullSink, Viewport, ViewportConfig};

/// 4 x 480 grid. Tile `c` of row `y` is split at pixel 160: the left half has
/// color `c`, the right half color `(y / 16) % 16`.
fn quartered_image() -> Vec<u8> {
    let mut data = Vec::new();
    for y in 0..480 {
        for c in 0..4u8 {
            data.extend(std::iter::repeat(0xF0 | c).take(10));
            data.extend(std::iter::repeat(0xF0 | ((y / 16) % 16) as u8).take(10));
        }
    }
    data
}

fn open_context() -> DecoderContext<Vec<u8>> {
    DecoderContext::open(quartered_image(), &ContextOptions::default()).unwrap()
}

#[test]
fn test_inferred_geometry_feeds_viewport() {
    let ctx = open_context();
    let geometry = *ctx.geometry();
    assert_eq!((geometry.cols, geometry.rows), (4, 480));

    let viewport = Viewport::new(
        ViewportConfig::default(),
        geometry.total_width(),
        geometry.total_height(),
    );
    // 1280 / 320 = 4, 480 / 240 = 2.
    assert_eq!(viewport.max_scale(), 2.0);
    assert_eq!(viewport.scale(), 2.0);
    assert_eq!(viewport.visible_rect(), Rect::new(0, 0, 640, 480));
}

#[test]
fn test_native_frame_matches_source() {
    let mut ctx = open_context();
    let mut viewport = Viewport::new(
        ViewportConfig {
            initial_scale: 1.0,
            ..ViewportConfig::default()
        },
        1280,
        480,
    );
    viewport.set_pan(320 + 100, 40);

    let mut compositor = Compositor::default();
    let mut screen = FrameCapture::new();
    let stats = compositor
        .render_frame(&mut ctx, viewport.state(), &mut screen)
        .unwrap();
    assert_eq!(stats.rows_drawn, 240);

    let palette = Palette::GRAYSCALE;
    for (x, y) in [(0, 0), (59, 10), (60, 10), (300, 239)] {
        let logical = viewport.device_to_logical(Point::new(x, y));
        let column = logical.x as usize / 320;
        let within = logical.x as usize % 320;
        let expected = if within < 160 {
            palette.color(column as u8)
        } else {
            palette.color(((logical.y / 16) % 16) as u8)
        };
        assert_eq!(
            screen.pixel(x as usize, y as usize),
            Some(expected),
            "device ({x}, {y})"
        );
    }
}

#[test]
fn test_pan_to_bottom_right_stays_inside() {
    let mut ctx = open_context();
    let mut viewport = Viewport::new(ViewportConfig::default(), 1280, 480);
    while viewport.pan_by(1, 1) {}
    let (max_x, max_y) = viewport.max_pan();
    assert_eq!((viewport.state().pan_x, viewport.state().pan_y), (max_x, max_y));

    let mut compositor = Compositor::default();
    let mut screen = FrameCapture::new();
    let stats = compositor
        .render_frame(&mut ctx, viewport.state(), &mut screen)
        .unwrap();
    assert_eq!(stats.rows_skipped, 0);
    // Bottom-right device pixel still lands on image data.
    assert_ne!(screen.pixel(319, 239), Some(BACKGROUND));
}

#[test]
fn test_repaint_resolves_every_row_again() {
    let mut ctx = open_context();
    let viewport = Viewport::new(ViewportConfig::default(), 1280, 480);
    let mut compositor = Compositor::default();
    let mut sink = NullSink::default();

    let stats = compositor
        .render_frame(&mut ctx, viewport.state(), &mut sink)
        .unwrap();
    assert_eq!(stats.rows_drawn, 240);
    // Scale 2.0 maps device row y to logical row 2y; every row is new.
    assert_eq!(stats.rows_decoded, 240);

    // A second repaint starts over at row 0; the 8-row cache only holds the
    // bottom of the previous frame, so every row is resolved again.
    let stats = compositor
        .render_frame(&mut ctx, viewport.state(), &mut sink)
        .unwrap();
    assert_eq!(stats.rows_decoded, 240);
    assert_eq!(sink.pushes, 4);
    let resolver = ctx.take_stats();
    assert_eq!((resolver.hits, resolver.misses), (0, 480));
}

#[test]
fn test_zoom_round_trip_returns_to_native() {
    let mut ctx = open_context();
    let mut viewport = Viewport::new(
        ViewportConfig {
            initial_scale: 1.0,
            ..ViewportConfig::default()
        },
        1280,
        480,
    );
    viewport.zoom_out();
    viewport.zoom_in();
    assert_eq!(viewport.scale(), 1.0);

    let mut compositor = Compositor::default();
    let mut sink = NullSink::default();
    let stats = compositor
        .render_frame(&mut ctx, viewport.state(), &mut sink)
        .unwrap();
    assert_eq!(stats.rows_decoded, 240);
}

#[test]
fn test_snapshot_png() {
    let mut ctx = open_context();
    let viewport = Viewport::new(ViewportConfig::default(), 1280, 480);
    let mut compositor = Compositor::default();
    let mut screen = FrameCapture::new();
    compositor
        .render_frame(&mut ctx, viewport.state(), &mut screen)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    screen.save_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
