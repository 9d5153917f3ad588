//! Viewport management for pan and zoom.
//!
//! The viewport maps the fixed device panel onto the logical image. A device
//! pixel `(sx, sy)` shows logical pixel `(floor(pan_x + sx*scale),
//! floor(pan_y + sy*scale))`, so `scale` is logical pixels per device pixel:
//! 1.0 is native size and larger values show more of the image.

use rle_common::{Point, Rect, DEVICE_HEIGHT, DEVICE_WIDTH, LINE_WIDTH};
use std::fmt;
use tracing::{debug, trace};

/// Smallest scale; one logical pixel per device pixel.
const MIN_SCALE: f64 = 1.0;

/// Configuration for viewport behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Scale at startup, clamped into range
    pub initial_scale: f64,
    /// Pan distance per step in device pixels
    pub pan_step: u32,
    /// Scale increment per zoom step
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_scale: 4.0,
            pan_step: 16,
            zoom_step: 0.25,
        }
    }
}

/// Current pan offset and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoomState {
    /// Logical column shown at device column 0
    pub pan_x: i64,
    /// Logical row shown at device row 0
    pub pan_y: i64,
    /// Logical pixels per device pixel
    pub scale: f64,
}

impl Default for PanZoomState {
    fn default() -> Self {
        Self {
            pan_x: 0,
            pan_y: 0,
            scale: MIN_SCALE,
        }
    }
}

impl fmt::Display for PanZoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "View(pan={},{}, scale={:.2})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

/// Pan/zoom state bound to one image size.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    total_width: usize,
    total_height: usize,
    max_scale: f64,
    state: PanZoomState,
    dirty: bool,
}

impl Viewport {
    /// Create a viewport over an image of `total_width` x `total_height`
    /// logical pixels, positioned at the top-left corner.
    pub fn new(config: ViewportConfig, total_width: usize, total_height: usize) -> Self {
        let max_scale = Self::max_scale_for(total_width, total_height);
        let scale = config.initial_scale.clamp(MIN_SCALE, max_scale);
        debug!(
            "Creating viewport for {}x{} image: scale {:.2} (max {:.2})",
            total_width, total_height, scale, max_scale
        );
        let mut viewport = Self {
            config,
            total_width,
            total_height,
            max_scale,
            state: PanZoomState {
                pan_x: 0,
                pan_y: 0,
                scale,
            },
            dirty: true,
        };
        viewport.clamp_pan();
        viewport
    }

    /// Largest scale at which the device still fits inside the image in
    /// both axes, never below 1.0.
    pub fn max_scale_for(total_width: usize, total_height: usize) -> f64 {
        let fit_x = total_width as f64 / LINE_WIDTH as f64;
        let fit_y = total_height as f64 / DEVICE_HEIGHT as f64;
        fit_x.min(fit_y).max(MIN_SCALE)
    }

    /// Get the configuration
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Get the current pan/zoom state
    pub fn state(&self) -> &PanZoomState {
        &self.state
    }

    /// Current scale
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Upper bound on scale for this image
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Image size in logical pixels
    pub fn image_size(&self) -> (usize, usize) {
        (self.total_width, self.total_height)
    }

    /// Largest pan offsets that keep the device inside the image.
    pub fn max_pan(&self) -> (i64, i64) {
        let scale = self.state.scale;
        let span_x = (DEVICE_WIDTH as f64 * scale).ceil() as i64;
        let span_y = (DEVICE_HEIGHT as f64 * scale).ceil() as i64;
        (
            (self.total_width as i64 - span_x).max(0),
            (self.total_height as i64 - span_y).max(0),
        )
    }

    /// Pan by whole steps; each step moves `pan_step * scale` logical pixels.
    ///
    /// Returns true if the view moved.
    pub fn pan_by(&mut self, steps_x: i32, steps_y: i32) -> bool {
        if steps_x == 0 && steps_y == 0 {
            return false;
        }
        let step = f64::from(self.config.pan_step) * self.state.scale;
        let before = self.state;
        self.state.pan_x = (self.state.pan_x as f64 + f64::from(steps_x) * step) as i64;
        self.state.pan_y = (self.state.pan_y as f64 + f64::from(steps_y) * step) as i64;
        self.clamp_pan();
        trace!("Pan by ({}, {}) steps: {}", steps_x, steps_y, self.state);
        self.commit(before)
    }

    /// Move the pan offset to an absolute position, clamped.
    pub fn set_pan(&mut self, pan_x: i64, pan_y: i64) -> bool {
        let before = self.state;
        self.state.pan_x = pan_x;
        self.state.pan_y = pan_y;
        self.clamp_pan();
        self.commit(before)
    }

    /// Magnify: one step towards scale 1.0.
    pub fn zoom_in(&mut self) -> bool {
        self.set_scale(self.state.scale - self.config.zoom_step)
    }

    /// Show more of the image: one step towards `max_scale`.
    pub fn zoom_out(&mut self) -> bool {
        self.set_scale(self.state.scale + self.config.zoom_step)
    }

    /// Change scale, keeping the previous visual center in place.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        let new_scale = scale.clamp(MIN_SCALE, self.max_scale);
        if new_scale == self.state.scale {
            trace!("Scale already at {:.2}", new_scale);
            return false;
        }

        let before = self.state;
        let old_scale = before.scale;
        let center_x = before.pan_x as f64 + DEVICE_WIDTH as f64 * old_scale / 2.0;
        let center_y = before.pan_y as f64 + DEVICE_HEIGHT as f64 * old_scale / 2.0;

        self.state.scale = new_scale;
        self.state.pan_x = (center_x - DEVICE_WIDTH as f64 * new_scale / 2.0).floor() as i64;
        self.state.pan_y = (center_y - DEVICE_HEIGHT as f64 * new_scale / 2.0).floor() as i64;
        self.clamp_pan();

        debug!(
            "Scale {:.2} -> {:.2}, center ({:.1}, {:.1})",
            old_scale, new_scale, center_x, center_y
        );
        self.commit(before)
    }

    /// Pull the pan offset back inside `[0, max_pan]`.
    pub fn clamp_pan(&mut self) {
        let (max_x, max_y) = self.max_pan();
        self.state.pan_x = self.state.pan_x.clamp(0, max_x);
        self.state.pan_y = self.state.pan_y.clamp(0, max_y);
    }

    /// Logical pixel shown at device point `point`.
    pub fn device_to_logical(&self, point: Point) -> Point {
        let scale = self.state.scale;
        Point::new(
            (self.state.pan_x as f64 + f64::from(point.x) * scale).floor() as i32,
            (self.state.pan_y as f64 + f64::from(point.y) * scale).floor() as i32,
        )
    }

    /// Logical rectangle covered by the device, cropped to the image.
    pub fn visible_rect(&self) -> Rect {
        let scale = self.state.scale;
        let width = ((DEVICE_WIDTH as f64 * scale).ceil() as i64)
            .min(self.total_width as i64 - self.state.pan_x)
            .max(0);
        let height = ((DEVICE_HEIGHT as f64 * scale).ceil() as i64)
            .min(self.total_height as i64 - self.state.pan_y)
            .max(0);
        Rect::new(
            self.state.pan_x as i32,
            self.state.pan_y as i32,
            width as u32,
            height as u32,
        )
    }

    /// Check if the viewport needs a repaint
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the viewport as painted
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn commit(&mut self, before: PanZoomState) -> bool {
        let changed = self.state != before;
        if changed {
            self.dirty = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: usize, height: usize) -> Viewport {
        let config = ViewportConfig {
            initial_scale: 1.0,
            ..ViewportConfig::default()
        };
        Viewport::new(config, width, height)
    }

    #[test]
    fn test_max_scale() {
        assert_eq!(Viewport::max_scale_for(1280, 480), 2.0);
        assert_eq!(Viewport::max_scale_for(1280, 960), 4.0);
        assert_eq!(Viewport::max_scale_for(320, 100), 1.0);
    }

    #[test]
    fn test_initial_scale_is_clamped() {
        let vp = Viewport::new(ViewportConfig::default(), 1280, 480);
        assert_eq!(vp.scale(), 2.0);
        assert!(vp.is_dirty());

        let vp = Viewport::new(ViewportConfig::default(), 1280, 960);
        assert_eq!(vp.scale(), 4.0);
        assert_eq!(vp.max_pan(), (0, 0));
    }

    #[test]
    fn test_clamp_exact_at_native_scale() {
        let mut vp = viewport(1280, 480);
        assert!(vp.set_pan(10_000, 10_000));
        assert_eq!(vp.state().pan_x, 1280 - 320);
        assert_eq!(vp.state().pan_y, 480 - 240);

        assert!(vp.set_pan(-5, -5));
        assert_eq!((vp.state().pan_x, vp.state().pan_y), (0, 0));
    }

    #[test]
    fn test_pan_steps_scale_with_zoom() {
        let mut vp = viewport(1280, 960);
        assert!(vp.pan_by(1, 0));
        assert_eq!(vp.state().pan_x, 16);

        vp.set_scale(2.0);
        vp.set_pan(0, 0);
        assert!(vp.pan_by(0, 1));
        assert_eq!(vp.state().pan_y, 32);
    }

    #[test]
    fn test_pan_against_edge_is_not_a_change() {
        let mut vp = viewport(1280, 480);
        vp.mark_clean();
        assert!(!vp.pan_by(-1, -1));
        assert!(!vp.is_dirty());
        assert!(!vp.pan_by(0, 0));
    }

    #[test]
    fn test_zoom_recenters() {
        let mut vp = viewport(1280, 960);
        vp.set_pan(400, 300);
        // Center (560, 420) at scale 1.0.
        assert!(vp.zoom_out());
        let state = *vp.state();
        assert_eq!(state.scale, 1.25);
        assert_eq!(state.pan_x, (560.0f64 - 200.0).floor() as i64);
        assert_eq!(state.pan_y, (420.0f64 - 150.0).floor() as i64);

        assert!(vp.zoom_in());
        assert_eq!(vp.state().scale, 1.0);
        assert_eq!((vp.state().pan_x, vp.state().pan_y), (400, 300));
    }

    #[test]
    fn test_zoom_limits() {
        let mut vp = viewport(640, 480);
        assert!(!vp.zoom_in());
        for _ in 0..10 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale(), 2.0);
        assert!(!vp.zoom_out());
        assert_eq!(vp.max_pan(), (0, 0));
    }

    #[test]
    fn test_small_image_never_pans() {
        let mut vp = viewport(320, 100);
        assert_eq!(vp.max_pan(), (0, 0));
        assert!(!vp.pan_by(3, 3));
        assert_eq!(vp.visible_rect(), Rect::new(0, 0, 320, 100));
    }

    #[test]
    fn test_device_to_logical() {
        let mut vp = viewport(1280, 960);
        vp.set_scale(1.5);
        vp.set_pan(10, 20);
        assert_eq!(vp.device_to_logical(Point::new(0, 0)), Point::new(10, 20));
        assert_eq!(vp.device_to_logical(Point::new(3, 1)), Point::new(14, 21));
    }

    #[test]
    fn test_display() {
        let state = PanZoomState {
            pan_x: 16,
            pan_y: 0,
            scale: 1.25,
        };
        assert_eq!(state.to_string(), "View(pan=16,0, scale=1.25)");
    }
}
