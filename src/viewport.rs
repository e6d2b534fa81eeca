//! Viewport transform: pan/zoom state and the screen <-> normalized mapping.
//!
//! The viewport displays the image at a fitted *surface base size* (the image
//! scaled to fit the host surface at zoom 1), then applies a uniform zoom and a
//! pan offset:
//!
//! ```text
//! screen = world * scale + pan_offset
//! world  = normalized / 100 * surface_base
//! ```
//!
//! Normalized coordinates are percentages of the original image, so they stay
//! valid across sessions, surface sizes and export resolutions.

use crate::config::ViewportConfig;
use crate::util::{NormalizedPoint, Point, Size};

/// Smallest zoom factor: the image never shrinks below its fitted baseline.
pub const MIN_SCALE: f64 = 1.0;

/// Transient pan/zoom state used only for on-screen display.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    pan_offset: Point,
    max_scale: f64,
    sensitivity: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

impl Viewport {
    /// Creates a viewport at scale 1 with no pan.
    pub fn new(max_scale: f64, sensitivity: f64) -> Self {
        Self {
            scale: MIN_SCALE,
            pan_offset: Point::default(),
            max_scale: max_scale.max(MIN_SCALE),
            sensitivity,
        }
    }

    pub fn from_config(config: &ViewportConfig) -> Self {
        Self::new(config.max_scale, config.zoom_sensitivity)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan_offset(&self) -> Point {
        self.pan_offset
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Zoom level as a whole percentage for UI chrome (100 = fitted).
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Multiplies the scale by `1 - delta * sensitivity`, clamped to `[1, max_scale]`.
    ///
    /// Positive deltas (wheel scrolled down) zoom out, negative deltas zoom in.
    /// Returning to scale 1 keeps the current pan offset.
    ///
    /// Returns `true` if the scale changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let factor = 1.0 - delta * self.sensitivity;
        let next = (self.scale * factor).clamp(MIN_SCALE, self.max_scale);
        if (next - self.scale).abs() < f64::EPSILON {
            return false;
        }
        log::debug!("Zoom {:.3} -> {:.3} (delta {delta})", self.scale, next);
        self.scale = next;
        true
    }

    /// Adds `(dx, dy)` screen pixels to the pan offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_offset.x += dx;
        self.pan_offset.y += dy;
    }

    /// Replaces the pan offset (used by drag gestures that track an anchor offset).
    pub fn set_pan_offset(&mut self, offset: Point) {
        self.pan_offset = offset;
    }

    /// Returns to scale 1 with no pan.
    pub fn reset(&mut self) {
        self.scale = MIN_SCALE;
        self.pan_offset = Point::default();
    }

    /// Inverts the displayed affine mapping: `(screen - pan_offset) / scale`.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_offset.x) / self.scale,
            (screen.y - self.pan_offset.y) / self.scale,
        )
    }

    /// Applies the displayed affine mapping: `world * scale + pan_offset`.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan_offset.x,
            world.y * self.scale + self.pan_offset.y,
        )
    }
}

/// Maps a screen point to normalized image percent.
///
/// Returns `None` if the surface base size has no area.
pub fn screen_to_normalized(
    screen: Point,
    viewport: &Viewport,
    surface_base: Size,
) -> Option<NormalizedPoint> {
    if surface_base.is_empty() {
        return None;
    }
    let world = viewport.screen_to_world(screen);
    Some(NormalizedPoint::new(
        world.x / surface_base.width * 100.0,
        world.y / surface_base.height * 100.0,
    ))
}

/// Maps normalized image percent to a screen point; exact inverse of [`screen_to_normalized`].
pub fn normalized_to_screen(
    point: NormalizedPoint,
    viewport: &Viewport,
    surface_base: Size,
) -> Option<Point> {
    if surface_base.is_empty() {
        return None;
    }
    let (wx, wy) = point.to_pixels(surface_base.width, surface_base.height);
    Some(viewport.world_to_screen(Point::new(wx, wy)))
}

/// Fits an image into a host surface preserving aspect ratio.
///
/// The result is the surface base size: the image's on-screen size at zoom 1,
/// anchored at the surface's top-left corner. Returns an empty size if either
/// input has no area.
pub fn fit_to_surface(image: Size, surface: Size) -> Size {
    if image.is_empty() || surface.is_empty() {
        return Size::default();
    }
    let ratio = (surface.width / image.width).min(surface.height / image.height);
    Size::new(image.width * ratio, image.height * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Size = Size::new(800.0, 400.0);

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn zoom_clamps_to_bounds() {
        let mut viewport = Viewport::new(8.0, 0.001);
        assert!(!viewport.zoom_by(500.0), "cannot zoom below fitted size");
        assert_eq!(viewport.scale(), 1.0);

        for _ in 0..100 {
            viewport.zoom_by(-500.0);
        }
        assert_eq!(viewport.scale(), 8.0);
        assert_eq!(viewport.zoom_percent(), 800);
    }

    #[test]
    fn zoom_multiplies_scale() {
        let mut viewport = Viewport::new(8.0, 0.001);
        assert!(viewport.zoom_by(-100.0));
        assert_close(viewport.scale(), 1.1);
        assert!(viewport.zoom_by(-100.0));
        assert_close(viewport.scale(), 1.21);
    }

    #[test]
    fn zoom_back_to_one_keeps_pan() {
        let mut viewport = Viewport::new(8.0, 0.001);
        viewport.zoom_by(-500.0);
        viewport.pan_by(30.0, -12.0);
        viewport.zoom_by(900.0);
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.pan_offset(), Point::new(30.0, -12.0));
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut viewport = Viewport::default();
        assert!(!viewport.zoom_by(f64::NAN));
        assert!(!viewport.zoom_by(f64::INFINITY));
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn screen_to_normalized_inverts_display_mapping() {
        let mut viewport = Viewport::new(8.0, 0.001);
        viewport.zoom_by(-1000.0); // scale 2.0
        viewport.pan_by(-100.0, 50.0);

        // World (400, 200) is the image centre; on screen it sits at 400*2-100, 200*2+50
        let p = screen_to_normalized(Point::new(700.0, 450.0), &viewport, BASE).unwrap();
        assert_close(p.x, 50.0);
        assert_close(p.y, 50.0);
    }

    #[test]
    fn round_trip_holds_for_reachable_states() {
        let mut viewport = Viewport::new(8.0, 0.001);
        let deltas = [-300.0, 120.0, -800.0, -50.0, 400.0, -2000.0, 10.0];
        let pans = [(15.0, -3.0), (-250.0, 80.5), (0.25, 0.75), (1000.0, -999.0)];
        let points = [
            NormalizedPoint::new(0.0, 0.0),
            NormalizedPoint::new(100.0, 100.0),
            NormalizedPoint::new(33.3, 66.6),
            NormalizedPoint::new(12.5, 99.9),
        ];

        for (i, delta) in deltas.iter().enumerate() {
            viewport.zoom_by(*delta);
            let (dx, dy) = pans[i % pans.len()];
            viewport.pan_by(dx, dy);

            for p in points {
                let screen = normalized_to_screen(p, &viewport, BASE).unwrap();
                let back = screen_to_normalized(screen, &viewport, BASE).unwrap();
                assert!((back.x - p.x).abs() < 1e-9);
                assert!((back.y - p.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn empty_surface_has_no_mapping() {
        let viewport = Viewport::default();
        assert!(screen_to_normalized(Point::new(1.0, 1.0), &viewport, Size::default()).is_none());
        assert!(
            normalized_to_screen(NormalizedPoint::new(1.0, 1.0), &viewport, Size::default())
                .is_none()
        );
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let fitted = fit_to_surface(Size::new(2000.0, 1000.0), Size::new(400.0, 400.0));
        assert_eq!(fitted, Size::new(400.0, 200.0));

        let tall = fit_to_surface(Size::new(500.0, 1000.0), Size::new(400.0, 400.0));
        assert_eq!(tall, Size::new(200.0, 400.0));
    }

    #[test]
    fn reset_returns_to_baseline() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(-700.0);
        viewport.pan_by(5.0, 5.0);
        viewport.reset();
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.pan_offset(), Point::default());
    }
}
