//! Rectangular progress regions.

use crate::util::{Point, Size, normalize_drag};
use serde::{Deserialize, Serialize};

/// A drawn rectangle marking a completed area.
///
/// The rectangle is kept in the pixel space of the rendering surface it was
/// drawn on, together with that surface's base size, so exporters can map it
/// onto a raster of any resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Base size of the surface the region was captured against
    pub surface: Size,
}

impl Region {
    pub fn new(x: f64, y: f64, w: f64, h: f64, surface: Size) -> Self {
        Self {
            x,
            y,
            w,
            h,
            surface,
        }
    }

    /// Builds the candidate rectangle for a drag from `start` to `end`.
    pub fn from_drag(start: Point, end: Point, surface: Size) -> Self {
        let (x, y, w, h) = normalize_drag(start, end);
        Self::new(x, y, w, h, surface)
    }

    /// True if the rectangle is finite, has non-negative extent and a usable capture surface.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite())
            && self.w >= 0.0
            && self.h >= 0.0
            && !self.surface.is_empty()
    }

    /// Maps the rectangle onto a raster of `width` x `height` pixels.
    ///
    /// Returns `None` when the capture surface has no area.
    pub fn scaled_to(&self, width: f64, height: f64) -> Option<(f64, f64, f64, f64)> {
        if self.surface.is_empty() {
            return None;
        }
        let sx = width / self.surface.width;
        let sy = height / self.surface.height;
        Some((self.x * sx, self.y * sy, self.w * sx, self.h * sy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_drag_is_normalized() {
        let region = Region::from_drag(
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
            Size::new(100.0, 100.0),
        );
        assert_eq!((region.x, region.y, region.w, region.h), (5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn validity_requires_extent_and_surface() {
        let surface = Size::new(100.0, 50.0);
        assert!(Region::new(1.0, 1.0, 0.0, 5.0, surface).is_valid());
        assert!(!Region::new(1.0, 1.0, -3.0, 5.0, surface).is_valid());
        assert!(!Region::new(f64::NAN, 1.0, 3.0, 5.0, surface).is_valid());
        assert!(!Region::new(1.0, 1.0, 3.0, 5.0, Size::new(0.0, 50.0)).is_valid());
    }

    #[test]
    fn scales_to_export_raster() {
        let region = Region::new(10.0, 20.0, 30.0, 40.0, Size::new(200.0, 100.0));
        let scaled = region.scaled_to(1000.0, 500.0).unwrap();
        assert_eq!(scaled, (50.0, 100.0, 150.0, 200.0));
    }

    #[test]
    fn empty_surface_cannot_scale() {
        let region = Region::new(1.0, 1.0, 1.0, 1.0, Size::default());
        assert!(region.scaled_to(10.0, 10.0).is_none());
    }
}
