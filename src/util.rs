//! Geometry helpers shared by the viewport, the annotation model and the exporter.
//!
//! This module provides:
//! - Screen/surface points and sizes
//! - Normalized (percent of image) points
//! - Drag-rectangle normalization
//! - Color name lookup for configuration
//! - Filename component sanitizing

use crate::draw::{Color, color::*};
use serde::{Deserialize, Serialize};

// ============================================================================
// Points and Sizes
// ============================================================================

/// A point in screen or surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if the size has no usable area.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Position expressed as a percentage (0-100) of the original image's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if the point lies on the image (both axes within 0..=100).
    pub fn is_on_image(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }

    /// Converts to absolute pixel coordinates against a raster of the given size.
    pub fn to_pixels(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x / 100.0 * width, self.y / 100.0 * height)
    }
}

/// Normalizes a drag from `start` to `end` into `(x, y, w, h)` with non-negative extent.
///
/// Dragging in any direction yields the same rectangle: the origin is the
/// minimum corner and the extent is the absolute delta.
pub fn normalize_drag(start: Point, end: Point) -> (f64, f64, f64, f64) {
    (
        start.x.min(end.x),
        start.y.min(end.y),
        (end.x - start.x).abs(),
        (end.y - start.y).abs(),
    )
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "white", "black"
/// - "emerald", "emerald-dark", "rose", "slate"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "emerald" => Some(EMERALD),
        "emerald-dark" => Some(EMERALD_DARK),
        "rose" => Some(ROSE),
        "slate" => Some(SLATE),
        _ => None,
    }
}

// ============================================================================
// Filenames
// ============================================================================

/// Replaces characters that are unsafe in filenames with underscores.
///
/// Whitespace runs collapse to a single underscore; an empty input yields `"untitled"`.
pub fn sanitize_filename_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '.' {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drag_handles_reversed_direction() {
        let rect = normalize_drag(Point::new(10.0, 10.0), Point::new(5.0, 5.0));
        assert_eq!(rect, (5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn normalize_drag_handles_mixed_direction() {
        let rect = normalize_drag(Point::new(10.0, 2.0), Point::new(4.0, 12.0));
        assert_eq!(rect, (4.0, 2.0, 6.0, 10.0));
    }

    #[test]
    fn size_with_zero_axis_is_empty() {
        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(Size::new(10.0, f64::NAN).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn normalized_point_maps_to_pixels() {
        let (x, y) = NormalizedPoint::new(50.0, 50.0).to_pixels(1000.0, 500.0);
        assert_eq!((x, y), (500.0, 250.0));
        assert!(!NormalizedPoint::new(100.5, 3.0).is_on_image());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(name_to_color("Emerald").unwrap(), EMERALD);
        assert_eq!(name_to_color("WHITE").unwrap(), WHITE);
        assert!(name_to_color("chartreuse").is_none());
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_filename_component("Lotus's  Bangna"), "Lotus_s_Bangna");
        assert_eq!(sanitize_filename_component("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename_component("  "), "untitled");
    }
}
