//! Resolved drawing styles for markers, regions and the export footer.
//!
//! Configuration stores colors as [`ColorSpec`](crate::config::ColorSpec) values;
//! these structs hold the resolved [`Color`]s so renderers never touch config parsing.

use super::color::{BLACK, Color, WHITE};
use super::font::FontDescriptor;
use crate::config::{ExportConfig, MarkerConfig, RegionConfig};

/// Appearance of point markers.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Fill for markers whose metadata is complete
    pub complete_fill: Color,
    /// Fill for markers still missing serial, name or label
    pub incomplete_fill: Color,
    /// Ring drawn around every marker
    pub outline: Color,
    /// Radius as a fraction of raster width
    pub radius_ratio: f64,
    /// Smallest radius in pixels, keeps markers legible on small rasters
    pub min_radius: f64,
    /// Label font
    pub font: FontDescriptor,
}

impl MarkerStyle {
    pub fn from_config(config: &MarkerConfig) -> Self {
        Self {
            complete_fill: config.complete_color.to_color(),
            incomplete_fill: config.incomplete_color.to_color(),
            outline: config.outline_color.to_color(),
            radius_ratio: config.radius_ratio,
            min_radius: config.min_radius,
            font: FontDescriptor::new(config.font_family.clone(), config.font_weight.clone()),
        }
    }

    /// Fill color for a marker with the given completion state.
    pub fn fill_for(&self, complete: bool) -> Color {
        if complete {
            self.complete_fill
        } else {
            self.incomplete_fill
        }
    }

    /// Marker radius on a raster of the given width.
    pub fn radius_for_width(&self, width: f64) -> f64 {
        (width * self.radius_ratio).max(self.min_radius)
    }

    /// Outline thickness for a marker of the given radius.
    pub fn outline_width(&self, radius: f64) -> f64 {
        (radius * 0.15).max(1.0)
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from_config(&MarkerConfig::default())
    }
}

/// Appearance of progress regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStyle {
    /// Fill color including its opacity
    pub fill: Color,
    /// Outline color
    pub outline: Color,
    /// Outline width in capture-surface pixels
    pub outline_width: f64,
}

impl RegionStyle {
    pub fn from_config(config: &RegionConfig) -> Self {
        Self {
            fill: config.fill_color.to_color().with_alpha(config.fill_opacity),
            outline: config.outline_color.to_color(),
            outline_width: config.outline_width,
        }
    }
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self::from_config(&RegionConfig::default())
    }
}

/// Appearance of the timestamp/operator footer.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterStyle {
    /// Bar height in capture-surface pixels
    pub height: f64,
    /// Text size in capture-surface pixels
    pub font_size: f64,
    /// Left text inset in capture-surface pixels
    pub inset: f64,
    pub background: Color,
    pub text: Color,
    pub font: FontDescriptor,
}

impl FooterStyle {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            height: config.footer_height,
            font_size: config.footer_font_size,
            inset: 10.0,
            background: WHITE,
            text: BLACK,
            font: FontDescriptor::new("Sans", "bold"),
        }
    }
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}
