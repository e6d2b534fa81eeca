//! Configuration type definitions.

use super::enums::{ColorSpec, FooterPolicy};
use serde::{Deserialize, Serialize};

/// Pan/zoom behaviour of the editing viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Largest zoom factor (valid range: 1.0 - 32.0)
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,

    /// Scale change per wheel unit; a delta of `d` multiplies scale by `1 - d * sensitivity`
    #[serde(default = "default_zoom_sensitivity")]
    pub zoom_sensitivity: f64,

    /// Wheel units applied per `+`/`-` key press
    #[serde(default = "default_keyboard_zoom_step")]
    pub keyboard_zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_scale: default_max_scale(),
            zoom_sensitivity: default_zoom_sensitivity(),
            keyboard_zoom_step: default_keyboard_zoom_step(),
        }
    }
}

/// Pointer gesture thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Pointer travel (pixels) below which a press/release counts as a click
    #[serde(default = "default_click_tolerance")]
    pub click_tolerance: f64,

    /// Regions must be wider than this many pixels to be kept
    #[serde(default = "default_min_region_width")]
    pub min_region_width: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_tolerance: default_click_tolerance(),
            min_region_width: default_min_region_width(),
        }
    }
}

/// Marker appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Fill for markers with serial, name and label filled in
    #[serde(default = "default_complete_color")]
    pub complete_color: ColorSpec,

    /// Fill for markers still missing metadata
    #[serde(default = "default_incomplete_color")]
    pub incomplete_color: ColorSpec,

    /// Ring around every marker
    #[serde(default = "default_marker_outline")]
    pub outline_color: ColorSpec,

    /// Marker radius as a fraction of the export width (valid range: 0.001 - 0.2)
    #[serde(default = "default_radius_ratio")]
    pub radius_ratio: f64,

    /// Minimum marker radius in pixels (valid range: 4.0 - 128.0)
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    /// Label font family
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Label font weight (named or 100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            complete_color: default_complete_color(),
            incomplete_color: default_incomplete_color(),
            outline_color: default_marker_outline(),
            radius_ratio: default_radius_ratio(),
            min_radius: default_min_radius(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
        }
    }
}

/// Progress-region appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_region_fill")]
    pub fill_color: ColorSpec,

    /// Fill opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_region_opacity")]
    pub fill_opacity: f64,

    #[serde(default = "default_region_outline")]
    pub outline_color: ColorSpec,

    /// Outline width in capture-surface pixels (valid range: 0.5 - 20.0)
    #[serde(default = "default_region_outline_width")]
    pub outline_width: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            fill_color: default_region_fill(),
            fill_opacity: default_region_opacity(),
            outline_color: default_region_outline(),
            outline_width: default_region_outline_width(),
        }
    }
}

/// Export limits, footer and filename settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Exports larger than this on either axis are downscaled (valid range: 256 - 16384)
    #[serde(default = "default_max_export_dimension")]
    pub max_export_dimension: u32,

    /// Sources larger than this on either axis are rejected before decoding
    #[serde(default = "default_max_source_dimension")]
    pub max_source_dimension: u32,

    /// Sources with more pixels than this are rejected before decoding
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,

    /// When to burn in the timestamp/operator footer
    #[serde(default)]
    pub footer: FooterPolicy,

    /// Footer bar height in capture-surface pixels
    #[serde(default = "default_footer_height")]
    pub footer_height: f64,

    /// Footer text size in capture-surface pixels
    #[serde(default = "default_footer_font_size")]
    pub footer_font_size: f64,

    /// Suggested filename template: chrono specifiers plus a `{branch}` placeholder
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_export_dimension: default_max_export_dimension(),
            max_source_dimension: default_max_source_dimension(),
            max_source_pixels: default_max_source_pixels(),
            footer: FooterPolicy::default(),
            footer_height: default_footer_height(),
            footer_font_size: default_footer_font_size(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_max_scale() -> f64 {
    8.0
}

fn default_zoom_sensitivity() -> f64 {
    0.001
}

fn default_keyboard_zoom_step() -> f64 {
    100.0
}

fn default_click_tolerance() -> f64 {
    4.0
}

fn default_min_region_width() -> f64 {
    2.0
}

fn default_complete_color() -> ColorSpec {
    ColorSpec::Name("emerald".to_string())
}

fn default_incomplete_color() -> ColorSpec {
    ColorSpec::Name("rose".to_string())
}

fn default_marker_outline() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_radius_ratio() -> f64 {
    0.015
}

fn default_min_radius() -> f64 {
    12.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_region_fill() -> ColorSpec {
    ColorSpec::Name("emerald".to_string())
}

fn default_region_opacity() -> f64 {
    0.6
}

fn default_region_outline() -> ColorSpec {
    ColorSpec::Name("emerald-dark".to_string())
}

fn default_region_outline_width() -> f64 {
    2.0
}

fn default_max_export_dimension() -> u32 {
    4096
}

fn default_max_source_dimension() -> u32 {
    16384
}

fn default_max_source_pixels() -> u64 {
    120_000_000
}

fn default_footer_height() -> f64 {
    20.0
}

fn default_footer_font_size() -> f64 {
    10.0
}

fn default_filename_template() -> String {
    "Layout_{branch}_%Y%m%d-%H%M%S".to_string()
}
