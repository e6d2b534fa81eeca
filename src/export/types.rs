//! Data types for composing and exporting annotated images.

use crate::config::{Config, ExportConfig, FooterPolicy};
use crate::draw::{FooterStyle, MarkerStyle, RegionStyle};
use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors that can occur while composing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    #[error("Source image {width}x{height} exceeds the supported size ({reason})")]
    Capacity {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("Rendering failed: {0}")]
    Render(#[from] cairo::Error),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Failed to save export: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoded result of one export.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// PNG-encoded bytes
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("png_bytes", &self.png.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Bounds on source and output rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLimits {
    /// Longest edge of the exported raster; larger sources are downscaled
    pub max_export_dimension: u32,
    /// Longest edge accepted from a source image
    pub max_source_dimension: u32,
    /// Largest pixel count accepted from a source image
    pub max_source_pixels: u64,
}

impl ExportLimits {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            max_export_dimension: config.max_export_dimension,
            max_source_dimension: config.max_source_dimension,
            max_source_pixels: config.max_source_pixels,
        }
    }
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Timestamp and operator burned into the footer.
///
/// The time is captured by the caller so repeated exports of the same
/// snapshot stay byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterStamp {
    pub saved_at: DateTime<Local>,
    pub recorder: String,
}

impl FooterStamp {
    pub fn new(saved_at: DateTime<Local>, recorder: impl Into<String>) -> Self {
        Self {
            saved_at,
            recorder: recorder.into(),
        }
    }

    /// Footer line, e.g. `Saved: 2025-01-31 14:05:09 | by somchai`.
    pub fn text(&self) -> String {
        format!(
            "Saved: {} | by {}",
            self.saved_at.format("%Y-%m-%d %H:%M:%S"),
            self.recorder
        )
    }
}

/// Everything the compositor needs besides the image and the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub marker_style: MarkerStyle,
    pub region_style: RegionStyle,
    pub footer_style: FooterStyle,
    pub footer_policy: FooterPolicy,
    pub limits: ExportLimits,
    /// Footer content; no footer is drawn without one
    pub stamp: Option<FooterStamp>,
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            marker_style: MarkerStyle::from_config(&config.marker),
            region_style: RegionStyle::from_config(&config.region),
            footer_style: FooterStyle::from_config(&config.export),
            footer_policy: config.export.footer,
            limits: ExportLimits::from_config(&config.export),
            stamp: None,
        }
    }

    pub fn with_stamp(mut self, stamp: FooterStamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// Footer text to burn in for a snapshot with `region_count` regions, if any.
    pub fn footer_text(&self, region_count: usize) -> Option<String> {
        if !self.footer_policy.applies(region_count) {
            return None;
        }
        self.stamp.as_ref().map(FooterStamp::text)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
