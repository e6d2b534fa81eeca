//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// complete_color = "emerald"
///
/// # Custom RGB color (0-255 per component)
/// incomplete_color = [239, 68, 68]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, white, black, emerald, emerald-dark, rose, slate
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names fall back to red with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using red", name);
                RED
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }
}

/// When the timestamp/operator footer is burned into exports.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FooterPolicy {
    /// Never draw the footer
    Never,
    /// Draw the footer on every export
    Always,
    /// Draw the footer only when the export carries progress regions
    #[default]
    WithRegions,
}

impl FooterPolicy {
    /// Decides whether an export with `region_count` regions gets a footer.
    pub fn applies(self, region_count: usize) -> bool {
        match self {
            FooterPolicy::Never => false,
            FooterPolicy::Always => true,
            FooterPolicy::WithRegions => region_count > 0,
        }
    }
}
