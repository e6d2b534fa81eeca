//! RGBA color type and the annotation palette.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use floormark::draw::Color;
/// let emerald = Color::from_rgb8(16, 185, 129);
/// let translucent = emerald.with_alpha(0.6);
/// assert_eq!(translucent.a, 0.6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 0-255 channel values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Perceived brightness (ITU-R BT.601 weights), used to pick contrasting text.
    pub fn brightness(&self) -> f64 {
        self.r * 0.299 + self.g * 0.587 + self.b * 0.114
    }

    /// Black for light colors, white for dark ones.
    pub fn contrasting(&self) -> Color {
        if self.brightness() > 0.6 { BLACK } else { WHITE }
    }

    /// Applies this color as the Cairo source.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);

pub const ORANGE: Color = Color::new(1.0, 0.5, 0.0, 1.0);

pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Progress green (16, 185, 129), used for completed markers and region fill.
pub const EMERALD: Color = Color::new(16.0 / 255.0, 185.0 / 255.0, 129.0 / 255.0, 1.0);

/// Darker progress green (5, 150, 105), used for region outlines.
pub const EMERALD_DARK: Color = Color::new(5.0 / 255.0, 150.0 / 255.0, 105.0 / 255.0, 1.0);

/// Attention red (239, 68, 68), used for incomplete markers.
pub const ROSE: Color = Color::new(239.0 / 255.0, 68.0 / 255.0, 68.0 / 255.0, 1.0);

/// Neutral dark gray (51, 65, 85).
pub const SLATE: Color = Color::new(51.0 / 255.0, 65.0 / 255.0, 85.0 / 255.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb8_scales_channels() {
        let color = Color::from_rgb8(255, 0, 51);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 0.2).abs() < 1e-9);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn contrasting_picks_black_on_light() {
        assert_eq!(WHITE.contrasting(), BLACK);
        assert_eq!(SLATE.contrasting(), WHITE);
        assert_eq!(ROSE.contrasting(), WHITE);
    }
}
