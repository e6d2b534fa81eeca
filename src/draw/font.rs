//! Font descriptor for label and footer text.

/// Font configuration for text rendering.
///
/// Labels and footers are sized in raster pixels rather than points so that
/// the same descriptor produces the same glyph size on every export,
/// independent of the display resolution Pango assumes.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "DejaVu Sans")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", or numeric 100-900)
    pub weight: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "bold".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Resolves the weight string to a Pango weight, falling back to bold.
    pub fn pango_weight(&self) -> pango::Weight {
        parse_weight(&self.weight).unwrap_or(pango::Weight::Bold)
    }

    /// Builds a Pango font description with an absolute pixel size.
    pub fn to_font_description(&self, pixel_size: f64) -> pango::FontDescription {
        let mut desc = pango::FontDescription::new();
        desc.set_family(&self.family);
        desc.set_weight(self.pango_weight());
        desc.set_absolute_size(pixel_size.max(1.0) * pango::SCALE as f64);
        desc
    }
}

/// Parses a named or numeric (100-900) font weight.
pub fn parse_weight(raw: &str) -> Option<pango::Weight> {
    let named = match raw.trim().to_lowercase().as_str() {
        "thin" => Some(pango::Weight::Thin),
        "ultralight" => Some(pango::Weight::Ultralight),
        "light" => Some(pango::Weight::Light),
        "normal" => Some(pango::Weight::Normal),
        "medium" => Some(pango::Weight::Medium),
        "semibold" => Some(pango::Weight::Semibold),
        "bold" => Some(pango::Weight::Bold),
        "ultrabold" => Some(pango::Weight::Ultrabold),
        "heavy" => Some(pango::Weight::Heavy),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let numeric: u32 = raw.trim().parse().ok()?;
    if !(100..=900).contains(&numeric) {
        return None;
    }
    // Round to the nearest hundred so "650" behaves like CSS would.
    Some(match (numeric + 50) / 100 {
        1 => pango::Weight::Thin,
        2 => pango::Weight::Ultralight,
        3 => pango::Weight::Light,
        4 => pango::Weight::Normal,
        5 => pango::Weight::Medium,
        6 => pango::Weight::Semibold,
        7 => pango::Weight::Bold,
        8 => pango::Weight::Ultrabold,
        _ => pango::Weight::Heavy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_descriptor_is_bold_sans() {
        let font = FontDescriptor::default();
        assert_eq!(font.family, "Sans");
        assert_eq!(font.pango_weight(), pango::Weight::Bold);
    }

    #[test]
    fn numeric_weights_map_to_nearest_step() {
        assert_eq!(parse_weight("400"), Some(pango::Weight::Normal));
        assert_eq!(parse_weight("650"), Some(pango::Weight::Bold));
        assert_eq!(parse_weight("900"), Some(pango::Weight::Heavy));
        assert_eq!(parse_weight("1000"), None);
    }

    #[test]
    fn unknown_weight_falls_back_to_bold() {
        let font = FontDescriptor::new("Sans", "chunky");
        assert_eq!(font.pango_weight(), pango::Weight::Bold);
    }
}
