//! Configuration file support for floormark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/floormark/config.toml`. Settings include viewport limits,
//! gesture thresholds, marker/region appearance and export bounds.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, FooterPolicy};
pub use types::{ExportConfig, InteractionConfig, MarkerConfig, RegionConfig, ViewportConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [viewport]
/// max_scale = 8.0
/// zoom_sensitivity = 0.001
///
/// [interaction]
/// min_region_width = 2.0
///
/// [marker]
/// complete_color = "emerald"
/// incomplete_color = [239, 68, 68]
///
/// [export]
/// max_export_dimension = 4096
/// footer = "with-regions"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub interaction: InteractionConfig,

    #[serde(default)]
    pub marker: MarkerConfig,

    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `viewport.max_scale`: 1.0 - 32.0
    /// - `viewport.zoom_sensitivity`: 0.0001 - 0.01
    /// - `interaction.click_tolerance`: 0.0 - 32.0
    /// - `interaction.min_region_width`: 0.0 - 64.0
    /// - `marker.radius_ratio`: 0.001 - 0.2
    /// - `marker.min_radius`: 4.0 - 128.0
    /// - `region.fill_opacity`: 0.0 - 1.0
    /// - `export.max_export_dimension`: 256 - 16384, never above `max_source_dimension`
    fn validate_and_clamp(&mut self) {
        clamp_f64(&mut self.viewport.max_scale, 1.0, 32.0, "viewport.max_scale");
        clamp_f64(
            &mut self.viewport.zoom_sensitivity,
            0.0001,
            0.01,
            "viewport.zoom_sensitivity",
        );
        clamp_f64(
            &mut self.viewport.keyboard_zoom_step,
            1.0,
            500.0,
            "viewport.keyboard_zoom_step",
        );
        clamp_f64(
            &mut self.interaction.click_tolerance,
            0.0,
            32.0,
            "interaction.click_tolerance",
        );
        clamp_f64(
            &mut self.interaction.min_region_width,
            0.0,
            64.0,
            "interaction.min_region_width",
        );
        clamp_f64(&mut self.marker.radius_ratio, 0.001, 0.2, "marker.radius_ratio");
        clamp_f64(&mut self.marker.min_radius, 4.0, 128.0, "marker.min_radius");
        clamp_f64(&mut self.region.fill_opacity, 0.0, 1.0, "region.fill_opacity");
        clamp_f64(&mut self.region.outline_width, 0.5, 20.0, "region.outline_width");
        clamp_f64(&mut self.export.footer_height, 8.0, 200.0, "export.footer_height");
        clamp_f64(
            &mut self.export.footer_font_size,
            4.0,
            100.0,
            "export.footer_font_size",
        );

        if !(256..=16384).contains(&self.export.max_export_dimension) {
            warn!(
                "Invalid export.max_export_dimension {}, clamping to 256-16384 range",
                self.export.max_export_dimension
            );
            self.export.max_export_dimension = self.export.max_export_dimension.clamp(256, 16384);
        }

        if self.export.max_source_dimension < self.export.max_export_dimension {
            warn!(
                "export.max_source_dimension {} is below max_export_dimension {}, raising it",
                self.export.max_source_dimension, self.export.max_export_dimension
            );
            self.export.max_source_dimension = self.export.max_export_dimension;
        }

        if self.export.max_source_pixels == 0 {
            warn!("export.max_source_pixels must be positive, using default");
            self.export.max_source_pixels = ExportConfig::default().max_source_pixels;
        }

        if crate::draw::font::parse_weight(&self.marker.font_weight).is_none() {
            warn!(
                "Invalid marker.font_weight '{}', falling back to 'bold'",
                self.marker.font_weight
            );
            self.marker.font_weight = "bold".to_string();
        }

        if !self.export.filename_template.contains("{branch}") {
            debug!("export.filename_template has no {{branch}} placeholder");
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/floormark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("floormark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}

fn clamp_f64(value: &mut f64, min: f64, max: f64, name: &str) {
    if !value.is_finite() {
        warn!("Invalid {name} (not a number), using {min}");
        *value = min;
    } else if !(min..=max).contains(&*value) {
        warn!("Invalid {name} {value}, clamping to {min}-{max} range");
        *value = value.clamp(min, max);
    }
}
