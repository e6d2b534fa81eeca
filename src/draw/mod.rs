//! Rendering primitives (Cairo + Pango).
//!
//! This module defines the drawing types shared by the live overlay and the exporter:
//! - [`Color`]: RGBA color representation with the annotation palette
//! - [`FontDescriptor`]: label/footer font selection
//! - [`MarkerStyle`], [`RegionStyle`], [`FooterStyle`]: resolved appearance
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod font;
pub mod render;
pub mod style;

pub use color::Color;
pub use font::FontDescriptor;
pub use render::{render_centered_text, render_footer, render_marker, render_region};
pub use style::{FooterStyle, MarkerStyle, RegionStyle};
