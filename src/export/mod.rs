//! Export: composing annotations into the full-resolution image.
//!
//! This module handles:
//! - Bounded decoding of the source image (size caps checked before allocation)
//! - Burning markers, regions and the footer into the raster with Cairo
//! - PNG encoding, off the async runtime when driven from a session
//! - Filename generation and writing artifacts to disk

pub mod compositor;
pub mod decode;
pub mod file;
pub mod pipeline;
pub mod types;

pub use compositor::compose;
pub use file::{default_export_directory, expand_tilde, save_artifact, suggested_filename};
pub use pipeline::compose_in_background;
pub use types::{ExportArtifact, ExportError, ExportLimits, ExportOptions, FooterStamp};
