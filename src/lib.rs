//! Floor-plan annotation and compositing engine.
//!
//! Hosts open an [`session::EditorSession`] for a source image, feed pointer,
//! wheel and key input into its [`input::InteractionState`], draw the overlay
//! with Cairo, and save through a [`session::RecordStore`] while the export is
//! composed off the interaction path.

pub mod annotation;
pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod session;
pub mod util;
pub mod viewport;

pub use config::Config;
