//! Input handling and the interaction state machine.
//!
//! This module translates host pointer, wheel and keyboard events into viewport
//! changes and annotation edits. It tracks the active tool mode, the gesture in
//! progress, and the modal marker editor that blocks the surface while open.

pub mod events;
pub mod state;
pub mod tool;

pub use events::{InputError, Key, PointerButton};
pub use state::{EngineEvent, GestureState, InteractionState, MarkerDraft, MarkerEditor};
pub use tool::{ToolMode, ToolTransition};
