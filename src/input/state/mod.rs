mod core;
mod editor;
mod keys;
mod pointer;
mod render;

pub use core::{EngineEvent, GestureState, InteractionState};
pub use editor::{MarkerDraft, MarkerEditor};
