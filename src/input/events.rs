//! Generic input event types delivered by the host surface.

use thiserror::Error;

/// Generic key representation.
///
/// Hosts map their native key codes to these values before forwarding
/// key presses to the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    Escape,
    Return,
    Delete,
    Backspace,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Pointer button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button or single touch
    Primary,
    /// Right mouse button (cancels the current gesture)
    Secondary,
    Middle,
}

/// Malformed pointer data rejected before it reaches the state machine.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("pointer position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },

    #[error("zoom delta {0} is not finite")]
    NonFiniteDelta(f64),
}
