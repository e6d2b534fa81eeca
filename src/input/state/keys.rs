use super::core::{GestureState, InteractionState};
use crate::input::events::Key;
use crate::input::tool::ToolMode;

impl InteractionState {
    /// Processes a key press.
    ///
    /// While the marker editor is open only `Escape` (cancel), `Return`
    /// (confirm) and `Delete`/`Backspace` (remove the marker) are handled; everything else
    /// belongs to the host's form fields.
    ///
    /// Otherwise:
    /// - `a` / `p` / `r`: select Add, Pan or Region
    /// - `+` / `=` and `-`: zoom in and out by the configured step
    /// - `0`: reset the view
    /// - `Escape`: cancel the gesture in progress
    ///
    /// Returns `true` if the key was consumed.
    pub fn on_key_press(&mut self, key: Key) -> bool {
        if self.editor.is_some() {
            return match key {
                Key::Escape => self.cancel_editor(),
                Key::Return => match self.confirm_editor() {
                    Ok(closed) => closed,
                    Err(err) => {
                        log::warn!("Failed to apply marker edits: {err}");
                        true
                    }
                },
                Key::Delete | Key::Backspace => self.delete_edited_marker().is_some(),
                _ => false,
            };
        }

        if !self.enabled {
            return false;
        }

        match key {
            Key::Escape => {
                let active = self.gesture != GestureState::Idle;
                self.cancel_gesture();
                active
            }
            Key::Char(ch) => match ch.to_ascii_lowercase() {
                'a' => {
                    self.select_tool(ToolMode::Add);
                    true
                }
                'p' => {
                    self.select_tool(ToolMode::Pan);
                    true
                }
                'r' => {
                    self.select_tool(ToolMode::Region);
                    true
                }
                '+' | '=' => {
                    self.apply_zoom(-self.keyboard_zoom_step);
                    true
                }
                '-' => {
                    self.apply_zoom(self.keyboard_zoom_step);
                    true
                }
                '0' => {
                    self.reset_view();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
