//! Tool mode selection.

use std::fmt;

/// What a primary-button gesture on the surface does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Drag to move the view (initial mode)
    #[default]
    Pan,
    /// Click once on the image to place a marker; reverts to `Pan` afterwards
    Add,
    /// Drag to draw progress regions; stays active until another tool is selected
    Region,
}

impl ToolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolMode::Pan => "pan",
            ToolMode::Add => "add",
            ToolMode::Region => "region",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that move the tool mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolTransition {
    /// Explicit selection from the toolbar or keyboard
    Select(ToolMode),
    /// A marker was placed by the one-shot `Add` tool
    PlacementCompleted,
}

impl ToolTransition {
    /// Returns the mode that follows `current` after this transition.
    pub fn after(self, current: ToolMode) -> ToolMode {
        match (self, current) {
            (ToolTransition::Select(mode), _) => mode,
            (ToolTransition::PlacementCompleted, ToolMode::Add) => ToolMode::Pan,
            (ToolTransition::PlacementCompleted, other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_reverts_add_to_pan() {
        assert_eq!(
            ToolTransition::PlacementCompleted.after(ToolMode::Add),
            ToolMode::Pan
        );
    }

    #[test]
    fn placement_leaves_persistent_tools_alone() {
        assert_eq!(
            ToolTransition::PlacementCompleted.after(ToolMode::Region),
            ToolMode::Region
        );
        assert_eq!(
            ToolTransition::PlacementCompleted.after(ToolMode::Pan),
            ToolMode::Pan
        );
    }

    #[test]
    fn select_always_wins() {
        for from in [ToolMode::Pan, ToolMode::Add, ToolMode::Region] {
            assert_eq!(
                ToolTransition::Select(ToolMode::Region).after(from),
                ToolMode::Region
            );
        }
    }
}
