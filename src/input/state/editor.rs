//! Modal marker editor.
//!
//! The editor works on a draft; the model only changes when the draft is
//! confirmed, so exports never observe half-typed metadata.

use super::core::{EngineEvent, InteractionState};
use crate::annotation::{AnnotationError, Marker, MarkerId, MarkerKind, MarkerUpdate};
use crate::input::tool::ToolMode;

/// Editable copy of a marker's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerDraft {
    pub label: String,
    pub serial: String,
    pub name: String,
    pub kind: MarkerKind,
}

impl MarkerDraft {
    /// Updates needed to bring `marker` in line with this draft.
    pub fn changes_from(&self, marker: &Marker) -> Vec<MarkerUpdate> {
        let mut updates = Vec::new();
        if self.label != marker.label() {
            updates.push(MarkerUpdate::Label(self.label.clone()));
        }
        if self.serial != marker.serial() {
            updates.push(MarkerUpdate::Serial(self.serial.clone()));
        }
        if self.name != marker.name() {
            updates.push(MarkerUpdate::Name(self.name.clone()));
        }
        if self.kind != marker.kind() {
            updates.push(MarkerUpdate::Kind(self.kind));
        }
        updates
    }
}

impl From<&Marker> for MarkerDraft {
    fn from(marker: &Marker) -> Self {
        Self {
            label: marker.label().to_string(),
            serial: marker.serial().to_string(),
            name: marker.name().to_string(),
            kind: marker.kind(),
        }
    }
}

/// The open editor: which marker it targets and the pending draft.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEditor {
    target: MarkerId,
    pub draft: MarkerDraft,
    /// Tool mode restored when the editor closes
    return_mode: ToolMode,
}

impl MarkerEditor {
    pub fn target(&self) -> MarkerId {
        self.target
    }
}

impl InteractionState {
    pub fn editor(&self) -> Option<&MarkerEditor> {
        self.editor.as_ref()
    }

    /// Marker currently under edit; while set the surface ignores pointer and wheel input.
    pub fn edit_target(&self) -> Option<MarkerId> {
        self.editor.as_ref().map(MarkerEditor::target)
    }

    /// Mutable access to the open editor's draft, for host form fields.
    pub fn draft_mut(&mut self) -> Option<&mut MarkerDraft> {
        self.editor.as_mut().map(|editor| &mut editor.draft)
    }

    /// Opens the editor on an existing marker.
    ///
    /// Fails if the marker does not exist. An editor that is already open is
    /// left untouched and `Ok(false)` is returned.
    pub fn open_editor(&mut self, id: MarkerId) -> Result<bool, AnnotationError> {
        if self.editor.is_some() {
            log::debug!("Marker editor already open; not opening {id}");
            return Ok(false);
        }
        let marker = self
            .model
            .marker(id)
            .ok_or(AnnotationError::UnknownMarker(id))?;
        self.editor = Some(MarkerEditor {
            target: id,
            draft: MarkerDraft::from(marker),
            return_mode: self.tool,
        });
        self.cancel_gesture();
        self.emit(EngineEvent::EditorOpened(id));
        self.needs_redraw = true;
        Ok(true)
    }

    /// Applies the draft to the model and closes the editor.
    ///
    /// Returns `Ok(false)` when no editor was open.
    pub fn confirm_editor(&mut self) -> Result<bool, AnnotationError> {
        let Some(editor) = self.editor.take() else {
            return Ok(false);
        };
        let result = self.apply_draft(&editor);
        self.finish_editor(&editor);
        result.map(|_| true)
    }

    fn apply_draft(&mut self, editor: &MarkerEditor) -> Result<(), AnnotationError> {
        let marker = self
            .model
            .marker(editor.target)
            .ok_or(AnnotationError::UnknownMarker(editor.target))?;
        let updates = editor.draft.changes_from(marker);
        if updates.is_empty() {
            return Ok(());
        }
        for update in updates {
            self.model.update_marker(editor.target, update)?;
        }
        log::debug!("Marker {} updated from editor", editor.target);
        self.emit(EngineEvent::MarkerBatchChanged);
        Ok(())
    }

    /// Discards the draft and closes the editor.
    pub fn cancel_editor(&mut self) -> bool {
        let Some(editor) = self.editor.take() else {
            return false;
        };
        self.finish_editor(&editor);
        true
    }

    /// Deletes the marker under edit and closes the editor.
    pub fn delete_edited_marker(&mut self) -> Option<Marker> {
        let editor = self.editor.take()?;
        let removed = self.model.delete_marker(editor.target);
        if removed.is_some() {
            self.emit(EngineEvent::MarkerBatchChanged);
        }
        self.finish_editor(&editor);
        removed
    }

    fn finish_editor(&mut self, editor: &MarkerEditor) {
        if self.tool != editor.return_mode {
            self.tool = editor.return_mode;
            self.emit(EngineEvent::ToolModeChanged(self.tool));
        }
        self.emit(EngineEvent::EditorClosed(editor.target));
        self.needs_redraw = true;
    }
}
