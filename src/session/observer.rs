//! Host notifications.

use super::save::SaveError;
use crate::annotation::{Marker, MarkerId, Region};
use crate::export::ExportArtifact;
use crate::input::ToolMode;

/// Callbacks the host implements to follow a session.
///
/// Every method has an empty default so hosts only implement what they show.
pub trait SessionObserver {
    /// A save finished and its artifact is ready to download or upload.
    fn on_export_ready(&mut self, _artifact: &ExportArtifact, _suggested_filename: &str) {}

    fn on_save_failed(&mut self, _error: &SaveError) {}

    /// Markers were added, edited, deleted or restored.
    fn on_marker_batch_changed(&mut self, _markers: &[Marker]) {}

    fn on_regions_changed(&mut self, _regions: &[Region]) {}

    fn on_tool_mode_changed(&mut self, _mode: ToolMode) {}

    fn on_zoom_changed(&mut self, _percent: u32) {}

    fn on_editor_opened(&mut self, _marker: MarkerId) {}

    fn on_editor_closed(&mut self, _marker: MarkerId) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
