use std::sync::Arc;

use super::compositor;
use super::types::{ExportArtifact, ExportError, ExportOptions};
use crate::annotation::AnnotationSnapshot;
use tokio::task;

/// Runs [`compositor::compose`] on the blocking pool.
///
/// Decoding and encoding full-resolution rasters takes long enough to stall
/// an async host, so the work is moved off the runtime's worker threads.
pub async fn compose_in_background(
    image_bytes: Arc<[u8]>,
    snapshot: AnnotationSnapshot,
    options: ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    task::spawn_blocking(move || compositor::compose(&image_bytes, &snapshot, &options))
        .await
        .map_err(|e| ExportError::Task(format!("Compose task failed: {}", e)))?
}
