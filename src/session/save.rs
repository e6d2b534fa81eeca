//! Save jobs: persist records and compose the export from one snapshot.

use std::sync::Arc;

use chrono::{DateTime, Local};
use thiserror::Error;

use super::EditorContext;
use super::store::{MarkerRecord, RecordStore, StoreError};
use crate::annotation::{AnnotationSnapshot, MarkerId, MarkerSeed};
use crate::export::{self, ExportArtifact, ExportError, ExportOptions};

/// Failure of a save job. Distinguishes which half failed.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("A save is already in progress")]
    InProgress,

    #[error("Failed to persist records: {0}")]
    Persist(#[source] StoreError),

    /// The records were stored but the export failed
    #[error("Failed to export image: {source}")]
    Export {
        source: ExportError,
        persisted: Vec<(MarkerId, MarkerSeed)>,
    },

    #[error("Failed to persist records ({persist}) and to export image ({export})")]
    Both {
        persist: StoreError,
        export: ExportError,
    },
}

impl SaveError {
    /// Markers the store accepted even though the save failed as a whole.
    pub fn persisted(&self) -> &[(MarkerId, MarkerSeed)] {
        match self {
            SaveError::Export { persisted, .. } => persisted,
            _ => &[],
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub artifact: ExportArtifact,
    pub suggested_filename: String,
    pub records_saved: usize,
    /// Markers written by this save, as they were written
    pub persisted: Vec<(MarkerId, MarkerSeed)>,
}

/// A save operation bound to one annotation snapshot.
///
/// Created by [`EditorSession::begin_save`](super::EditorSession::begin_save);
/// edits made to the session afterwards do not affect the job.
pub struct SaveJob {
    image: Arc<[u8]>,
    snapshot: AnnotationSnapshot,
    context: EditorContext,
    options: ExportOptions,
    saved_at: DateTime<Local>,
    suggested_filename: String,
}

impl std::fmt::Debug for SaveJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveJob")
            .field("markers", &self.snapshot.markers.len())
            .field("regions", &self.snapshot.regions.len())
            .field("branch", &self.context.branch)
            .field("saved_at", &self.saved_at)
            .field("suggested_filename", &self.suggested_filename)
            .finish()
    }
}

impl SaveJob {
    pub(crate) fn new(
        image: Arc<[u8]>,
        snapshot: AnnotationSnapshot,
        context: EditorContext,
        options: ExportOptions,
        saved_at: DateTime<Local>,
        suggested_filename: String,
    ) -> Self {
        Self {
            image,
            snapshot,
            context,
            options,
            saved_at,
            suggested_filename,
        }
    }

    pub fn snapshot(&self) -> &AnnotationSnapshot {
        &self.snapshot
    }

    pub fn saved_at(&self) -> DateTime<Local> {
        self.saved_at
    }

    pub fn suggested_filename(&self) -> &str {
        &self.suggested_filename
    }

    /// Records for the snapshot's new or edited markers, in marker order.
    ///
    /// Markers already held by the store are skipped.
    pub fn records(&self) -> Vec<MarkerRecord> {
        self.snapshot
            .markers
            .iter()
            .filter(|marker| !marker.is_persisted())
            .map(|marker| MarkerRecord::from_marker(marker, &self.context, &self.saved_at))
            .collect()
    }

    fn unsaved_markers(&self) -> Vec<(MarkerId, MarkerSeed)> {
        self.snapshot
            .markers
            .iter()
            .filter(|marker| !marker.is_persisted())
            .map(|marker| (marker.id(), MarkerSeed::from(marker)))
            .collect()
    }

    /// Composes the export for this job's snapshot.
    pub async fn export(&self) -> Result<ExportArtifact, ExportError> {
        export::compose_in_background(
            Arc::clone(&self.image),
            self.snapshot.clone(),
            self.options.clone(),
        )
        .await
    }

    /// Persists the records and composes the export concurrently.
    ///
    /// When every marker is already stored the store call is skipped.
    pub async fn run(self, store: &dyn RecordStore) -> Result<SaveOutcome, SaveError> {
        let records = self.records();
        let records_saved = records.len();
        log::info!(
            "Saving {records_saved} record(s) and composing export for {}/{}",
            self.context.company,
            self.context.branch
        );

        let persist = async {
            if records.is_empty() {
                Ok(())
            } else {
                store.save(records).await
            }
        };
        let (persisted, exported) = tokio::join!(persist, self.export());

        match (persisted, exported) {
            (Ok(()), Ok(artifact)) => Ok(SaveOutcome {
                artifact,
                persisted: self.unsaved_markers(),
                suggested_filename: self.suggested_filename,
                records_saved,
            }),
            (Err(persist), Ok(_)) => Err(SaveError::Persist(persist)),
            (Ok(()), Err(source)) => Err(SaveError::Export {
                source,
                persisted: self.unsaved_markers(),
            }),
            (Err(persist), Err(export)) => Err(SaveError::Both { persist, export }),
        }
    }
}
