//! Editing sessions.
//!
//! An [`EditorSession`] binds one source image and its host context (company,
//! branch, recorder) to an interaction state. It is opened when the operator
//! starts annotating and closed when they leave; nothing outlives it except
//! the records and artifacts produced by its save jobs.

mod observer;
mod save;
mod store;

pub use observer::{NoopObserver, SessionObserver};
pub use save::{SaveError, SaveJob, SaveOutcome};
pub use store::{JsonFileStore, MarkerRecord, RecordQuery, RecordStore, StoreError};

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::annotation::AnnotationSnapshot;
use crate::config::Config;
use crate::export::{self, ExportError, ExportOptions, FooterStamp};
use crate::input::{EngineEvent, InteractionState, ToolMode};
use crate::util::Size;

/// Host-supplied identity of what is being annotated and by whom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorContext {
    pub company: String,
    pub branch: String,
    pub recorder: String,
}

impl EditorContext {
    pub fn new(
        company: impl Into<String>,
        branch: impl Into<String>,
        recorder: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            branch: branch.into(),
            recorder: recorder.into(),
        }
    }
}

/// Encoded source image with its probed dimensions.
#[derive(Clone)]
pub struct SourceImage {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl SourceImage {
    /// Wraps encoded image bytes after reading their header.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ExportError> {
        let bytes = bytes.into();
        let (width, height) = export::decode::probe_dimensions(&bytes)?;
        Ok(Self {
            bytes,
            width,
            height,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// One operator editing one image.
pub struct EditorSession {
    image: SourceImage,
    context: EditorContext,
    config: Config,
    interaction: InteractionState,
    saving: bool,
}

impl EditorSession {
    /// Opens a session for `image` displayed on a host surface of `surface_size`.
    pub fn open(
        image: SourceImage,
        context: EditorContext,
        config: &Config,
        surface_size: Size,
    ) -> Self {
        log::info!(
            "Opening editor session for {}/{} ({}x{} image, recorder '{}')",
            context.company,
            context.branch,
            image.width,
            image.height,
            context.recorder
        );
        let interaction = InteractionState::new(image.size(), surface_size, config);
        Self {
            image,
            context,
            config: config.clone(),
            interaction,
            saving: false,
        }
    }

    /// Ends the session, returning the final annotations.
    pub fn close(self) -> AnnotationSnapshot {
        let snapshot = self.interaction.snapshot();
        log::info!(
            "Closing editor session for {}/{} ({} marker(s), {} region(s))",
            self.context.company,
            self.context.branch,
            snapshot.markers.len(),
            snapshot.regions.len()
        );
        snapshot
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Input entry point for pointer, wheel, key and editor operations.
    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.interaction.tool_mode()
    }

    pub fn zoom_percent(&self) -> u32 {
        self.interaction.zoom_percent()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Restores markers from previously saved records for this company branch.
    pub async fn resume_from(&mut self, store: &dyn RecordStore) -> Result<usize, StoreError> {
        let records = store.fetch(&RecordQuery::for_context(&self.context)).await?;
        Ok(self.restore_records(&records))
    }

    /// Restores markers from saved records (appended after existing markers).
    pub fn restore_records(&mut self, records: &[MarkerRecord]) -> usize {
        self.interaction
            .restore_markers(records.iter().map(MarkerRecord::seed))
    }

    /// Starts a save stamped with the current local time.
    pub fn begin_save(&mut self) -> Result<SaveJob, SaveError> {
        self.begin_save_at(Local::now())
    }

    /// Starts a save stamped with `saved_at`.
    ///
    /// Takes one snapshot for both the records and the export and disables
    /// the surface until [`finish_save`](Self::finish_save).
    pub fn begin_save_at(&mut self, saved_at: DateTime<Local>) -> Result<SaveJob, SaveError> {
        if self.saving {
            log::warn!("Save requested while another save is in flight");
            return Err(SaveError::InProgress);
        }

        let snapshot = self.interaction.snapshot();
        let stamp = FooterStamp::new(saved_at, self.context.recorder.clone());
        let options = ExportOptions::from_config(&self.config).with_stamp(stamp);
        let filename = export::suggested_filename(
            &self.config.export.filename_template,
            &self.context.branch,
            &saved_at,
        );

        self.saving = true;
        self.interaction.set_enabled(false);
        log::info!(
            "Save started: {} marker(s), {} region(s)",
            snapshot.markers.len(),
            snapshot.regions.len()
        );

        Ok(SaveJob::new(
            Arc::clone(&self.image.bytes),
            snapshot,
            self.context.clone(),
            options,
            saved_at,
            filename,
        ))
    }

    /// Re-enables the surface after a save and reports the result to the observer.
    ///
    /// Markers the store accepted are flagged as persisted so the next save
    /// does not write them again; nothing else in the model changes, so a
    /// failed save can be retried.
    pub fn finish_save<O>(&mut self, result: &Result<SaveOutcome, SaveError>, observer: &mut O)
    where
        O: SessionObserver + ?Sized,
    {
        self.saving = false;
        self.interaction.set_enabled(true);
        let persisted = match result {
            Ok(outcome) => outcome.persisted.as_slice(),
            Err(err) => err.persisted(),
        };
        let marked = self.interaction.mark_persisted(persisted);
        if marked > 0 {
            log::debug!("{marked} marker(s) now match stored records");
        }
        match result {
            Ok(outcome) => {
                log::info!(
                    "Save finished: {} record(s), export '{}' ({} bytes)",
                    outcome.records_saved,
                    outcome.suggested_filename,
                    outcome.artifact.png.len()
                );
                observer.on_export_ready(&outcome.artifact, &outcome.suggested_filename);
            }
            Err(err) => {
                log::error!("Save failed: {}", err);
                observer.on_save_failed(err);
            }
        }
    }

    /// Forwards queued interaction events to the observer, in order.
    pub fn dispatch_events<O>(&mut self, observer: &mut O)
    where
        O: SessionObserver + ?Sized,
    {
        for event in self.interaction.take_events() {
            match event {
                EngineEvent::MarkerBatchChanged => {
                    observer.on_marker_batch_changed(self.interaction.model().markers())
                }
                EngineEvent::RegionsChanged => {
                    observer.on_regions_changed(self.interaction.model().regions())
                }
                EngineEvent::ToolModeChanged(mode) => observer.on_tool_mode_changed(mode),
                EngineEvent::ZoomChanged(percent) => observer.on_zoom_changed(percent),
                EngineEvent::EditorOpened(id) => observer.on_editor_opened(id),
                EngineEvent::EditorClosed(id) => observer.on_editor_closed(id),
            }
        }
    }
}
