//! Interaction state machine and the state it owns.

use super::editor::MarkerEditor;
use crate::annotation::{AnnotationBatch, AnnotationModel, AnnotationSnapshot, MarkerId};
use crate::config::Config;
use crate::draw::{MarkerStyle, RegionStyle};
use crate::input::tool::{ToolMode, ToolTransition};
use crate::util::{Point, Size};
use crate::viewport::{self, Viewport};

/// Pointer gesture in progress.
///
/// At most one gesture is active; it is cleared on pointer-up, pointer-leave,
/// a secondary click, `Escape`, or a tool change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No button held
    Idle,
    /// Dragging the view in `Pan` mode
    Panning {
        /// Screen position where the drag started
        start_pointer: Point,
        /// Pan offset when the drag started
        start_offset: Point,
    },
    /// Primary button held in `Add` mode; a release near `start` places a marker
    Placing {
        /// Screen position of the press
        start: Point,
    },
    /// Drawing a region in `Region` mode (both corners in surface-base pixels)
    DrawingRegion { start: Point, current: Point },
}

/// Notifications queued for the host, drained with [`InteractionState::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A marker was added, edited or deleted
    MarkerBatchChanged,
    /// The regions changed (added or reset)
    RegionsChanged,
    ToolModeChanged(ToolMode),
    /// Zoom level changed; carries the new percentage
    ZoomChanged(u32),
    EditorOpened(MarkerId),
    EditorClosed(MarkerId),
}

/// Interaction state for one editing session.
///
/// Owns the annotation model and the viewport, processes host pointer, wheel
/// and key events, and records what the host needs to redraw or persist.
pub struct InteractionState {
    pub(crate) model: AnnotationModel,
    pub(crate) viewport: Viewport,
    pub(crate) tool: ToolMode,
    pub(crate) gesture: GestureState,
    pub(crate) editor: Option<MarkerEditor>,
    /// Pixel size of the source image
    pub(crate) image_size: Size,
    /// Image size fitted into the host surface at zoom 1
    pub(crate) surface_base: Size,
    pub(crate) click_tolerance: f64,
    pub(crate) min_region_width: f64,
    pub(crate) keyboard_zoom_step: f64,
    pub(crate) marker_style: MarkerStyle,
    pub(crate) region_style: RegionStyle,
    /// Pointer events are ignored while false (e.g. during a save)
    pub(crate) enabled: bool,
    /// Whether the overlay must be redrawn
    pub needs_redraw: bool,
    pub(crate) events: Vec<EngineEvent>,
}

impl InteractionState {
    /// Creates the interaction state for an image shown on a host surface.
    pub fn new(image_size: Size, surface_size: Size, config: &Config) -> Self {
        let surface_base = viewport::fit_to_surface(image_size, surface_size);
        log::debug!(
            "Interaction surface {}x{} -> base {:.1}x{:.1}",
            surface_size.width,
            surface_size.height,
            surface_base.width,
            surface_base.height
        );

        Self {
            model: AnnotationModel::new(),
            viewport: Viewport::from_config(&config.viewport),
            tool: ToolMode::default(),
            gesture: GestureState::Idle,
            editor: None,
            image_size,
            surface_base,
            click_tolerance: config.interaction.click_tolerance,
            min_region_width: config.interaction.min_region_width,
            keyboard_zoom_step: config.viewport.keyboard_zoom_step,
            marker_style: MarkerStyle::from_config(&config.marker),
            region_style: RegionStyle::from_config(&config.region),
            enabled: true,
            needs_redraw: true,
            events: Vec::new(),
        }
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn model(&self) -> &AnnotationModel {
        &self.model
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn surface_base(&self) -> Size {
        self.surface_base
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Copies the annotations for a save or export.
    pub fn snapshot(&self) -> AnnotationSnapshot {
        self.model.snapshot()
    }

    /// Drains queued notifications in the order they occurred.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Enables or disables pointer handling. Disabling drops any gesture in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        log::debug!(
            "Interaction surface {}",
            if enabled { "enabled" } else { "disabled" }
        );
        self.enabled = enabled;
        if !enabled {
            self.cancel_gesture();
        }
    }

    /// Re-fits the image after the host surface changed size.
    ///
    /// Markers are stored in image percent and regions carry their capture
    /// surface, so neither needs rewriting.
    pub fn resize_surface(&mut self, surface_size: Size) {
        self.surface_base = viewport::fit_to_surface(self.image_size, surface_size);
        self.cancel_gesture();
        self.needs_redraw = true;
    }

    /// Selects a tool explicitly. Ignored while the marker editor is open.
    ///
    /// Returns `true` if the mode changed.
    pub fn select_tool(&mut self, mode: ToolMode) -> bool {
        if self.editor.is_some() {
            log::debug!("Ignoring tool selection '{mode}' while the marker editor is open");
            return false;
        }
        self.apply_transition(ToolTransition::Select(mode))
    }

    pub(crate) fn apply_transition(&mut self, transition: ToolTransition) -> bool {
        let next = transition.after(self.tool);
        if next == self.tool {
            return false;
        }
        log::debug!("Tool mode {} -> {} ({transition:?})", self.tool, next);
        self.cancel_gesture();
        self.tool = next;
        self.emit(EngineEvent::ToolModeChanged(next));
        self.needs_redraw = true;
        true
    }

    /// Drops the gesture in progress without committing anything.
    pub fn cancel_gesture(&mut self) {
        if self.gesture != GestureState::Idle {
            log::debug!("Cancelling gesture {:?}", self.gesture);
            self.gesture = GestureState::Idle;
            self.needs_redraw = true;
        }
    }

    /// Zooms by a wheel-style delta and reports the new level.
    pub(crate) fn apply_zoom(&mut self, delta: f64) -> bool {
        if !self.viewport.zoom_by(delta) {
            return false;
        }
        let percent = self.viewport.zoom_percent();
        self.emit(EngineEvent::ZoomChanged(percent));
        self.needs_redraw = true;
        true
    }

    /// Returns to the fitted view (zoom 100%, no pan).
    pub fn reset_view(&mut self) {
        let was_zoomed = self.viewport.zoom_percent() != 100;
        self.viewport.reset();
        if was_zoomed {
            self.emit(EngineEvent::ZoomChanged(100));
        }
        self.needs_redraw = true;
    }

    /// Clears all regions; markers are untouched.
    pub fn reset_regions(&mut self) {
        if self.model.regions().is_empty() {
            return;
        }
        log::info!("Clearing {} region(s)", self.model.regions().len());
        self.model.reset_regions();
        self.emit(EngineEvent::RegionsChanged);
        self.needs_redraw = true;
    }

    /// Reloads saved markers into the model.
    pub fn restore_markers<I>(&mut self, seeds: I) -> usize
    where
        I: IntoIterator<Item = crate::annotation::MarkerSeed>,
    {
        let restored = self.model.restore_records(seeds);
        if restored > 0 {
            self.emit(EngineEvent::MarkerBatchChanged);
            self.needs_redraw = true;
        }
        restored
    }

    /// Appends a saved annotation batch. Regions keep their own capture surface.
    pub fn load_batch(&mut self, batch: AnnotationBatch) -> (usize, usize) {
        let (markers, regions) = self.model.load_batch(batch);
        if markers > 0 {
            self.emit(EngineEvent::MarkerBatchChanged);
        }
        if regions > 0 {
            self.emit(EngineEvent::RegionsChanged);
        }
        self.needs_redraw |= markers + regions > 0;
        (markers, regions)
    }

    /// Flags markers written by a save. Markers edited since the snapshot stay unsaved.
    pub(crate) fn mark_persisted(&mut self, saved: &[(MarkerId, crate::annotation::MarkerSeed)]) -> usize {
        self.model.mark_persisted(saved)
    }

    /// Surface-base position under a screen point.
    pub(crate) fn world_at(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen)
    }

    /// On-screen marker radius for the current zoom.
    pub(crate) fn screen_marker_radius(&self) -> f64 {
        self.marker_style.radius_for_width(self.surface_base.width) * self.viewport.scale()
    }

    /// Topmost marker whose on-screen disc contains `screen`.
    pub(crate) fn marker_at(&self, screen: Point) -> Option<MarkerId> {
        let radius = self.screen_marker_radius();
        self.model
            .markers()
            .iter()
            .rev()
            .find(|marker| {
                viewport::normalized_to_screen(marker.position(), &self.viewport, self.surface_base)
                    .is_some_and(|center| center.distance_to(screen) <= radius)
            })
            .map(|marker| marker.id())
    }
}
