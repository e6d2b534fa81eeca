use super::core::{EngineEvent, GestureState, InteractionState};
use crate::annotation::Region;
use crate::input::events::{InputError, PointerButton};
use crate::input::tool::{ToolMode, ToolTransition};
use crate::util::Point;
use crate::viewport;

fn checked_point(x: f64, y: f64) -> Result<Point, InputError> {
    let point = Point::new(x, y);
    if point.is_finite() {
        Ok(point)
    } else {
        log::debug!("Dropping pointer event at non-finite position ({x}, {y})");
        Err(InputError::NonFinitePosition { x, y })
    }
}

impl InteractionState {
    /// Whether surface pointer and wheel events are currently processed.
    fn accepts_surface_input(&self) -> bool {
        self.enabled && self.editor.is_none()
    }

    /// Processes a pointer button press at a screen position.
    ///
    /// # Behavior
    /// - `Pan`: starts dragging the view
    /// - `Add`: arms marker placement at the press position
    /// - `Region`: records the first corner of a region
    /// - Secondary button: cancels the gesture in progress
    pub fn on_pointer_down(
        &mut self,
        button: PointerButton,
        x: f64,
        y: f64,
    ) -> Result<(), InputError> {
        let point = checked_point(x, y)?;
        if !self.accepts_surface_input() {
            return Ok(());
        }

        match button {
            PointerButton::Primary => {
                if self.gesture != GestureState::Idle {
                    return Ok(());
                }
                self.gesture = match self.tool {
                    ToolMode::Pan => GestureState::Panning {
                        start_pointer: point,
                        start_offset: self.viewport.pan_offset(),
                    },
                    ToolMode::Add => GestureState::Placing { start: point },
                    ToolMode::Region => {
                        let corner = self.world_at(point);
                        GestureState::DrawingRegion {
                            start: corner,
                            current: corner,
                        }
                    }
                };
                self.needs_redraw = true;
            }
            PointerButton::Secondary => self.cancel_gesture(),
            PointerButton::Middle => {}
        }
        Ok(())
    }

    /// Processes pointer motion.
    ///
    /// Pan drags set `pan_offset = start_offset + (current - start_pointer)`;
    /// region drags update the candidate rectangle.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<(), InputError> {
        let point = checked_point(x, y)?;
        if !self.accepts_surface_input() {
            return Ok(());
        }

        match self.gesture {
            GestureState::Panning {
                start_pointer,
                start_offset,
            } => {
                self.viewport.set_pan_offset(Point::new(
                    start_offset.x + (point.x - start_pointer.x),
                    start_offset.y + (point.y - start_pointer.y),
                ));
                self.needs_redraw = true;
            }
            GestureState::DrawingRegion { start, .. } => {
                self.gesture = GestureState::DrawingRegion {
                    start,
                    current: self.world_at(point),
                };
                self.needs_redraw = true;
            }
            GestureState::Placing { .. } | GestureState::Idle => {}
        }
        Ok(())
    }

    /// Processes a pointer button release and completes the gesture.
    pub fn on_pointer_up(
        &mut self,
        button: PointerButton,
        x: f64,
        y: f64,
    ) -> Result<(), InputError> {
        let point = checked_point(x, y)?;
        if button != PointerButton::Primary || !self.accepts_surface_input() {
            return Ok(());
        }

        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);
        match gesture {
            GestureState::Panning { start_pointer, .. } => {
                if start_pointer.distance_to(point) <= self.click_tolerance {
                    self.open_marker_at(point);
                }
            }
            GestureState::Placing { start } => {
                if start.distance_to(point) <= self.click_tolerance {
                    self.place_marker(point);
                } else {
                    log::debug!("Pointer moved during placement; no marker added");
                }
            }
            GestureState::DrawingRegion { start, .. } => {
                self.commit_region(start, self.world_at(point));
            }
            GestureState::Idle => return Ok(()),
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Ends the gesture when the pointer leaves the surface.
    ///
    /// A region drag is committed as if released at its last position; other
    /// gestures are dropped.
    pub fn on_pointer_leave(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);
        if let GestureState::DrawingRegion { start, current } = gesture {
            self.commit_region(start, current);
        }
        if gesture != GestureState::Idle {
            self.needs_redraw = true;
        }
    }

    /// Processes a wheel or pinch delta. Zoom applies in every tool mode.
    pub fn on_wheel(&mut self, delta: f64) -> Result<(), InputError> {
        if !delta.is_finite() {
            log::debug!("Dropping non-finite zoom delta {delta}");
            return Err(InputError::NonFiniteDelta(delta));
        }
        if !self.accepts_surface_input() {
            return Ok(());
        }
        self.apply_zoom(delta);
        Ok(())
    }

    fn place_marker(&mut self, screen: Point) {
        let Some(position) = viewport::screen_to_normalized(screen, &self.viewport, self.surface_base)
        else {
            log::warn!("Cannot place marker: image has no displayed area");
            return;
        };
        if !position.is_on_image() {
            log::debug!(
                "Click at ({:.1}%, {:.1}%) is outside the image; no marker added",
                position.x,
                position.y
            );
            return;
        }

        let id = self.model.add_marker(position).id();
        self.emit(EngineEvent::MarkerBatchChanged);
        self.apply_transition(ToolTransition::PlacementCompleted);
        if let Err(err) = self.open_editor(id) {
            log::warn!("Failed to open editor for new marker: {err}");
        }
    }

    fn open_marker_at(&mut self, screen: Point) {
        let Some(id) = self.marker_at(screen) else {
            return;
        };
        if let Err(err) = self.open_editor(id) {
            log::warn!("Failed to open editor for marker {id}: {err}");
        }
    }

    fn commit_region(&mut self, start: Point, end: Point) {
        let region = Region::from_drag(start, end, self.surface_base);
        // The tap threshold applies to what the operator dragged on screen
        let screen_width = region.w * self.viewport.scale();
        if screen_width <= self.min_region_width {
            log::debug!(
                "Discarding region {:.1}px wide on screen (minimum {:.1})",
                screen_width,
                self.min_region_width
            );
            return;
        }
        log::debug!(
            "Adding region ({:.1}, {:.1}) {:.1}x{:.1}",
            region.x,
            region.y,
            region.w,
            region.h
        );
        self.model.add_region(region);
        self.emit(EngineEvent::RegionsChanged);
    }
}
