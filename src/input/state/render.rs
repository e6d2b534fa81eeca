use super::core::{GestureState, InteractionState};
use crate::annotation::Region;
use crate::draw::{render_marker, render_region};
use crate::util::Point;
use crate::viewport;

impl InteractionState {
    /// Renders regions, markers and the provisional region in screen space.
    ///
    /// The host draws the image itself (fitted to the surface base and
    /// transformed by the viewport) before calling this.
    pub fn render_overlay(&self, ctx: &cairo::Context) -> Result<(), cairo::Error> {
        for region in self.model.regions() {
            self.render_region_on_screen(ctx, region)?;
        }

        if let GestureState::DrawingRegion { start, current } = self.gesture {
            let provisional = Region::from_drag(start, current, self.surface_base);
            self.render_region_on_screen(ctx, &provisional)?;
        }

        let radius = self.screen_marker_radius();
        for marker in self.model.markers() {
            let Some(center) =
                viewport::normalized_to_screen(marker.position(), &self.viewport, self.surface_base)
            else {
                continue;
            };
            render_marker(
                ctx,
                center.x,
                center.y,
                radius,
                marker.is_complete(),
                marker.label(),
                &self.marker_style,
            )?;
        }
        Ok(())
    }

    fn render_region_on_screen(
        &self,
        ctx: &cairo::Context,
        region: &Region,
    ) -> Result<(), cairo::Error> {
        let Some((x, y, w, h)) =
            region.scaled_to(self.surface_base.width, self.surface_base.height)
        else {
            return Ok(());
        };
        let scale = self.viewport.scale();
        let origin = self.viewport.world_to_screen(Point::new(x, y));
        render_region(
            ctx,
            origin.x,
            origin.y,
            w * scale,
            h * scale,
            &self.region_style,
            scale,
        )
    }
}
