//! Cairo-based rendering functions for markers, regions and the export footer.
//!
//! Cairo drawing calls return `Result`s that only fail once the context is
//! already in an error state; we propagate them so the exporter can abort
//! instead of writing a half-drawn raster.

use super::color::Color;
use super::font::FontDescriptor;
use super::style::{FooterStyle, MarkerStyle, RegionStyle};
use std::f64::consts::PI;

/// Renders a single point marker: filled disc, outline ring, centred label.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `center_x` - Marker centre X in raster pixels
/// * `center_y` - Marker centre Y in raster pixels
/// * `radius` - Disc radius in pixels
/// * `complete` - Whether the marker's metadata is complete (selects the fill)
/// * `label` - Text drawn inside the disc (skipped when empty)
/// * `style` - Marker colors and font
pub fn render_marker(
    ctx: &cairo::Context,
    center_x: f64,
    center_y: f64,
    radius: f64,
    complete: bool,
    label: &str,
    style: &MarkerStyle,
) -> Result<(), cairo::Error> {
    let radius = radius.max(1.0);
    let fill = style.fill_for(complete);

    ctx.save()?;
    ctx.set_antialias(cairo::Antialias::Best);

    fill.apply(ctx);
    ctx.arc(center_x, center_y, radius, 0.0, PI * 2.0);
    ctx.fill()?;

    style.outline.apply(ctx);
    ctx.set_line_width(style.outline_width(radius));
    ctx.arc(center_x, center_y, radius, 0.0, PI * 2.0);
    ctx.stroke()?;

    if !label.is_empty() {
        render_centered_text(
            ctx,
            center_x,
            center_y,
            label,
            fill.contrasting(),
            &style.font,
            radius,
        )?;
    }

    ctx.restore()
}

/// Renders a filled, outlined progress region.
///
/// `line_scale` converts the style's outline width from capture-surface pixels
/// to the target raster.
pub fn render_region(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    style: &RegionStyle,
    line_scale: f64,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_line_join(cairo::LineJoin::Miter);

    style.fill.apply(ctx);
    ctx.rectangle(x, y, w, h);
    ctx.fill()?;

    style.outline.apply(ctx);
    ctx.set_line_width((style.outline_width * line_scale).max(1.0));
    ctx.rectangle(x, y, w, h);
    ctx.stroke()?;

    ctx.restore()
}

/// Burns a footer bar across the bottom of the raster with the given text.
///
/// `scale` converts the style's capture-surface measurements to the raster.
pub fn render_footer(
    ctx: &cairo::Context,
    width: f64,
    height: f64,
    text: &str,
    style: &FooterStyle,
    scale: f64,
) -> Result<(), cairo::Error> {
    let bar_height = (style.height * scale).min(height);
    let top = height - bar_height;

    ctx.save()?;
    style.background.apply(ctx);
    ctx.rectangle(0.0, top, width, bar_height);
    ctx.fill()?;

    let layout = pangocairo::functions::create_layout(ctx);
    let font = style.font.to_font_description(style.font_size * scale);
    layout.set_font_description(Some(&font));
    layout.set_text(text);
    let (_ink, logical) = layout.pixel_extents();

    style.text.apply(ctx);
    ctx.move_to(
        style.inset * scale,
        top + (bar_height - logical.height() as f64) / 2.0,
    );
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore()
}

/// Renders a single line of text centred on `(center_x, center_y)`.
///
/// The text is sized so its em height is `radius`, which keeps labels of one
/// or two digits inside a marker disc.
pub fn render_centered_text(
    ctx: &cairo::Context,
    center_x: f64,
    center_y: f64,
    text: &str,
    color: Color,
    font: &FontDescriptor,
    radius: f64,
) -> Result<(), cairo::Error> {
    ctx.save()?;

    let layout = pangocairo::functions::create_layout(ctx);
    let desc = font.to_font_description(radius);
    layout.set_font_description(Some(&desc));
    layout.set_text(text);

    // Use logical extents so digits sit on a stable baseline regardless of glyph shape
    let (_ink, logical) = layout.pixel_extents();
    let left = center_x - logical.width() as f64 / 2.0 - logical.x() as f64;
    let top = center_y - logical.height() as f64 / 2.0 - logical.y() as f64;

    color.apply(ctx);
    ctx.move_to(left, top);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore()
}
