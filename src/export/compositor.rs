//! Burns markers, regions and the footer into a full-resolution raster.

use super::decode;
use super::types::{ExportArtifact, ExportError, ExportOptions};
use crate::annotation::AnnotationSnapshot;
use crate::draw::{render_footer, render_marker, render_region};

/// Composes an annotated PNG from the source image bytes and a snapshot.
///
/// Markers are placed from their normalized positions on the export raster,
/// so the result does not depend on the viewport the annotations were made
/// in. Regions are scaled from the surface they were captured on. Any
/// failure aborts the export; no partial artifact is returned.
pub fn compose(
    image_bytes: &[u8],
    snapshot: &AnnotationSnapshot,
    options: &ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    log::info!(
        "Composing export: {} marker(s), {} region(s), {} source bytes",
        snapshot.markers.len(),
        snapshot.regions.len(),
        image_bytes.len()
    );

    if snapshot.is_empty() {
        log::debug!("No annotations; exporting the plain image");
    }

    let source = decode::decode_bounded(image_bytes, &options.limits)?;
    let raster = decode::downscale(source, options.limits.max_export_dimension);
    let (width, height) = raster.dimensions();
    let surface = decode::to_cairo_surface(&raster)?;
    drop(raster);

    {
        let ctx = cairo::Context::new(&surface)?;
        draw_annotations(&ctx, snapshot, options, f64::from(width), f64::from(height))?;
    }
    surface.flush();

    let mut png = Vec::new();
    surface
        .write_to_png(&mut png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    log::info!("Export composed: {width}x{height}, {} PNG bytes", png.len());
    Ok(ExportArtifact { png, width, height })
}

fn draw_annotations(
    ctx: &cairo::Context,
    snapshot: &AnnotationSnapshot,
    options: &ExportOptions,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    // Regions sit under the markers, as in the live overlay
    for region in &snapshot.regions {
        let Some((x, y, w, h)) = region.scaled_to(width, height) else {
            log::warn!("Skipping region captured on an empty surface");
            continue;
        };
        let line_scale = width / region.surface.width;
        render_region(ctx, x, y, w, h, &options.region_style, line_scale)?;
    }

    let radius = options.marker_style.radius_for_width(width);
    for marker in &snapshot.markers {
        let (cx, cy) = marker.position().to_pixels(width, height);
        render_marker(
            ctx,
            cx,
            cy,
            radius,
            marker.is_complete(),
            marker.label(),
            &options.marker_style,
        )?;
    }

    if let Some(text) = options.footer_text(snapshot.regions.len()) {
        render_footer(
            ctx,
            width,
            height,
            &text,
            &options.footer_style,
            footer_scale(snapshot, width),
        )?;
    }
    Ok(())
}

/// Ratio between the export raster and the surface the regions were drawn on.
///
/// Footer measurements are given in that surface's pixels; without regions
/// they are used as-is.
fn footer_scale(snapshot: &AnnotationSnapshot, width: f64) -> f64 {
    snapshot
        .regions
        .first()
        .map(|region| width / region.surface.width)
        .filter(|scale| scale.is_finite() && *scale > 0.0)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationModel, MarkerUpdate, Region};
    use crate::config::FooterPolicy;
    use crate::draw::color::{EMERALD, ROSE};
    use crate::export::FooterStamp;
    use crate::util::{NormalizedPoint, Size};
    use chrono::{Local, TimeZone};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn source_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([40, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn pixel(png: &[u8], x: u32, y: u32) -> [u8; 4] {
        image::load_from_memory(png).unwrap().to_rgba8().get_pixel(x, y).0
    }

    fn close_to(actual: [u8; 4], r: f64, g: f64, b: f64) -> bool {
        let near = |c: u8, v: f64| (f64::from(c) - v * 255.0).abs() <= 2.0;
        near(actual[0], r) && near(actual[1], g) && near(actual[2], b)
    }

    fn unlabeled_marker(model: &mut AnnotationModel, x: f64, y: f64) -> crate::annotation::MarkerId {
        let id = model.add_marker(NormalizedPoint::new(x, y)).id();
        model.update_marker(id, MarkerUpdate::Label(String::new())).unwrap();
        id
    }

    #[test]
    fn marker_lands_at_normalized_position() {
        let mut model = AnnotationModel::new();
        unlabeled_marker(&mut model, 50.0, 50.0);
        let artifact =
            compose(&source_png(1000, 500), &model.snapshot(), &ExportOptions::default()).unwrap();

        assert_eq!((artifact.width, artifact.height), (1000, 500));
        assert!(close_to(pixel(&artifact.png, 500, 250), ROSE.r, ROSE.g, ROSE.b));
        assert!(close_to(pixel(&artifact.png, 50, 50), 40.0 / 255.0, 40.0 / 255.0, 40.0 / 255.0));
    }

    #[test]
    fn fill_follows_completion() {
        let mut model = AnnotationModel::new();
        let id = model.add_marker(NormalizedPoint::new(20.0, 20.0)).id();
        model.update_marker(id, MarkerUpdate::Serial("S".into())).unwrap();
        model.update_marker(id, MarkerUpdate::Name("  ".into())).unwrap();
        let options = ExportOptions::default();

        // Sample beside the label glyph, inside the disc (radius 12 on a 400 px raster)
        let artifact = compose(&source_png(400, 400), &model.snapshot(), &options).unwrap();
        assert!(close_to(pixel(&artifact.png, 86, 80), ROSE.r, ROSE.g, ROSE.b));

        model.update_marker(id, MarkerUpdate::Name("N".into())).unwrap();
        let artifact = compose(&source_png(400, 400), &model.snapshot(), &options).unwrap();
        assert!(close_to(pixel(&artifact.png, 86, 80), EMERALD.r, EMERALD.g, EMERALD.b));
    }

    #[test]
    fn regions_scale_from_capture_surface() {
        let mut model = AnnotationModel::new();
        model.add_region(Region::new(10.0, 10.0, 40.0, 20.0, Size::new(100.0, 50.0)));
        let options = ExportOptions {
            footer_policy: FooterPolicy::Never,
            ..ExportOptions::default()
        };
        let artifact = compose(&source_png(1000, 500), &model.snapshot(), &options).unwrap();

        // Region covers (100, 100) .. (500, 300) on the export raster
        let inside = pixel(&artifact.png, 300, 200);
        assert!(inside[1] > inside[0], "region fill should be green-tinted: {inside:?}");
        let outside = pixel(&artifact.png, 700, 400);
        assert_eq!(&outside[..3], &[40, 40, 40]);
    }

    #[test]
    fn marker_inside_region_keeps_its_fill() {
        let mut model = AnnotationModel::new();
        model.add_region(Region::new(0.0, 0.0, 400.0, 400.0, Size::new(400.0, 400.0)));
        let id = unlabeled_marker(&mut model, 50.0, 50.0);
        let options = ExportOptions {
            footer_policy: FooterPolicy::Never,
            ..ExportOptions::default()
        };

        let artifact = compose(&source_png(400, 400), &model.snapshot(), &options).unwrap();
        assert!(close_to(pixel(&artifact.png, 200, 200), ROSE.r, ROSE.g, ROSE.b));

        model.update_marker(id, MarkerUpdate::Label("1".into())).unwrap();
        model.update_marker(id, MarkerUpdate::Serial("S".into())).unwrap();
        model.update_marker(id, MarkerUpdate::Name("N".into())).unwrap();
        let artifact = compose(&source_png(400, 400), &model.snapshot(), &options).unwrap();
        assert!(close_to(pixel(&artifact.png, 206, 200), EMERALD.r, EMERALD.g, EMERALD.b));
    }

    #[test]
    fn footer_bar_is_white_along_bottom() {
        let mut model = AnnotationModel::new();
        model.add_region(Region::new(0.0, 0.0, 10.0, 10.0, Size::new(1000.0, 500.0)));
        let stamp = FooterStamp::new(Local.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(), "op");
        let options = ExportOptions::default().with_stamp(stamp);
        let artifact = compose(&source_png(1000, 500), &model.snapshot(), &options).unwrap();

        assert_eq!(pixel(&artifact.png, 990, 498), [255, 255, 255, 255]);
        assert_eq!(&pixel(&artifact.png, 990, 470)[..3], &[40, 40, 40]);
    }

    #[test]
    fn large_source_is_downscaled() {
        let mut options = ExportOptions::default();
        options.limits.max_export_dimension = 256;
        let artifact = compose(&source_png(1024, 512), &AnnotationSnapshot::default(), &options)
            .unwrap();
        assert_eq!((artifact.width, artifact.height), (256, 128));
    }

    #[test]
    fn undecodable_source_fails_without_artifact() {
        let err = compose(b"not an image", &AnnotationSnapshot::default(), &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
    }
}
