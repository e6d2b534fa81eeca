//! Source image probing, bounded decoding and conversion to a Cairo surface.

use super::types::{ExportError, ExportLimits};
use image::imageops::FilterType;
use image::{ImageError, ImageReader, RgbaImage};
use std::io::Cursor;

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, ExportError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExportError::Decode(e.to_string()))
}

/// Reads the image dimensions from the header without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), ExportError> {
    let (width, height) = reader(bytes)?
        .into_dimensions()
        .map_err(|e| ExportError::Decode(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(ExportError::Decode(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    Ok((width, height))
}

/// Rejects sources larger than the hard bounds.
pub fn check_capacity(width: u32, height: u32, limits: &ExportLimits) -> Result<(), ExportError> {
    if width.max(height) > limits.max_source_dimension {
        return Err(ExportError::Capacity {
            width,
            height,
            reason: format!("longest edge above {} px", limits.max_source_dimension),
        });
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > limits.max_source_pixels {
        return Err(ExportError::Capacity {
            width,
            height,
            reason: format!("more than {} pixels", limits.max_source_pixels),
        });
    }
    Ok(())
}

/// Decodes the full-resolution image after the header passed [`check_capacity`].
///
/// Decoder limits are set to the same bounds, so a header that lies about its
/// size still cannot allocate past them.
pub fn decode_bounded(bytes: &[u8], limits: &ExportLimits) -> Result<RgbaImage, ExportError> {
    let (width, height) = probe_dimensions(bytes)?;
    check_capacity(width, height, limits)?;

    let mut decoder_limits = image::Limits::default();
    decoder_limits.max_image_width = Some(limits.max_source_dimension);
    decoder_limits.max_image_height = Some(limits.max_source_dimension);

    let mut reader = reader(bytes)?;
    reader.limits(decoder_limits);
    let decoded = reader.decode().map_err(|e| match e {
        ImageError::Limits(limit) => ExportError::Capacity {
            width,
            height,
            reason: limit.to_string(),
        },
        other => ExportError::Decode(other.to_string()),
    })?;

    log::debug!("Decoded source image {width}x{height}");
    Ok(decoded.to_rgba8())
}

/// Output size after fitting `(width, height)` inside `max_dimension`, preserving aspect ratio.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || max_dimension == 0 {
        return (width, height);
    }
    let ratio = f64::from(max_dimension) / f64::from(longest);
    let scaled = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Downscales in a single step when either edge exceeds `max_dimension`.
pub fn downscale(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (target_w, target_h) = fit_within(width, height, max_dimension);
    if (target_w, target_h) == (width, height) {
        return image;
    }
    log::info!("Downscaling export raster {width}x{height} -> {target_w}x{target_h}");
    image::imageops::resize(&image, target_w, target_h, FilterType::Triangle)
}

/// Premultiplies one straight-alpha RGBA pixel into Cairo's native-endian ARGB32 word.
fn premultiplied_argb(pixel: [u8; 4]) -> u32 {
    let [r, g, b, a] = pixel;
    let premultiply = |c: u8| -> u32 { (u32::from(c) * u32::from(a) + 127) / 255 };
    (u32::from(a) << 24) | (premultiply(r) << 16) | (premultiply(g) << 8) | premultiply(b)
}

/// Copies an RGBA raster into a new ARGB32 Cairo surface.
pub fn to_cairo_surface(image: &RgbaImage) -> Result<cairo::ImageSurface, ExportError> {
    let (width, height) = image.dimensions();
    let format = cairo::Format::ARgb32;
    let width_i32 = i32::try_from(width).map_err(|_| ExportError::Capacity {
        width,
        height,
        reason: "width exceeds surface limits".to_string(),
    })?;
    let height_i32 = i32::try_from(height).map_err(|_| ExportError::Capacity {
        width,
        height,
        reason: "height exceeds surface limits".to_string(),
    })?;
    let stride = format.stride_for_width(width)?;
    let stride_bytes = stride as usize;

    let mut data = vec![0u8; stride_bytes * height as usize];
    for (y, row) in image.rows().enumerate() {
        let start = y * stride_bytes;
        for (x, pixel) in row.enumerate() {
            let offset = start + x * 4;
            data[offset..offset + 4].copy_from_slice(&premultiplied_argb(pixel.0).to_ne_bytes());
        }
    }

    let surface =
        cairo::ImageSurface::create_for_data(data, format, width_i32, height_i32, stride)?;
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn probe_reads_header_dimensions() {
        assert_eq!(probe_dimensions(&png_bytes(7, 3)).unwrap(), (7, 3));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = probe_dimensions(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ExportError::Decode(_)));
    }

    #[test]
    fn capacity_checks_edge_and_pixel_count() {
        let limits = ExportLimits {
            max_export_dimension: 4096,
            max_source_dimension: 100,
            max_source_pixels: 5000,
        };
        assert!(check_capacity(100, 50, &limits).is_ok());
        assert!(matches!(
            check_capacity(101, 1, &limits),
            Err(ExportError::Capacity { width: 101, .. })
        ));
        assert!(matches!(
            check_capacity(100, 51, &limits),
            Err(ExportError::Capacity { height: 51, .. })
        ));
    }

    #[test]
    fn decode_rejects_oversized_source_before_decoding() {
        let limits = ExportLimits {
            max_export_dimension: 4096,
            max_source_dimension: 16,
            max_source_pixels: 1_000,
        };
        let err = decode_bounded(&png_bytes(32, 8), &limits).unwrap_err();
        assert!(matches!(err, ExportError::Capacity { .. }));
    }

    #[test]
    fn fit_within_preserves_aspect_ratio() {
        assert_eq!(fit_within(8000, 4000, 4096), (4096, 2048));
        assert_eq!(fit_within(3000, 6000, 4096), (2048, 4096));
        assert_eq!(fit_within(1000, 500, 4096), (1000, 500));
    }

    #[test]
    fn downscale_is_single_step_to_bound() {
        let image = RgbaImage::new(300, 100);
        assert_eq!(downscale(image, 150).dimensions(), (150, 50));
    }

    #[test]
    fn premultiplies_alpha() {
        assert_eq!(premultiplied_argb([255, 0, 0, 255]), 0xFFFF_0000);
        assert_eq!(premultiplied_argb([255, 255, 255, 0]), 0);
        assert_eq!(premultiplied_argb([200, 100, 0, 128]) >> 24, 128);
        assert_eq!((premultiplied_argb([200, 100, 0, 128]) >> 16) & 0xFF, 100);
    }

    #[test]
    fn surface_matches_source_size() {
        let image = RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 255]));
        let surface = to_cairo_surface(&image).unwrap();
        assert_eq!((surface.width(), surface.height()), (5, 4));
    }
}
