//! Pixel operations on decoded images.
//!
//! Everything here works on an in-memory [`DynamicImage`]; decoding and
//! encoding live in [`rust_backend`](super::rust_backend).

use super::backend::BackendError;
use super::calculations::{crop_region, normalize_degrees, rotated_bounds};
use super::params::{OutputFormat, Transform};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Apply `transform` to `img`.
///
/// [`Transform::Convert`] leaves the pixels untouched; the format change
/// happens when the image is saved.
pub fn apply_transform(img: DynamicImage, transform: &Transform) -> Result<DynamicImage> {
    match *transform {
        Transform::Resize { width, height } => {
            if width == 0 || height == 0 {
                return Err(BackendError::InvalidTransform(format!(
                    "cannot resize to {width}x{height}"
                )));
            }
            Ok(img.resize_exact(width, height, FilterType::Lanczos3))
        }
        Transform::Crop {
            left,
            top,
            right,
            bottom,
        } => {
            let (x, y, w, h) = crop_region(img.dimensions(), (left, top, right, bottom))
                .map_err(BackendError::InvalidTransform)?;
            Ok(img.crop_imm(x, y, w, h))
        }
        Transform::Convert { .. } => Ok(img),
        Transform::Rotate { degrees } => Ok(rotate_expanded(img, degrees)),
        Transform::Blur { radius } => blur(img, radius),
        Transform::Grayscale => Ok(DynamicImage::ImageLuma8(img.to_luma8())),
    }
}

/// Gaussian blur with `radius` as sigma.
///
/// The kernel grows with sigma, so sigma is capped at the image's longer side.
/// Past that the result is already a near-uniform average.
fn blur(img: DynamicImage, radius: f32) -> Result<DynamicImage> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(BackendError::InvalidTransform(format!(
            "blur radius must be non-negative, got {radius}"
        )));
    }
    if radius == 0.0 {
        return Ok(img);
    }
    let (width, height) = img.dimensions();
    let sigma = radius.min(width.max(height) as f32);
    Ok(img.blur(sigma))
}

/// Rotate counter-clockwise, growing the canvas so no corner is cut off.
///
/// Right angles use the lossless transposes. Other angles are resampled
/// bilinearly; uncovered canvas is transparent where the image has alpha and
/// black otherwise.
pub fn rotate_expanded(img: DynamicImage, degrees: i32) -> DynamicImage {
    match normalize_degrees(degrees) {
        0 => img,
        // image's rotate90 is clockwise
        90 => img.rotate270(),
        180 => img.rotate180(),
        270 => img.rotate90(),
        d => rotate_arbitrary(&img, d),
    }
}

fn rotate_arbitrary(img: &DynamicImage, degrees: i32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (out_w, out_h) = rotated_bounds(width, height, degrees);

    // The working canvas must hold the image both before and after rotation.
    let work_w = out_w.max(width);
    let work_h = out_h.max(height);
    let mut canvas = RgbaImage::new(work_w, work_h);
    image::imageops::overlay(
        &mut canvas,
        &img.to_rgba8(),
        ((work_w - width) / 2) as i64,
        ((work_h - height) / 2) as i64,
    );

    // imageproc rotates clockwise for positive theta
    let theta = -(degrees as f32).to_radians();
    let rotated = rotate_about_center(&canvas, theta, Interpolation::Bilinear, Rgba([0, 0, 0, 0]));

    let cropped = image::imageops::crop_imm(
        &rotated,
        (work_w - out_w) / 2,
        (work_h - out_h) / 2,
        out_w,
        out_h,
    )
    .to_image();

    restore_color(DynamicImage::ImageRgba8(cropped), img.color())
}

/// Bring an RGBA working image back to the channel layout of the original.
fn restore_color(img: DynamicImage, original: ColorType) -> DynamicImage {
    match original {
        ColorType::L8 | ColorType::L16 => DynamicImage::ImageLuma8(img.to_luma8()),
        ColorType::La8 | ColorType::La16 => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
            DynamicImage::ImageRgb8(img.to_rgb8())
        }
        _ => img,
    }
}

/// Convert `img` to a color type the encoder for `format` accepts.
///
/// JPEG has no alpha channel and only 8-bit samples. GIF is palette-based and
/// is fed RGBA. WebP is written as 8-bit RGB or RGBA. TIFF has no gray+alpha
/// layout, so those are widened to RGBA at the same depth. PNG takes
/// everything except floating point.
pub fn fit_for_format(img: DynamicImage, format: OutputFormat) -> DynamicImage {
    let color = img.color();
    match format {
        OutputFormat::Jpeg => match color {
            ColorType::L8 | ColorType::Rgb8 => img,
            ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                DynamicImage::ImageLuma8(img.to_luma8())
            }
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        },
        OutputFormat::Gif => match color {
            ColorType::Rgba8 => img,
            _ => DynamicImage::ImageRgba8(img.to_rgba8()),
        },
        OutputFormat::WebP => match color {
            ColorType::Rgb8 | ColorType::Rgba8 => img,
            c if c.has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        },
        OutputFormat::Tiff => match color {
            ColorType::La8 => DynamicImage::ImageRgba8(img.to_rgba8()),
            ColorType::La16 => DynamicImage::ImageRgba16(img.to_rgba16()),
            ColorType::Rgb32F | ColorType::Rgba32F => to_eight_bit(img),
            _ => img,
        },
        OutputFormat::Png => match color {
            ColorType::Rgb32F | ColorType::Rgba32F => to_eight_bit(img),
            _ => img,
        },
    }
}

fn to_eight_bit(img: DynamicImage) -> DynamicImage {
    let color = img.color();
    match (color.has_color(), color.has_alpha()) {
        (false, false) => DynamicImage::ImageLuma8(img.to_luma8()),
        (false, true) => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        (true, false) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (true, true) => DynamicImage::ImageRgba8(img.to_rgba8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn resize_is_exact_and_ignores_aspect() {
        let out = apply_transform(
            gradient(400, 300),
            &Transform::Resize {
                width: 100,
                height: 100,
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn resize_to_zero_is_error() {
        let result = apply_transform(
            gradient(10, 10),
            &Transform::Resize {
                width: 0,
                height: 5,
            },
        );
        assert!(matches!(result, Err(BackendError::InvalidTransform(_))));
    }

    #[test]
    fn crop_keeps_sub_rectangle() {
        let out = apply_transform(
            gradient(400, 300),
            &Transform::Crop {
                left: 10,
                top: 20,
                right: 110,
                bottom: 70,
            },
        )
        .unwrap();
        assert_eq!(out.dimensions(), (100, 50));
        // Top-left pixel of the crop came from (10, 20) in the source
        assert_eq!(out.to_rgb8().get_pixel(0, 0), &Rgb([10, 20, 128]));
    }

    #[test]
    fn crop_out_of_bounds_is_error() {
        let result = apply_transform(
            gradient(50, 50),
            &Transform::Crop {
                left: 0,
                top: 0,
                right: 60,
                bottom: 10,
            },
        );
        assert!(matches!(result, Err(BackendError::InvalidTransform(_))));
    }

    #[test]
    fn convert_leaves_pixels_alone() {
        let src = gradient(20, 10);
        let out = apply_transform(
            src.clone(),
            &Transform::Convert {
                format: OutputFormat::Png,
            },
        )
        .unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn rotate_90_swaps_dimensions() {
        let out = apply_transform(gradient(400, 300), &Transform::Rotate { degrees: 90 }).unwrap();
        assert_eq!(out.dimensions(), (300, 400));
    }

    #[test]
    fn rotate_90_is_counter_clockwise() {
        // Mark the top-right corner; counter-clockwise it ends up top-left.
        let mut img = GrayImage::new(4, 2);
        img.put_pixel(3, 0, Luma([255]));
        let out = rotate_expanded(DynamicImage::ImageLuma8(img), 90).to_luma8();
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn rotate_negative_90_is_clockwise() {
        let mut img = GrayImage::new(4, 2);
        img.put_pixel(3, 0, Luma([255]));
        let out = rotate_expanded(DynamicImage::ImageLuma8(img), -90).to_luma8();
        // Clockwise: top-right corner goes to bottom-right
        assert_eq!(out.get_pixel(1, 3), &Luma([255]));
    }

    #[test]
    fn rotate_full_turn_is_identity() {
        let src = gradient(30, 20);
        assert_eq!(rotate_expanded(src.clone(), 360), src);
        assert_eq!(rotate_expanded(src.clone(), 0), src);
    }

    #[test]
    fn rotate_arbitrary_expands_canvas_and_keeps_color_type() {
        let out = rotate_expanded(gradient(400, 300), 45);
        assert_eq!(out.dimensions(), (495, 495));
        assert_eq!(out.color(), ColorType::Rgb8);
        // Corners of the expanded canvas are fill, not image
        assert_eq!(out.to_rgb8().get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn rotate_arbitrary_keeps_alpha_transparent() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([9, 9, 9, 255])));
        let out = rotate_expanded(img, 30);
        assert_eq!(out.color(), ColorType::Rgba8);
        assert_eq!(out.to_rgba8().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn blur_keeps_dimensions_and_softens_edges() {
        let mut img = GrayImage::new(21, 21);
        img.put_pixel(10, 10, Luma([255]));
        let out = apply_transform(DynamicImage::ImageLuma8(img), &Transform::Blur { radius: 2.0 })
            .unwrap()
            .to_luma8();
        assert_eq!(out.dimensions(), (21, 21));
        assert!(out.get_pixel(10, 10)[0] < 255);
        assert!(out.get_pixel(11, 10)[0] > 0);
    }

    #[test]
    fn blur_zero_radius_is_identity() {
        let src = gradient(10, 10);
        let out = apply_transform(src.clone(), &Transform::Blur { radius: 0.0 }).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn grayscale_is_single_channel() {
        let out = apply_transform(gradient(10, 10), &Transform::Grayscale).unwrap();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!(out.dimensions(), (10, 10));
    }

    #[test]
    fn fit_for_jpeg_drops_alpha() {
        let img = DynamicImage::new_rgba8(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Jpeg).color(), ColorType::Rgb8);
        let gray = DynamicImage::new_luma_a8(4, 4);
        assert_eq!(fit_for_format(gray, OutputFormat::Jpeg).color(), ColorType::L8);
    }

    #[test]
    fn fit_for_gif_uses_rgba() {
        let img = DynamicImage::new_luma8(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Gif).color(), ColorType::Rgba8);
    }

    #[test]
    fn blur_huge_radius_is_capped_by_image_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 10, 10])));
        let out = apply_transform(img, &Transform::Blur { radius: 1e30 }).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn fit_for_webp_reduces_to_eight_bit() {
        let img = DynamicImage::new_rgba16(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::WebP).color(), ColorType::Rgba8);
        let gray = DynamicImage::new_luma_a8(4, 4);
        assert_eq!(fit_for_format(gray, OutputFormat::WebP).color(), ColorType::Rgba8);
        let gray = DynamicImage::new_luma16(4, 4);
        assert_eq!(fit_for_format(gray, OutputFormat::WebP).color(), ColorType::Rgb8);
    }

    #[test]
    fn fit_for_tiff_widens_gray_alpha() {
        let img = DynamicImage::new_luma_a8(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Tiff).color(), ColorType::Rgba8);
        let img = DynamicImage::new_luma_a16(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Tiff).color(), ColorType::Rgba16);
        let img = DynamicImage::new_luma16(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Tiff).color(), ColorType::L16);
    }

    #[test]
    fn fit_for_png_keeps_sixteen_bit() {
        let img = DynamicImage::new_rgb16(4, 4);
        assert_eq!(fit_for_format(img, OutputFormat::Png).color(), ColorType::Rgb16);
    }
}
