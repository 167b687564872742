//! Pure geometry for transforms. No image data, no I/O.

/// Fold any angle into `0..360`.
pub fn normalize_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Size of the canvas that fully contains a `width`×`height` image rotated by
/// `degrees`.
///
/// Right angles are exact. Other angles round up, with a small tolerance so
/// floating-point noise does not add a spurious pixel.
pub fn rotated_bounds(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    match normalize_degrees(degrees) {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        d => {
            let theta = (d as f64).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let (w, h) = (width as f64, height as f64);
            let new_w = (w * cos + h * sin - 1e-6).ceil().max(1.0);
            let new_h = (w * sin + h * cos - 1e-6).ceil().max(1.0);
            (new_w as u32, new_h as u32)
        }
    }
}

/// Pixel region for a crop box: `(x, y, width, height)`.
///
/// The box covers `[left, right) × [top, bottom)` and must be non-empty and
/// lie inside a `width`×`height` image. A box that reaches past the edge is
/// an error; it is never clamped to the image or padded with fill.
pub fn crop_region(
    (width, height): (u32, u32),
    (left, top, right, bottom): (u32, u32, u32, u32),
) -> Result<(u32, u32, u32, u32), String> {
    if right <= left || bottom <= top {
        return Err(format!(
            "crop box ({left}, {top}, {right}, {bottom}) is empty or inverted"
        ));
    }
    if right > width || bottom > height {
        return Err(format!(
            "crop box ({left}, {top}, {right}, {bottom}) exceeds image bounds {width}x{height}"
        ));
    }
    Ok((left, top, right - left, bottom - top))
}
