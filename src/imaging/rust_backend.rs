//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Transforms | [`operations::apply_transform`](super::operations::apply_transform) |
//! | Encode | `DynamicImage::write_to` with an explicit `ImageFormat` |
//!
//! GIF decoding keeps only the first frame.

use super::backend::{BackendError, ImageBackend, LoadedImage};
use super::operations::{apply_transform, fit_for_format};
use super::params::{OutputFormat, Transform};
use image::{ImageError, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Sniff the format from content, falling back to the extension, and decode.
fn load_image(path: &Path) -> Result<LoadedImage, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .and_then(OutputFormat::from_image_format)
        .ok_or_else(|| BackendError::UnrecognizedFormat(path.to_path_buf()))?;
    let pixels = reader.decode().map_err(|e| match e {
        ImageError::IoError(io) => BackendError::Io(io),
        ImageError::Unsupported(_) => BackendError::UnrecognizedFormat(path.to_path_buf()),
        other => BackendError::Decode {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;
    Ok(LoadedImage { pixels, format })
}

/// Encode to `path`. A failed encode removes the partial file.
fn save_image(image: LoadedImage, path: &Path, format: OutputFormat) -> Result<(), BackendError> {
    let fitted = fit_for_format(image.pixels, format);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let result = fitted
        .write_to(&mut writer, format.image_format())
        .map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
        .and_then(|()| writer.flush().map_err(BackendError::Io));

    if result.is_err() {
        drop(writer);
        let _ = std::fs::remove_file(path);
    }
    result
}

impl ImageBackend for RustBackend {
    fn open(&self, path: &Path) -> Result<LoadedImage, BackendError> {
        load_image(path)
    }

    fn apply(&self, image: LoadedImage, transform: &Transform) -> Result<LoadedImage, BackendError> {
        let format = image.format;
        let pixels = apply_transform(image.pixels, transform)?;
        Ok(LoadedImage { pixels, format })
    }

    fn save(
        &self,
        image: LoadedImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), BackendError> {
        save_image(image, path, format)
    }
}
