//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the batch driver in [`process`](crate::process) (which
//! decides which files to touch and where results go) and the
//! [`backend`](super::backend) (which does the pixel work). Keeping them
//! separate lets the driver be tested against a mock backend.
//!
//! ## Types
//!
//! - [`Transform`]: one of the six batch operations with its parameters.
//! - [`OutputFormat`]: an encodable target format. `jpg` is accepted as an
//!   alias and canonicalized to [`OutputFormat::Jpeg`].

use image::ImageFormat;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformParseError {
    #[error("Unsupported output format: {0} (expected one of jpg, jpeg, png, gif, webp, tif, tiff)")]
    UnknownFormat(String),
    #[error("Invalid transform parameters: {0}")]
    InvalidParameters(String),
}

/// A format the batch can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
}

impl OutputFormat {
    /// Canonical lowercase name. Also the extension written for conversions.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }

    /// Map a decoded format back to a writable one. `None` for formats this
    /// crate has no encoder for.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::Gif => Some(OutputFormat::Gif),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            ImageFormat::Tiff => Some(OutputFormat::Tiff),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TransformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            // The encoder only knows "jpeg"; "jpg" is the informal name.
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "gif" => Ok(OutputFormat::Gif),
            "webp" => Ok(OutputFormat::WebP),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            _ => Err(TransformParseError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A single batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transform {
    /// Stretch to exactly `width`×`height`; aspect ratio is not preserved.
    Resize { width: u32, height: u32 },
    /// Keep the box `[left, right) × [top, bottom)`.
    Crop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    },
    /// Re-encode as `format`.
    Convert { format: OutputFormat },
    /// Counter-clockwise, canvas expanded to fit.
    Rotate { degrees: i32 },
    /// Gaussian blur; `radius` is the standard deviation.
    Blur { radius: f32 },
    /// Single-channel luminance.
    Grayscale,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Resize { .. } => "resize",
            Transform::Crop { .. } => "crop",
            Transform::Convert { .. } => "convert",
            Transform::Rotate { .. } => "rotate",
            Transform::Blur { .. } => "blur",
            Transform::Grayscale => "grayscale",
        }
    }

    /// The format to save with, when it differs from the source's.
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            Transform::Convert { format } => Some(*format),
            _ => None,
        }
    }

    /// Reject parameters that would fail for every file.
    ///
    /// Crop boxes are not checked here: whether a box fits depends on each
    /// image's dimensions, so that check happens per file.
    pub fn validate(&self) -> Result<(), TransformParseError> {
        match *self {
            Transform::Resize { width, height } if width == 0 || height == 0 => {
                Err(TransformParseError::InvalidParameters(format!(
                    "resize dimensions must be positive, got {width}x{height}"
                )))
            }
            Transform::Blur { radius } if !radius.is_finite() || radius < 0.0 => {
                Err(TransformParseError::InvalidParameters(format!(
                    "blur radius must be a non-negative number, got {radius}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Resize { width, height } => write!(f, "resize to {width}x{height}"),
            Transform::Crop {
                left,
                top,
                right,
                bottom,
            } => write!(f, "crop to ({left}, {top}, {right}, {bottom})"),
            Transform::Convert { format } => write!(f, "convert to {format}"),
            Transform::Rotate { degrees } => write!(f, "rotate by {degrees}°"),
            Transform::Blur { radius } => write!(f, "blur with radius {radius}"),
            Transform::Grayscale => f.write_str("grayscale"),
        }
    }
}
