//! Shared test utilities: synthetic image fixtures on disk.
//!
//! Images are generated with the `image` encoders at test time, so there are
//! no binary fixtures to keep in sync.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_test_image(&tmp.path().join("dog/pup.png"), 200, 200, OutputFormat::Png);
//! write_corrupt(&tmp.path().join("broken.jpg"));
//! ```

use crate::imaging::OutputFormat;
use crate::imaging::operations::fit_for_format;
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// Write a gradient image of the given size and format, creating parents.
pub fn write_test_image(path: &Path, width: u32, height: u32, format: OutputFormat) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    fit_for_format(img, format)
        .save_with_format(path, format.image_format())
        .unwrap();
}

/// Write bytes that no decoder accepts, creating parents.
pub fn write_corrupt(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"this is not an image, just text pretending").unwrap();
}

/// Create an empty file, creating parents. Enough for tests that use the
/// mock backend and never decode.
pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}
