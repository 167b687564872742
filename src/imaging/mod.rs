//! Image processing: decode, transform and encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Open** | `image::ImageReader` (format guessed from content, then extension) |
//! | **Resize** | `DynamicImage::resize_exact` with Lanczos3 |
//! | **Crop** | `DynamicImage::crop_imm` after bounds validation |
//! | **Rotate** | `rotate90/180/270` for right angles, `imageproc` for the rest |
//! | **Blur** | `DynamicImage::blur` (Gaussian) |
//! | **Grayscale** | `DynamicImage::to_luma8` |
//! | **Save** | `DynamicImage::write_to` after fitting the color type to the encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Parameters**: [`Transform`] and [`OutputFormat`], describing what to do
//! - **Operations**: pixel transforms on an in-memory [`DynamicImage`](image::DynamicImage)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, LoadedImage};
pub use params::{OutputFormat, Transform, TransformParseError};
pub use rust_backend::RustBackend;
