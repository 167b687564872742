//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three steps the batch driver needs
//! from a codec: open, apply a [`Transform`], and save. The driver owns
//! everything between those steps (destination naming, directory creation,
//! error bookkeeping), so a backend never sees the source or destination
//! roots.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image` and
//! `imageproc` crates.

use super::params::{OutputFormat, Transform};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unrecognized image format: {0}")]
    UnrecognizedFormat(PathBuf),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

/// A decoded image together with the format it was decoded from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixels: DynamicImage,
    /// Format of the source file. Non-convert operations save with this.
    pub format: OutputFormat,
}

impl LoadedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Decode the file at `path`.
    fn open(&self, path: &Path) -> Result<LoadedImage, BackendError>;

    /// Apply `transform`, consuming the input image.
    fn apply(&self, image: LoadedImage, transform: &Transform)
    -> Result<LoadedImage, BackendError>;

    /// Encode `image` as `format` and write it to `path`, consuming it.
    ///
    /// The parent directory must already exist.
    fn save(
        &self,
        image: LoadedImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels or disk.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    pub struct MockBackend {
        pub dimensions: (u32, u32),
        pub format: OutputFormat,
        /// File names (not full paths) whose `open` fails.
        pub unreadable: Mutex<HashSet<String>>,
        /// File names whose `save` fails.
        pub unwritable: Mutex<HashSet<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Open(String),
        Apply(Transform),
        Save { output: String, format: OutputFormat },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                dimensions: (8, 6),
                format: OutputFormat::Png,
                unreadable: Mutex::new(HashSet::new()),
                unwritable: Mutex::new(HashSet::new()),
                operations: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_unreadable(names: &[&str]) -> Self {
            let backend = Self::default();
            backend
                .unreadable
                .lock()
                .unwrap()
                .extend(names.iter().map(|n| n.to_string()));
            backend
        }

        pub fn with_unwritable(names: &[&str]) -> Self {
            let backend = Self::default();
            backend
                .unwritable
                .lock()
                .unwrap()
                .extend(names.iter().map(|n| n.to_string()));
            backend
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn saved_outputs(&self) -> Vec<String> {
            let mut outputs: Vec<String> = self
                .get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Save { output, .. } => Some(output),
                    _ => None,
                })
                .collect();
            outputs.sort();
            outputs
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    impl ImageBackend for MockBackend {
        fn open(&self, path: &Path) -> Result<LoadedImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Open(path.to_string_lossy().to_string()));

            if self.unreadable.lock().unwrap().contains(&file_name(path)) {
                return Err(BackendError::UnrecognizedFormat(path.to_path_buf()));
            }
            let (w, h) = self.dimensions;
            Ok(LoadedImage {
                pixels: DynamicImage::new_rgb8(w, h),
                format: self.format,
            })
        }

        fn apply(
            &self,
            image: LoadedImage,
            transform: &Transform,
        ) -> Result<LoadedImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Apply(*transform));
            Ok(image)
        }

        fn save(
            &self,
            _image: LoadedImage,
            path: &Path,
            format: OutputFormat,
        ) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Save {
                output: path.to_string_lossy().to_string(),
                format,
            });
            if self.unwritable.lock().unwrap().contains(&file_name(path)) {
                return Err(BackendError::Encode {
                    path: path.to_path_buf(),
                    reason: "mock encoder refused".into(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_open_apply_save() {
        let backend = MockBackend::new();

        let image = backend.open(Path::new("/test/image.png")).unwrap();
        assert_eq!(image.dimensions(), (8, 6));
        let image = backend.apply(image, &Transform::Grayscale).unwrap();
        backend
            .save(image, Path::new("/out/image.png"), OutputFormat::Png)
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[0], RecordedOp::Open(p) if p == "/test/image.png"));
        assert_eq!(ops[1], RecordedOp::Apply(Transform::Grayscale));
        assert!(matches!(
            &ops[2],
            RecordedOp::Save { output, format: OutputFormat::Png } if output == "/out/image.png"
        ));
    }

    #[test]
    fn mock_unreadable_file_fails_open() {
        let backend = MockBackend::with_unreadable(&["broken.jpg"]);
        let result = backend.open(Path::new("/test/broken.jpg"));
        assert!(matches!(result, Err(BackendError::UnrecognizedFormat(_))));
        assert!(backend.open(Path::new("/test/fine.jpg")).is_ok());
    }

    #[test]
    fn backend_error_messages_name_the_file() {
        let err = BackendError::Decode {
            path: PathBuf::from("/in/cat.jpg"),
            reason: "truncated".into(),
        };
        assert_eq!(err.to_string(), "Failed to decode /in/cat.jpg: truncated");
    }
}
