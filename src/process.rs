//! Batch transformation.
//!
//! A [`Processor`] applies one [`Transform`] to every image under its source
//! root and writes each result to the mirrored path under its destination
//! root. All six operations share one driver, [`Processor::run`]; the named
//! entry points ([`Processor::resize`], [`Processor::crop`], ...) only build
//! the transform.
//!
//! ## Per-file pipeline
//!
//! ```text
//! open → transform → derive destination → create parent dirs → save
//! ```
//!
//! Each step's failure becomes a [`TransformError`] for that file alone. The
//! batch always runs to the end of its file list, and the returned
//! [`BatchReport`] holds one [`FileOutcome`] per discovered image, in
//! discovery order.
//!
//! Only configuration-class problems abort an invocation with a
//! [`ProcessError`]: a missing source root, invalid parameters, or a worker
//! pool that cannot start. These are checked before any file is written.
//!
//! ## Output structure
//!
//! ```text
//! photos/                    processed/
//! ├── cat.jpg        ──►     ├── cat.jpg
//! └── dog/                   └── dog/            (created on demand)
//!     └── pup.png    ──►         └── pup.png     (pup.jpeg after convert jpg)
//! ```
//!
//! ## Parallel processing
//!
//! Files are processed on a local [rayon](https://docs.rs/rayon) pool sized by
//! [`ProcessorConfig::max_workers`]. `Some(1)` gives strictly sequential
//! processing. Progress events, when requested, arrive in completion order;
//! the report is always in discovery order.

use crate::config::{ConfigError, ProcessorConfig, effective_threads};
use crate::imaging::{
    BackendError, ImageBackend, OutputFormat, RustBackend, Transform, TransformParseError,
};
use crate::naming::{self, NamingError};
use crate::scan::{self, Discovery, ScanError, SkippedEntry};
use rayon::prelude::*;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Errors that abort a whole invocation.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    Scan(#[from] ScanError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    InvalidTransform(#[from] TransformParseError),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single file was not written. Tagged by pipeline step.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("cannot open image: {0}")]
    Open(#[source] BackendError),
    #[error("transform failed: {0}")]
    Transform(#[source] BackendError),
    #[error("cannot derive destination: {0}")]
    Path(#[from] NamingError),
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Result of processing one discovered image.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Destination written, or why nothing was.
    pub result: Result<PathBuf, TransformError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for FileOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FileOutcome", 3)?;
        s.serialize_field("source", &self.source)?;
        match &self.result {
            Ok(dest) => {
                s.serialize_field("destination", &Some(dest))?;
                s.serialize_field("error", &None::<String>)?;
            }
            Err(e) => {
                s.serialize_field("destination", &None::<PathBuf>)?;
                s.serialize_field("error", &Some(e.to_string()))?;
            }
        }
        s.end()
    }
}

/// Everything one invocation did.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub transform: Transform,
    /// One entry per discovered image, in discovery order.
    pub outcomes: Vec<FileOutcome>,
    /// Entries the scan could not classify.
    pub skipped: Vec<SkippedEntry>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Destinations written, in discovery order.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }

    /// `(source, error)` for every file that was not written.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &TransformError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_path(), e)))
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        transform: Transform,
        image_count: usize,
    },
    EntrySkipped {
        path: PathBuf,
        reason: String,
    },
    ImageProcessed {
        /// 1-based position in discovery order.
        index: usize,
        source: PathBuf,
        destination: PathBuf,
    },
    ImageFailed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

/// Applies transforms from a source tree into a destination tree.
pub struct Processor<B: ImageBackend = RustBackend> {
    config: ProcessorConfig,
    backend: B,
    events: Option<Sender<ProcessEvent>>,
}

impl Processor<RustBackend> {
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_backend(config, RustBackend::new())
    }
}

impl<B: ImageBackend> Processor<B> {
    /// Use a specific backend (allows testing with a mock).
    pub fn with_backend(config: ProcessorConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            events: None,
        }
    }

    /// Send progress events to `sender` during each batch.
    pub fn with_events(mut self, sender: Sender<ProcessEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Scan the source root without transforming anything.
    pub fn discover(&self) -> Result<Discovery, ProcessError> {
        Ok(scan::collect_image_paths(self.config.source_root())?)
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Resize { width, height })
    }

    pub fn crop(
        &self,
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    ) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Crop {
            left,
            top,
            right,
            bottom,
        })
    }

    pub fn convert(&self, format: OutputFormat) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Convert { format })
    }

    pub fn rotate(&self, degrees: i32) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Rotate { degrees })
    }

    pub fn blur(&self, radius: f32) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Blur { radius })
    }

    pub fn grayscale(&self) -> Result<BatchReport, ProcessError> {
        self.run(Transform::Grayscale)
    }

    /// Apply `transform` to every image under the source root.
    ///
    /// The file list is collected afresh on every call. Existing outputs are
    /// overwritten; nothing is skipped as already done.
    pub fn run(&self, transform: Transform) -> Result<BatchReport, ProcessError> {
        self.config.validate()?;
        transform.validate()?;

        let discovery = scan::collect_image_paths(self.config.source_root())?;
        log::info!(
            "{}: {} images under {}",
            transform,
            discovery.images.len(),
            self.config.source_root().display()
        );
        self.emit(ProcessEvent::BatchStarted {
            transform,
            image_count: discovery.images.len(),
        });
        for entry in &discovery.skipped {
            self.emit(ProcessEvent::EntrySkipped {
                path: entry.path.clone(),
                reason: entry.reason.clone(),
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(effective_threads(self.config.max_workers))
            .build()?;

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            discovery
                .images
                .par_iter()
                .enumerate()
                .map(|(i, source)| {
                    let result = self.process_one(source, &transform);
                    self.report(i + 1, source, &result);
                    FileOutcome {
                        source: source.clone(),
                        result,
                    }
                })
                .collect()
        });

        let report = BatchReport {
            transform,
            outcomes,
            skipped: discovery.skipped,
        };
        log::info!(
            "{}: {} of {} images written, {} failed",
            transform,
            report.succeeded(),
            report.total(),
            report.failed()
        );
        Ok(report)
    }

    /// open → transform → derive → mkdir → save for one file.
    ///
    /// The decoded image is dropped when this returns, on success or failure.
    fn process_one(&self, source: &Path, transform: &Transform) -> Result<PathBuf, TransformError> {
        let image = self.backend.open(source).map_err(TransformError::Open)?;
        let transformed = self
            .backend
            .apply(image, transform)
            .map_err(TransformError::Transform)?;

        let destination = naming::destination_path(
            self.config.source_root(),
            self.config.dest_root(),
            source,
            transform.output_format(),
        )?;
        if let Some(parent) = destination.parent() {
            // create_dir_all tolerates another worker creating it concurrently
            std::fs::create_dir_all(parent).map_err(|e| TransformError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let format = transform.output_format().unwrap_or(transformed.format);
        self.backend
            .save(transformed, &destination, format)
            .map_err(|e| TransformError::Save {
                path: destination.clone(),
                source: e,
            })?;
        Ok(destination)
    }

    fn report(&self, index: usize, source: &Path, result: &Result<PathBuf, TransformError>) {
        match result {
            Ok(destination) => {
                log::debug!("{} → {}", source.display(), destination.display());
                self.emit(ProcessEvent::ImageProcessed {
                    index,
                    source: source.to_path_buf(),
                    destination: destination.clone(),
                });
            }
            Err(e) => {
                log::warn!("An error occurred while processing {}: {}", source.display(), e);
                self.emit(ProcessEvent::ImageFailed {
                    index,
                    source: source.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }
}
