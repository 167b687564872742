//! Processor configuration.
//!
//! There is no configuration file. A [`ProcessorConfig`] is built once (from
//! CLI flags in the binary, or directly by library callers) and then held
//! immutably by a [`Processor`](crate::process::Processor). Every batch reads
//! its roots from that value; nothing is shared or mutated behind the caller's
//! back.
//!
//! ## Fields
//!
//! | Field | Meaning |
//! |---|---|
//! | `source_root` | Tree scanned for input images. Must exist when a batch runs. |
//! | `dest_root` | Tree that receives the mirrored outputs. Created on demand. |
//! | `max_workers` | Upper bound on parallel per-file workers (`None` = all cores). |
//!
//! The two roots may overlap. Nothing guards against it, so a destination
//! inside the source tree will be rediscovered (and reprocessed) by later runs.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Roots and worker settings for a batch processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

impl ProcessorConfig {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            max_workers: None,
        }
    }

    /// Cap the worker pool. `Some(1)` processes files strictly one at a time.
    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Reject values that would make a batch unrunnable.
    ///
    /// Root existence is deliberately not checked here: the source root is
    /// verified at traversal time, so a config built before the directory
    /// appears is still usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == Some(0) {
            return Err(ConfigError::Validation(
                "max_workers must be at least 1".into(),
            ));
        }
        if self.source_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source root must not be empty".into(),
            ));
        }
        if self.dest_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "destination root must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }
}

/// Resolve the effective worker count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(max_workers: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_workers.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}
