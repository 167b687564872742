//! Image discovery.
//!
//! Walks a source tree and collects every regular file whose extension is in
//! [`VALID_EXTENSIONS`]. This is the first step of every batch: the file list
//! is re-collected on each invocation and never cached between operations.
//!
//! ## Traversal rules
//!
//! ```text
//! photos/                 # source root (must exist, must be a directory)
//! ├── cat.JPG             # kept: extension match is case-insensitive
//! ├── notes.txt           # ignored: not an image extension
//! ├── album.png/          # descended: directories never count as images
//! │   └── pup.webp        # kept
//! └── dead-link.png -> ?  # skipped with a diagnostic, siblings still walked
//! ```
//!
//! Symlinks are followed, so each entry is classified as whatever its target
//! reports. Entries that are neither regular files nor directories (sockets,
//! FIFOs) are silently dropped.
//!
//! ## Errors
//!
//! Only the root is fatal: a missing or unlistable root fails the whole call
//! with a [`ScanError`]. Anything that goes wrong for an individual entry
//! (permission denied, broken symlink, symlink loop) is logged, recorded in
//! [`Discovery::skipped`], and traversal continues with the next sibling.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Recognized image extensions, lowercase, without the leading dot.
pub const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "tiff"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Image folder does not exist: {0}")]
    SourceNotFound(PathBuf),
    #[error("Image folder is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot list image folder {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An entry that could not be classified during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one traversal.
#[derive(Debug, Default, Serialize)]
pub struct Discovery {
    /// Image paths in walk order (depth-first, siblings sorted by file name).
    pub images: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

impl Discovery {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Case-insensitive check against [`VALID_EXTENSIONS`].
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| VALID_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)))
}

/// Collect every image under `root`, recursively.
pub fn collect_image_paths(root: &Path) -> Result<Discovery, ScanError> {
    check_root(root)?;

    let mut discovery = Discovery::default();
    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();

    for entry in walker {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_file() && is_image_path(entry.path()) {
                    discovery.images.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                log::warn!("Error processing file {}: {}", path.display(), err);
                discovery.skipped.push(SkippedEntry {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::debug!(
        "discovered {} images under {} ({} entries skipped)",
        discovery.images.len(),
        root.display(),
        discovery.skipped.len()
    );
    Ok(discovery)
}

/// The root must exist, be a directory, and be listable.
fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::SourceNotFound(root.to_path_buf()));
        }
        Err(source) => {
            return Err(ScanError::Unreadable {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}
