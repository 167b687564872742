//! Destination path derivation.
//!
//! Every output lands at the same relative path under the destination root as
//! its source has under the source root:
//!
//! ```text
//! source: photos/dog/pup.png   (root: photos/)
//! output: processed/dog/pup.png (root: processed/)
//! ```
//!
//! Conversions additionally swap the extension for the target format's
//! canonical one (`pup.png` → `pup.jpeg`). Only the last extension is
//! replaced, so `scan.v2.png` becomes `scan.v2.webp`.

use crate::imaging::OutputFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("{path} is not inside {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Mirror `source` from `source_root` into `dest_root`.
///
/// `format` is set for conversions; the extension is then replaced with
/// [`OutputFormat::extension`].
pub fn destination_path(
    source_root: &Path,
    dest_root: &Path,
    source: &Path,
    format: Option<OutputFormat>,
) -> Result<PathBuf, NamingError> {
    let relative = source
        .strip_prefix(source_root)
        .map_err(|_| NamingError::OutsideRoot {
            path: source.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;
    let mirrored = dest_root.join(relative);
    Ok(match format {
        Some(format) => mirrored.with_extension(format.extension()),
        None => mirrored,
    })
}
