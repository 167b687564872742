//! # batch-imgproc
//!
//! Apply one image transform to every image in a directory tree and write the
//! results into a mirrored output tree.
//!
//! # Pipeline
//!
//! ```text
//! 1. Discover   source/  →  [image paths]     (recursive, by extension)
//! 2. Transform  each path →  destination file  (open → apply → place → save)
//! ```
//!
//! Discovery runs afresh on every invocation. Each file is handled
//! independently: a corrupt or unwritable file is recorded in the
//! [`BatchReport`](process::BatchReport) and the batch moves on. Only a
//! missing source root or invalid parameters stop an invocation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `ProcessorConfig`: source root, destination root, worker count |
//! | [`scan`] | Recursive image discovery with per-entry error isolation |
//! | [`naming`] | Destination path derivation (mirror + extension swap) |
//! | [`imaging`] | Backend trait, `image`/`imageproc` implementation, transform types |
//! | [`process`] | The batch driver, the six operations, progress events, reports |
//! | [`output`] | CLI output formatting |
//!
//! # Operations
//!
//! | Operation | Parameters | Result |
//! |---|---|---|
//! | resize | width, height | exact size, aspect ratio not preserved |
//! | crop | left, top, right, bottom | the pixel box `[left, right) × [top, bottom)` |
//! | convert | format | re-encoded; extension becomes the canonical one (`jpg` → `.jpeg`) |
//! | rotate | degrees | counter-clockwise, canvas expanded to fit |
//! | blur | radius | Gaussian blur |
//! | grayscale | — | single-channel luminance |
//!
//! Recognized inputs: `.jpg .jpeg .png .gif .webp .tiff`, any letter case.
//!
//! # Library use
//!
//! ```no_run
//! use batch_imgproc::config::ProcessorConfig;
//! use batch_imgproc::process::Processor;
//!
//! let processor = Processor::new(ProcessorConfig::new("photos", "processed"));
//! let report = processor.resize(100, 100)?;
//! for (source, error) in report.failures() {
//!     eprintln!("{}: {}", source.display(), error);
//! }
//! # Ok::<(), batch_imgproc::process::ProcessError>(())
//! ```

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
