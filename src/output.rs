//! CLI output formatting.
//!
//! # Display contract
//!
//! Every file is shown by its positional index and its path relative to the
//! source root, with the destination (or the failure) as an indented context
//! line:
//!
//! ```text
//! resize to 100x100 (3 images)
//!     001 cat.jpg
//!         → processed/cat.jpg
//!     002 dog/broken.gif
//!         Failed: cannot open image: Unrecognized image format: photos/dog/broken.gif
//!     003 dog/pup.png
//!         → processed/dog/pup.png
//!
//! Processed 2 of 3 images, 1 failed
//! ```
//!
//! With parallel workers the per-file lines arrive in completion order; the
//! index always refers to discovery order.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::process::{BatchReport, ProcessEvent};
use crate::scan::Discovery;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` with forward slashes, or the full path if it is
/// not under `root`.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "image" } else { "images" }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the result of a discovery pass.
pub fn format_scan_output(discovery: &Discovery, source_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Images ({} found under {})",
        discovery.images.len(),
        source_root.display()
    )];
    for (i, path) in discovery.images.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            format_index(i + 1),
            display_relative(path, source_root)
        ));
    }

    if !discovery.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({})", discovery.skipped.len()));
        for entry in &discovery.skipped {
            lines.push(format!(
                "{}{}",
                indent(1),
                display_relative(&entry.path, source_root)
            ));
            lines.push(format!("{}{}", indent(2), entry.reason));
        }
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(discovery: &Discovery, source_root: &Path) {
    for line in format_scan_output(discovery, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent, source_root: &Path) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            transform,
            image_count,
        } => vec![format!(
            "{} ({} {})",
            transform,
            image_count,
            plural(*image_count)
        )],
        ProcessEvent::EntrySkipped { path, reason } => vec![
            format!("{}Skipped {}", indent(1), display_relative(path, source_root)),
            format!("{}{}", indent(2), reason),
        ],
        ProcessEvent::ImageProcessed {
            index,
            source,
            destination,
        } => vec![
            format!(
                "{}{} {}",
                indent(1),
                format_index(*index),
                display_relative(source, source_root)
            ),
            format!("{}\u{2192} {}", indent(2), destination.display()),
        ],
        ProcessEvent::ImageFailed {
            index,
            source,
            error,
        } => vec![
            format!(
                "{}{} {}",
                indent(1),
                format_index(*index),
                display_relative(source, source_root)
            ),
            format!("{}Failed: {}", indent(2), error),
        ],
    }
}

// ============================================================================
// Batch summary
// ============================================================================

/// Format the closing summary of a batch.
///
/// Failures are listed again at the end so they are not lost in a long
/// progress log.
pub fn format_batch_summary(report: &BatchReport, source_root: &Path) -> Vec<String> {
    let total = report.total();
    let mut headline = format!(
        "Processed {} of {} {}",
        report.succeeded(),
        total,
        plural(total)
    );
    if report.failed() > 0 {
        headline.push_str(&format!(", {} failed", report.failed()));
    }
    if !report.skipped.is_empty() {
        headline.push_str(&format!(", {} entries skipped", report.skipped.len()));
    }

    let mut lines = vec![String::new(), headline];
    for (source, error) in report.failures() {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            display_relative(source, source_root),
            error
        ));
    }
    lines
}

/// Print the batch summary to stdout.
pub fn print_batch_summary(report: &BatchReport, source_root: &Path) {
    for line in format_batch_summary(report, source_root) {
        println!("{}", line);
    }
}
