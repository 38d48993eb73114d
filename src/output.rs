//! CLI output formatting for the batch and check commands.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Processing 4 files: scans -> trimmed
//! [1/4] a.png: 640x480 -> 600x440, trimmed [20, 20, 20, 20]
//! [2/4] b.jpg: no border, copied
//! [3/4] c.png: failed: cannot open image: Decode failed: ...
//! [4/4] notes.txt: skipped
//! Converted 2/4 files
//! ```
//!
//! Crop widths are listed in scan order: top, right, bottom, left.
//!
//! ## Check
//!
//! ```text
//! scans
//! [1/3] a.png: image
//! [2/3] notes.txt: skipped
//! [3/3] raw: skipped
//! 1 image, 2 skipped
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns lines) for testability and a
//! `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::process::{FileOutcome, FileReport, ProcessEvent, TransferResult};
use crate::scan::Entry;
use std::path::Path;

fn position(index: usize, total: usize) -> String {
    format!("[{index}/{total}]")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// One status line for a finished file.
pub fn format_file_report(report: &FileReport) -> String {
    let status = match &report.outcome {
        FileOutcome::Skipped => "skipped".to_string(),
        FileOutcome::Copied => "no border, copied".to_string(),
        FileOutcome::Cropped {
            crops,
            original: (ow, oh),
            trimmed: (tw, th),
        } => format!("{ow}x{oh} -> {tw}x{th}, trimmed {crops}"),
        FileOutcome::Failed(reason) => format!("failed: {reason}"),
    };
    format!(
        "{} {}: {}",
        position(report.index, report.total),
        report.name,
        status
    )
}

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started {
            total,
            source,
            dest,
        } => vec![format!(
            "Processing {}: {} -> {}",
            plural(*total, "file"),
            source.display(),
            dest.display()
        )],
        ProcessEvent::FileFinished(report) => vec![format_file_report(report)],
    }
}

pub fn format_summary(result: &TransferResult) -> String {
    format!("Converted {}/{} files", result.updated, result.total)
}

/// Full log of a finished run: every file line, then the summary.
///
/// Lines are in listing order regardless of how the batch was scheduled.
pub fn format_transfer_log(result: &TransferResult) -> Vec<String> {
    result
        .files
        .iter()
        .map(format_file_report)
        .chain(std::iter::once(format_summary(result)))
        .collect()
}

pub fn format_check_output(entries: &[Entry], source: &Path) -> Vec<String> {
    let total = entries.len();
    let images = entries.iter().filter(|e| e.is_image()).count();

    let mut lines = vec![source.display().to_string()];
    for (i, entry) in entries.iter().enumerate() {
        let kind = if entry.is_image() { "image" } else { "skipped" };
        lines.push(format!("{} {}: {}", position(i + 1, total), entry.name, kind));
    }
    lines.push(format!(
        "{}, {} skipped",
        plural(images, "image"),
        total - images
    ));
    lines
}

pub fn print_summary(result: &TransferResult) {
    println!("{}", format_summary(result));
}

pub fn print_check_output(entries: &[Entry], source: &Path) {
    for line in format_check_output(entries, source) {
        println!("{}", line);
    }
}
