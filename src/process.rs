//! Batch transfer: trim every image of a source directory into a destination.
//!
//! ## Per-file flow
//!
//! ```text
//! entry ──not an image──────────────────────────────→ Skipped
//!   │
//!   load ──decode error─────────────────────────────→ Failed
//!   │
//!   trim_borders ──nothing cropped──→ copy bytes ───→ Copied   (or Failed)
//!   │
//!   └──cropped──→ encode by dest extension ─────────→ Cropped  (or Failed)
//! ```
//!
//! Untouched images are copied byte for byte rather than re-encoded, so a
//! border-free JPEG comes out identical to its source.
//!
//! ## Failure policy
//!
//! The run aborts when the source directory cannot be read, when the
//! destination cannot be created, or when the destination resolves to the
//! source directory. Decode, encode, write and copy errors are recorded on
//! that file's [`FileReport`] and the batch moves on.
//!
//! ## Parallel Processing
//!
//! With `threads > 1` files are processed on a dedicated
//! [rayon](https://docs.rs/rayon) pool. Reports are collected in listing
//! order either way; only the progress events may interleave.

use crate::config::{AppConfig, effective_threads, same_directory};
use crate::imaging::{
    BorderColor, CropRecord, ImageBackend, RustBackend, Threshold, trim_borders,
};
use crate::scan::{self, Entry, ScanError};
use rayon::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Cannot create destination directory {path}: {source}")]
    CreateDest {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Source and destination are the same directory: {0}")]
    SameDirectory(PathBuf),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Run-level settings, read-only for the duration of a batch.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    pub border: BorderColor,
    pub threshold: Threshold,
    pub threads: usize,
}

impl TransferConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            src_dir: PathBuf::from(&config.src_dir),
            dst_dir: PathBuf::from(&config.dst_dir),
            border: config.border_color(),
            threshold: config.threshold(),
            threads: effective_threads(config),
        }
    }
}

/// What happened to one directory entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Not an image by extension, or a directory.
    Skipped,
    /// No border found; source bytes copied verbatim.
    Copied,
    /// Border removed and the result re-encoded.
    Cropped {
        crops: CropRecord,
        original: (u32, u32),
        trimmed: (u32, u32),
    },
    Failed(String),
}

impl FileOutcome {
    /// Whether the destination received a file.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Copied | Self::Cropped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// 1-based position in the listing.
    pub index: usize,
    pub total: usize,
    pub name: String,
    pub outcome: FileOutcome,
}

/// Aggregate of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferResult {
    /// Every listed entry, images or not.
    pub total: usize,
    /// Entries accepted by the extension filter.
    pub images: usize,
    /// Entries that produced an output file.
    pub updated: usize,
    /// One report per entry, in listing order.
    pub files: Vec<FileReport>,
}

impl TransferResult {
    fn from_reports(files: Vec<FileReport>) -> Self {
        Self {
            total: files.len(),
            images: files
                .iter()
                .filter(|f| f.outcome != FileOutcome::Skipped)
                .count(),
            updated: files.iter().filter(|f| f.outcome.is_updated()).count(),
            files,
        }
    }
}

/// Progress events streamed while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started {
        total: usize,
        source: PathBuf,
        dest: PathBuf,
    },
    FileFinished(FileReport),
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening any more.
        let _ = tx.send(event);
    }
}

pub fn process(
    config: &TransferConfig,
    events: Option<Sender<ProcessEvent>>,
    cancel: Option<&AtomicBool>,
) -> Result<TransferResult, ProcessError> {
    process_with_backend(&RustBackend::new(), config, events, cancel)
}

/// Run a batch using a specific backend (allows testing with mock).
///
/// `cancel` is checked before each image; images not yet started when it
/// flips are reported as failed with reason `cancelled`.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &TransferConfig,
    events: Option<Sender<ProcessEvent>>,
    cancel: Option<&AtomicBool>,
) -> Result<TransferResult, ProcessError> {
    let entries = scan::scan(&config.src_dir)?;
    let total = entries.len();

    // Copying a file onto itself truncates it before it is read.
    if same_directory(&config.src_dir, &config.dst_dir) {
        return Err(ProcessError::SameDirectory(config.src_dir.clone()));
    }

    std::fs::create_dir_all(&config.dst_dir).map_err(|source| ProcessError::CreateDest {
        path: config.dst_dir.clone(),
        source,
    })?;

    emit(
        &events,
        ProcessEvent::Started {
            total,
            source: config.src_dir.clone(),
            dest: config.dst_dir.clone(),
        },
    );

    let run = |(i, entry): (usize, &Entry)| -> FileReport {
        let outcome = if !entry.is_image() {
            FileOutcome::Skipped
        } else if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            FileOutcome::Failed("cancelled".into())
        } else {
            trim_file(backend, &entry.path, &config.dst_dir.join(&entry.name), config)
        };
        let report = FileReport {
            index: i + 1,
            total,
            name: entry.name.clone(),
            outcome,
        };
        emit(&events, ProcessEvent::FileFinished(report.clone()));
        report
    };

    let files: Vec<FileReport> = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| entries.par_iter().enumerate().map(&run).collect())
    } else {
        entries.iter().enumerate().map(&run).collect()
    };

    Ok(TransferResult::from_reports(files))
}

fn failed(source: &Path, what: &str, err: impl Display) -> FileOutcome {
    warn!(file = %source.display(), "{what}: {err}");
    FileOutcome::Failed(format!("{what}: {err}"))
}

/// Trim one image file into `dest`.
fn trim_file(
    backend: &impl ImageBackend,
    source: &Path,
    dest: &Path,
    config: &TransferConfig,
) -> FileOutcome {
    let img = match backend.load(source) {
        Ok(img) => img,
        Err(e) => return failed(source, "cannot open image", e),
    };

    let reference = config.border.resolve(&img);
    debug!(
        file = %source.display(),
        size = ?img.dimensions(),
        %reference,
        "trimming"
    );
    let trimmed = trim_borders(&img, reference, config.threshold);

    if !trimmed.cropped {
        return match backend.copy(source, dest) {
            Ok(()) => FileOutcome::Copied,
            Err(e) => failed(source, "cannot copy file", e),
        };
    }

    if trimmed.is_empty() {
        return failed(source, "nothing left", "border covers the whole image");
    }

    match backend.save(&trimmed.image, dest) {
        Ok(()) => FileOutcome::Cropped {
            crops: trimmed.crops,
            original: img.dimensions(),
            trimmed: trimmed.image.dimensions(),
        },
        Err(e) => failed(source, "cannot save image", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{BLACK, WHITE, framed_image, solid_image, write_file};
    use std::sync::mpsc;
    use tempfile::TempDir;

    struct Dirs {
        _tmp: TempDir,
        src: PathBuf,
        dst: PathBuf,
    }

    /// Source dir populated with empty files; the mock backend decides content.
    fn setup(names: &[&str]) -> Dirs {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        for name in names {
            write_file(&src, name, b"");
        }
        Dirs {
            _tmp: tmp,
            src,
            dst,
        }
    }

    fn config(dirs: &Dirs) -> TransferConfig {
        TransferConfig {
            src_dir: dirs.src.clone(),
            dst_dir: dirs.dst.clone(),
            border: BorderColor::Black,
            threshold: Threshold::default(),
            threads: 1,
        }
    }

    fn outcome_of<'a>(result: &'a TransferResult, name: &str) -> &'a FileOutcome {
        &result
            .files
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no report for {name}"))
            .outcome
    }

    // =========================================================================
    // TransferConfig tests
    // =========================================================================

    #[test]
    fn transfer_config_from_app_config() {
        let app = AppConfig {
            src_dir: "in".into(),
            dst_dir: "out".into(),
            allow_color: true,
            threshold: 300,
            ..Default::default()
        };
        let config = TransferConfig::from_app_config(&app);
        assert_eq!(config.src_dir, PathBuf::from("in"));
        assert_eq!(config.dst_dir, PathBuf::from("out"));
        assert_eq!(config.border, BorderColor::Sampled);
        assert_eq!(config.threshold.value(), 200);
        assert_eq!(config.threads, 1);
    }

    // =========================================================================
    // Batch behavior with mock backend
    // =========================================================================

    #[test]
    fn mixed_directory_counts_and_outcomes() {
        let dirs = setup(&["a.png", "b.JPG", "broken.png", "notes.txt", "README"]);
        let backend = MockBackend::new()
            .with_image("a.png", framed_image(10, 8, [1, 2, 1, 2], BLACK, WHITE))
            .with_image("b.JPG", solid_image(6, 6, WHITE));

        let result = process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        assert_eq!(result.total, 5);
        assert_eq!(result.images, 3);
        assert_eq!(result.updated, 2);

        assert_eq!(
            *outcome_of(&result, "a.png"),
            FileOutcome::Cropped {
                crops: CropRecord([1, 2, 1, 2]),
                original: (10, 8),
                trimmed: (6, 6),
            }
        );
        assert_eq!(*outcome_of(&result, "b.JPG"), FileOutcome::Copied);
        assert!(matches!(
            outcome_of(&result, "broken.png"),
            FileOutcome::Failed(_)
        ));
        assert_eq!(*outcome_of(&result, "notes.txt"), FileOutcome::Skipped);
        assert_eq!(*outcome_of(&result, "README"), FileOutcome::Skipped);
    }

    #[test]
    fn reports_carry_position_in_listing_order() {
        let dirs = setup(&["c.png", "a.png", "b.txt"]);
        let backend = MockBackend::new()
            .with_image("a.png", solid_image(2, 2, WHITE))
            .with_image("c.png", solid_image(2, 2, WHITE));

        let result = process_with_backend(&backend, &config(&dirs), None, None).unwrap();
        let positions: Vec<(usize, usize, &str)> = result
            .files
            .iter()
            .map(|f| (f.index, f.total, f.name.as_str()))
            .collect();
        assert_eq!(
            positions,
            vec![(1, 3, "a.png"), (2, 3, "b.txt"), (3, 3, "c.png")]
        );
    }

    #[test]
    fn unchanged_image_is_copied_not_encoded() {
        let dirs = setup(&["clean.webp"]);
        let backend = MockBackend::new().with_image("clean.webp", solid_image(4, 4, WHITE));

        process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![
                RecordedOp::Load("clean.webp".into()),
                RecordedOp::Copy {
                    source: "clean.webp".into(),
                    output: "clean.webp".into(),
                },
            ]
        );
    }

    #[test]
    fn cropped_image_saved_under_same_name() {
        let dirs = setup(&["scan.tiff"]);
        let backend = MockBackend::new().with_image(
            "scan.tiff",
            framed_image(20, 10, [2, 2, 2, 2], BLACK, WHITE),
        );

        process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops[1],
            RecordedOp::Save {
                output: "scan.tiff".into(),
                width: 16,
                height: 6,
            }
        );
    }

    #[test]
    fn save_failure_does_not_abort_batch() {
        let dirs = setup(&["a.png", "b.png"]);
        let framed = framed_image(8, 8, [1, 1, 1, 1], BLACK, WHITE);
        let backend = MockBackend::new()
            .with_image("a.png", framed.clone())
            .with_image("b.png", framed)
            .failing_save("a.png");

        let result = process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        assert!(matches!(outcome_of(&result, "a.png"), FileOutcome::Failed(msg) if msg.starts_with("cannot save image")));
        assert!(matches!(
            outcome_of(&result, "b.png"),
            FileOutcome::Cropped { .. }
        ));
        assert_eq!(result.updated, 1);
    }

    #[test]
    fn copy_failure_counts_as_not_updated() {
        let dirs = setup(&["plain.bmp"]);
        let backend = MockBackend::new()
            .with_image("plain.bmp", solid_image(3, 3, WHITE))
            .failing_copy("plain.bmp");

        let result = process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        assert!(matches!(outcome_of(&result, "plain.bmp"), FileOutcome::Failed(msg) if msg.starts_with("cannot copy file")));
        assert_eq!(result.images, 1);
        assert_eq!(result.updated, 0);
    }

    #[test]
    fn fully_black_image_writes_nothing() {
        let dirs = setup(&["void.png"]);
        let backend = MockBackend::new().with_image("void.png", solid_image(10, 10, BLACK));

        let result = process_with_backend(&backend, &config(&dirs), None, None).unwrap();

        assert!(matches!(
            outcome_of(&result, "void.png"),
            FileOutcome::Failed(_)
        ));
        let ops = backend.get_operations();
        assert!(!ops.iter().any(|op| matches!(op, RecordedOp::Save { .. })));
        assert!(!ops.iter().any(|op| matches!(op, RecordedOp::Copy { .. })));
    }

    #[test]
    fn sampled_border_color_trims_white_frame() {
        let dirs = setup(&["white.png"]);
        let img = framed_image(10, 10, [2, 2, 2, 2], WHITE, BLACK);
        let backend = MockBackend::new().with_image("white.png", img);

        let black = process_with_backend(&backend, &config(&dirs), None, None).unwrap();
        assert_eq!(*outcome_of(&black, "white.png"), FileOutcome::Copied);

        let sampled = TransferConfig {
            border: BorderColor::Sampled,
            ..config(&dirs)
        };
        let result = process_with_backend(&backend, &sampled, None, None).unwrap();
        assert!(matches!(
            outcome_of(&result, "white.png"),
            FileOutcome::Cropped {
                trimmed: (6, 6),
                ..
            }
        ));
    }

    #[test]
    fn threshold_controls_what_counts_as_border() {
        let dirs = setup(&["gray.png"]);
        let dark = image::Rgba([40, 40, 40, 255]);
        let backend = MockBackend::new()
            .with_image("gray.png", framed_image(8, 8, [1, 1, 1, 1], dark, WHITE));

        let strict = process_with_backend(&backend, &config(&dirs), None, None).unwrap();
        assert_eq!(*outcome_of(&strict, "gray.png"), FileOutcome::Copied);

        let loose = TransferConfig {
            threshold: Threshold::new(50),
            ..config(&dirs)
        };
        let result = process_with_backend(&backend, &loose, None, None).unwrap();
        assert!(matches!(
            outcome_of(&result, "gray.png"),
            FileOutcome::Cropped { .. }
        ));
    }

    #[test]
    fn missing_source_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = TransferConfig {
            src_dir: tmp.path().join("nope"),
            dst_dir: tmp.path().join("out"),
            border: BorderColor::Black,
            threshold: Threshold::default(),
            threads: 1,
        };
        let backend = MockBackend::new();

        let result = process_with_backend(&backend, &config, None, None);
        assert!(matches!(result, Err(ProcessError::Scan(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn destination_resolving_to_source_is_rejected() {
        let dirs = setup(&["clean.png"]);
        let backend = MockBackend::new().with_image("clean.png", solid_image(4, 4, WHITE));
        let same = TransferConfig {
            dst_dir: dirs.src.join("."),
            ..config(&dirs)
        };

        let result = process_with_backend(&backend, &same, None, None);
        assert!(matches!(result, Err(ProcessError::SameDirectory(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn destination_dir_is_created() {
        let dirs = setup(&[]);
        assert!(!dirs.dst.exists());

        let result =
            process_with_backend(&MockBackend::new(), &config(&dirs), None, None).unwrap();
        assert!(dirs.dst.is_dir());
        assert_eq!(result, TransferResult::default());
    }

    #[test]
    fn events_stream_start_then_each_file() {
        let dirs = setup(&["a.png", "b.txt"]);
        let backend = MockBackend::new().with_image("a.png", solid_image(2, 2, WHITE));
        let (tx, rx) = mpsc::channel();

        process_with_backend(&backend, &config(&dirs), Some(tx), None).unwrap();
        let events: Vec<ProcessEvent> = rx.iter().collect();

        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ProcessEvent::Started { total: 2, .. }));
        assert!(
            matches!(&events[1], ProcessEvent::FileFinished(r) if r.name == "a.png" && r.outcome == FileOutcome::Copied)
        );
        assert!(
            matches!(&events[2], ProcessEvent::FileFinished(r) if r.index == 2 && r.outcome == FileOutcome::Skipped)
        );
    }

    #[test]
    fn cancelled_run_touches_no_images() {
        let dirs = setup(&["a.png", "b.png", "c.txt"]);
        let backend = MockBackend::new()
            .with_image("a.png", solid_image(2, 2, WHITE))
            .with_image("b.png", solid_image(2, 2, WHITE));
        let cancel = AtomicBool::new(true);

        let result =
            process_with_backend(&backend, &config(&dirs), None, Some(&cancel)).unwrap();

        assert!(backend.get_operations().is_empty());
        assert_eq!(result.updated, 0);
        assert_eq!(
            *outcome_of(&result, "a.png"),
            FileOutcome::Failed("cancelled".into())
        );
        assert_eq!(*outcome_of(&result, "c.txt"), FileOutcome::Skipped);
    }

    #[test]
    fn parallel_run_matches_sequential() {
        let names: Vec<String> = (0..12).map(|i| format!("{i:02}.png")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dirs = setup(&name_refs);

        let mut backend = MockBackend::new();
        for (i, name) in names.iter().enumerate() {
            let border = (i % 3) as u32;
            backend = backend.with_image(
                name,
                framed_image(12, 12, [border; 4], BLACK, WHITE),
            );
        }

        let sequential = process_with_backend(&backend, &config(&dirs), None, None).unwrap();
        let parallel = TransferConfig {
            threads: 4,
            ..config(&dirs)
        };
        let concurrent = process_with_backend(&backend, &parallel, None, None).unwrap();

        assert_eq!(sequential, concurrent);
        assert_eq!(sequential.updated, 12);
    }
}
