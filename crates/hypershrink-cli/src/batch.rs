//! Sequential batch processing of one folder.
//!
//! Each file is isolated: a decode, encode or write failure is reported and
//! the run moves on. Only setup failures (output folder, folder listing)
//! abort the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use hypershrink_core::{decode_file, Budget, FitOutcome, FitToBudget};
use tracing::{debug, info, warn};

use crate::config::BatchConfig;
use crate::scan::{output_name, scan_folder};

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// The folder holds no supported images.
    NoFiles,
    Started {
        total: usize,
        budget: Budget,
    },
    /// Percentage of files reached, sent before each file.
    Progress {
        percent: u8,
    },
    Processing {
        file: String,
        size_bytes: u64,
    },
    /// Already within budget; left untouched.
    Skipped {
        file: String,
        size_bytes: u64,
    },
    Compressed {
        file: String,
        output: PathBuf,
        size_bytes: u64,
        quality: u8,
        scale: f64,
    },
    Unreachable {
        file: String,
        last_size_bytes: u64,
    },
    FileError {
        file: String,
        error: String,
    },
    /// The stop flag was raised; remaining files were not visited.
    Stopped {
        remaining: usize,
    },
}

/// Counts for a finished (or stopped) batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub compressed: usize,
    pub skipped: usize,
    pub unreachable: usize,
    pub failed: usize,
    pub stopped: bool,
    pub output_dir: PathBuf,
}

enum FileResult {
    Skipped { size_bytes: u64 },
    Compressed { output: PathBuf, size_bytes: u64, quality: u8, scale: f64 },
    Unreachable { last_size_bytes: u64 },
}

/// Run the batch described by `config`.
///
/// `stop` is checked between files, never during a file.
pub fn run_batch(
    config: &BatchConfig,
    stop: &AtomicBool,
    mut on_event: impl FnMut(BatchEvent),
) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "cannot create output folder {}",
            config.output_dir.display()
        )
    })?;

    let files = scan_folder(&config.input_dir)?;
    let mut summary = BatchSummary {
        total: files.len(),
        output_dir: config.output_dir.clone(),
        ..BatchSummary::default()
    };

    if files.is_empty() {
        info!(folder = %config.input_dir.display(), "no images found");
        on_event(BatchEvent::NoFiles);
        return Ok(summary);
    }

    info!(total = files.len(), budget = config.budget.bytes(), "batch started");
    on_event(BatchEvent::Started {
        total: files.len(),
        budget: config.budget,
    });

    let encoder = FitToBudget::default();

    for (i, path) in files.iter().enumerate() {
        if stop.load(Ordering::Relaxed) {
            summary.stopped = true;
            info!(remaining = files.len() - i, "batch stopped");
            on_event(BatchEvent::Stopped {
                remaining: files.len() - i,
            });
            break;
        }

        on_event(BatchEvent::Progress {
            percent: ((i + 1) * 100 / files.len()) as u8,
        });

        let file = display_name(path);
        match process_file(path, config, &encoder, &mut on_event) {
            Ok(FileResult::Skipped { size_bytes }) => {
                debug!(file = %file, size_bytes, "within budget, skipped");
                summary.skipped += 1;
                on_event(BatchEvent::Skipped { file, size_bytes });
            }
            Ok(FileResult::Compressed {
                output,
                size_bytes,
                quality,
                scale,
            }) => {
                summary.compressed += 1;
                on_event(BatchEvent::Compressed {
                    file,
                    output,
                    size_bytes,
                    quality,
                    scale,
                });
            }
            Ok(FileResult::Unreachable { last_size_bytes }) => {
                warn!(file = %file, last_size_bytes, "could not fit budget");
                summary.unreachable += 1;
                on_event(BatchEvent::Unreachable {
                    file,
                    last_size_bytes,
                });
            }
            Err(e) => {
                let error = format!("{e:#}");
                warn!(file = %file, error = %error, "file failed");
                summary.failed += 1;
                on_event(BatchEvent::FileError { file, error });
            }
        }
    }

    info!(
        compressed = summary.compressed,
        skipped = summary.skipped,
        unreachable = summary.unreachable,
        failed = summary.failed,
        "batch finished"
    );
    Ok(summary)
}

fn process_file(
    path: &Path,
    config: &BatchConfig,
    encoder: &FitToBudget,
    on_event: &mut impl FnMut(BatchEvent),
) -> Result<FileResult> {
    let size_bytes = fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len();

    if config.budget.admits(size_bytes) {
        return Ok(FileResult::Skipped { size_bytes });
    }

    on_event(BatchEvent::Processing {
        file: display_name(path),
        size_bytes,
    });

    let image = decode_file(path).context("decode failed")?;
    let outcome = encoder
        .encode(&image, config.budget)
        .context("encode failed")?;

    match outcome {
        FitOutcome::Success(s) => {
            let output = config.output_dir.join(output_name(path, &config.suffix));
            fs::write(&output, &s.bytes)
                .with_context(|| format!("cannot write {}", output.display()))?;
            Ok(FileResult::Compressed {
                output,
                size_bytes: s.final_size_bytes,
                quality: s.final_quality,
                scale: s.final_scale,
            })
        }
        FitOutcome::Failure(f) => Ok(FileResult::Unreachable {
            last_size_bytes: f.last_attempt_size_bytes,
        }),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
