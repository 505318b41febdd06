pub mod date;
pub mod media;
pub mod mover;
pub mod scan;
pub mod settings;

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::date::{CandidateDate, Resolution};
use crate::media::MediaFile;
use crate::mover::Mover;
use crate::settings::Settings;

/// Type alias for progress callback
pub type ProgressCallback = dyn Fn(&str, u64, u64, &str) + Send + Sync;

/// Throttled progress reporter: emits at most every 200ms, plus the final
/// report of each stage.
pub struct ThrottledProgress<'a> {
    inner: &'a ProgressCallback,
    last_emit: Mutex<Instant>,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: &'a ProgressCallback) -> Self {
        Self {
            inner,
            last_emit: Mutex::new(Instant::now() - Duration::from_secs(1)),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let is_done = current + 1 >= total;
        if !is_done {
            let mut last = self.last_emit.lock().unwrap();
            if last.elapsed().as_millis() < 200 {
                return;
            }
            *last = Instant::now();
        }
        (self.inner)(stage, current, total, message);
    }
}

/// Summary of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub total_files: u64,
    pub moved: u64,
    pub skipped_unknown: u64,
    pub resolution_failures: u64,
    pub move_failures: u64,
}

/// Scan the configured subtrees, then resolve and move one file at a time.
/// A failed move or resolution leaves the source in place and the run
/// continues; only the year-width validation failure aborts.
pub fn run(settings: &Settings, progress_callback: &ProgressCallback) -> anyhow::Result<RunReport> {
    let tp = ThrottledProgress::new(progress_callback);

    let roots = settings.scan_roots();
    tracing::info!(
        base = %settings.scan_base().display(),
        subdirs = roots.len(),
        "scanning for media"
    );
    let files = scan::scan_media(&roots);
    let total = files.len() as u64;
    tp.report("scan", total, total, "scan complete");

    let mover = Mover::new(settings.target_root_dir.clone());
    let mut report = RunReport {
        total_files: total,
        ..Default::default()
    };

    for (i, file) in files.iter().enumerate() {
        tp.report("sort", i as u64, total, file.file_name());

        let resolution = match date::resolve(file) {
            Ok(r) => r,
            Err(fatal) => {
                tracing::error!(
                    path = %file.path.display(),
                    error = %fatal,
                    "fatal date validation failure, aborting run"
                );
                return Err(fatal.into());
            }
        };

        match resolution {
            Resolution::Resolved(candidate) => match move_resolved(&mover, file, &candidate) {
                Ok(dest) => {
                    tracing::info!(
                        path = %file.path.display(),
                        dest = %dest.display(),
                        source = %candidate.source,
                        date = %candidate.date,
                        "moved"
                    );
                    report.moved += 1;
                }
                Err(e) => {
                    tracing::error!(
                        path = %file.path.display(),
                        error = %e,
                        "move failed, file left in place"
                    );
                    report.move_failures += 1;
                }
            },
            Resolution::SkippedUnknownType => report.skipped_unknown += 1,
            Resolution::Failed(e) => {
                tracing::warn!(path = %file.path.display(), error = %e, "date resolution failed");
                report.resolution_failures += 1;
            }
        }
    }
    tp.report("sort", total, total, "done");

    Ok(report)
}

fn move_resolved(
    mover: &Mover,
    file: &MediaFile,
    candidate: &CandidateDate,
) -> anyhow::Result<PathBuf> {
    let dest_folder = mover.dest_folder(&candidate.date);
    mover.ensure_folder(&dest_folder)?;
    mover.move_file(&file.path, &dest_folder)
}
