pub mod exif;
pub mod filename;
pub mod fs_time;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};
use thiserror::Error;

use crate::media::{ImageFormat, MediaFile, MediaType, VideoFormat};

/// Years accepted for dates parsed from untrusted text (metadata, filenames).
pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2050;

/// Origin of one untrusted date signal, prior to selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    EmbeddedMetadata,
    FilenameToken,
    FilesystemTime,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::EmbeddedMetadata => write!(f, "embedded metadata"),
            DateSource::FilenameToken => write!(f, "filename token"),
            DateSource::FilesystemTime => write!(f, "filesystem time"),
        }
    }
}

/// The (year, month, day) triple used to build a destination path.
/// Kept as plain integers rather than a calendar type: filename-derived
/// dates may name a day the calendar does not have (Feb 31) and must still
/// form a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ResolvedDate {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
        }
    }
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One date signal: where it came from, the raw value, and the parsed date.
#[derive(Debug, Clone)]
pub struct CandidateDate {
    pub source: DateSource,
    pub raw: String,
    pub date: ResolvedDate,
}

/// A non-4-digit year after a successful parse means a parsing logic fault
/// rather than bad input, and continuing could silently misfile content.
/// This aborts the whole run.
#[derive(Debug, Error)]
pub enum FatalDateError {
    #[error("resolved year {rendered:?} for {} does not render as exactly 4 digits", .path.display())]
    YearWidth { rendered: String, path: PathBuf },
}

/// Terminal outcome of date resolution for one file.
#[derive(Debug)]
pub enum Resolution {
    /// A date was selected; the file proceeds to the move step.
    Resolved(CandidateDate),
    /// Unknown extension: no action taken, not an error.
    SkippedUnknownType,
    /// Every source was exhausted (the file is missing or unreadable).
    Failed(anyhow::Error),
}

/// Resolve a single capture date for `file` per its type, first success wins:
/// - jpg/jpeg: `DateTimeOriginal` metadata, then filesystem time
/// - png/gif: filesystem time directly
/// - mp4: filename token, then filesystem time
/// - unknown: skipped
///
/// Resolving the same unmoved file twice yields the same date.
pub fn resolve(file: &MediaFile) -> Result<Resolution, FatalDateError> {
    let candidate = match file.media_type {
        MediaType::Unknown => {
            tracing::info!(path = %file.path.display(), "unknown extension, not processed");
            return Ok(Resolution::SkippedUnknownType);
        }
        MediaType::Image(ImageFormat::Jpeg) => resolve_jpeg(file),
        MediaType::Image(ImageFormat::Png) | MediaType::Image(ImageFormat::Gif) => {
            filesystem_candidate(&file.path)
        }
        MediaType::Video(VideoFormat::Mp4) => resolve_video(file),
    };

    match candidate {
        Ok(candidate) => {
            validate_year_width(&candidate.date, &file.path)?;
            Ok(Resolution::Resolved(candidate))
        }
        Err(e) => Ok(Resolution::Failed(e)),
    }
}

/// The year must render as exactly 4 digits to slot into the YYYY/MM/DD tree.
pub fn validate_year_width(date: &ResolvedDate, path: &Path) -> Result<(), FatalDateError> {
    let rendered = date.year.to_string();
    if rendered.len() != 4 || !rendered.chars().all(|c| c.is_ascii_digit()) {
        return Err(FatalDateError::YearWidth {
            rendered,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn resolve_jpeg(file: &MediaFile) -> anyhow::Result<CandidateDate> {
    let fields = exif::read_date_fields(&file.path);
    match metadata_candidate(&fields, &file.path) {
        Some(candidate) => Ok(candidate),
        None => filesystem_candidate(&file.path),
    }
}

/// Select the metadata candidate: `DateTimeOriginal` is used preferentially
/// over every other date-like field. Returns None when the field is absent,
/// unparseable, or outside the accepted year window.
fn metadata_candidate(
    fields: &std::collections::BTreeMap<String, String>,
    path: &Path,
) -> Option<CandidateDate> {
    let raw = fields.get(exif::DATE_TIME_ORIGINAL)?;
    match exif::parse_exif_datetime(raw) {
        Some(dt) => {
            let date = ResolvedDate::from_datetime(&dt);
            if in_year_window(date.year) {
                tracing::debug!(path = %path.display(), date = %date, "date from embedded metadata");
                return Some(CandidateDate {
                    source: DateSource::EmbeddedMetadata,
                    raw: raw.clone(),
                    date,
                });
            }
            tracing::warn!(
                path = %path.display(),
                year = date.year,
                "metadata year outside accepted window, falling back to filesystem time"
            );
            None
        }
        None => {
            tracing::warn!(
                path = %path.display(),
                raw = %raw,
                "unparseable DateTimeOriginal, falling back to filesystem time"
            );
            None
        }
    }
}

fn resolve_video(file: &MediaFile) -> anyhow::Result<CandidateDate> {
    let name = file.file_name();
    match filename::parse_filename_date(name, filename::VIDEO_PREFIX) {
        Ok(date) => {
            tracing::debug!(path = %file.path.display(), date = %date, "date from filename token");
            Ok(CandidateDate {
                source: DateSource::FilenameToken,
                raw: name.to_string(),
                date,
            })
        }
        Err(e) => {
            tracing::debug!(
                path = %file.path.display(),
                error = %e,
                "filename date parse failed, falling back to filesystem time"
            );
            filesystem_candidate(&file.path)
        }
    }
}

/// Unconditional fallback: accepted for any readable file.
fn filesystem_candidate(path: &Path) -> anyhow::Result<CandidateDate> {
    let ts = fs_time::origin_timestamp(path)?;
    let naive = ts.naive_utc();
    Ok(CandidateDate {
        source: DateSource::FilesystemTime,
        raw: naive.format("%Y:%m:%d %H:%M:%S").to_string(),
        date: ResolvedDate::from_datetime(&naive),
    })
}

fn in_year_window(year: i32) -> bool {
    (YEAR_MIN..=YEAR_MAX).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> MediaFile {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(b"content").unwrap();
        MediaFile::new(path)
    }

    fn expect_resolved(r: Resolution) -> CandidateDate {
        match r {
            Resolution::Resolved(c) => c,
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_mp4_uses_filename_token() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "VID_20230815_120000.mp4");

        let c = expect_resolved(resolve(&file).unwrap());
        assert_eq!(c.source, DateSource::FilenameToken);
        assert_eq!(c.date, ResolvedDate { year: 2023, month: 8, day: 15 });
    }

    #[test]
    fn test_mp4_bad_token_falls_back_to_filesystem() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "VID_99999999.mp4");

        let c = expect_resolved(resolve(&file).unwrap());
        assert_eq!(c.source, DateSource::FilesystemTime);
        assert_eq!(c.date.year, Utc::now().year());
    }

    #[test]
    fn test_png_always_uses_filesystem() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "20230815.png");

        let c = expect_resolved(resolve(&file).unwrap());
        assert_eq!(c.source, DateSource::FilesystemTime);
    }

    #[test]
    fn test_jpg_without_metadata_falls_back_to_filesystem() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "holiday.jpg");

        let c = expect_resolved(resolve(&file).unwrap());
        assert_eq!(c.source, DateSource::FilesystemTime);
    }

    #[test]
    fn test_unknown_extension_is_skipped() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "notes.txt");

        assert!(matches!(
            resolve(&file).unwrap(),
            Resolution::SkippedUnknownType
        ));
    }

    #[test]
    fn test_missing_file_fails_resolution() {
        let file = MediaFile::new(PathBuf::from("/nonexistent/shot.png"));
        assert!(matches!(resolve(&file).unwrap(), Resolution::Failed(_)));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let dir = tempdir().unwrap();
        let file = touch(dir.path(), "VID_20230815_120000.mp4");

        let a = expect_resolved(resolve(&file).unwrap());
        let b = expect_resolved(resolve(&file).unwrap());
        assert_eq!(a.date, b.date);
    }

    #[test]
    fn test_three_digit_year_is_fatal() {
        let date = ResolvedDate { year: 202, month: 1, day: 1 };
        assert!(validate_year_width(&date, Path::new("synthetic.jpg")).is_err());

        let date = ResolvedDate { year: 2023, month: 1, day: 1 };
        assert!(validate_year_width(&date, Path::new("ok.jpg")).is_ok());
    }

    #[test]
    fn test_metadata_candidate_prefers_date_time_original() {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("DateTime".to_string(), "2019:01:01 00:00:00".to_string());
        fields.insert(
            "DateTimeOriginal".to_string(),
            "2021:03:05 10:00:00".to_string(),
        );

        let c = metadata_candidate(&fields, Path::new("a.jpg")).unwrap();
        assert_eq!(c.source, DateSource::EmbeddedMetadata);
        assert_eq!(c.date, ResolvedDate { year: 2021, month: 3, day: 5 });
    }

    #[test]
    fn test_metadata_candidate_rejections() {
        let empty = std::collections::BTreeMap::new();
        assert!(metadata_candidate(&empty, Path::new("a.jpg")).is_none());

        let mut garbage = std::collections::BTreeMap::new();
        garbage.insert("DateTimeOriginal".to_string(), "soon".to_string());
        assert!(metadata_candidate(&garbage, Path::new("a.jpg")).is_none());

        let mut ancient = std::collections::BTreeMap::new();
        ancient.insert(
            "DateTimeOriginal".to_string(),
            "1987:06:01 08:00:00".to_string(),
        );
        assert!(metadata_candidate(&ancient, Path::new("a.jpg")).is_none());
    }

    #[test]
    fn test_display_renders_zero_padded() {
        let date = ResolvedDate { year: 2021, month: 3, day: 5 };
        assert_eq!(date.to_string(), "2021-03-05");
    }
}
