use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::date::ResolvedDate;

/// Moves resolved files into the `target_root/YYYY/MM/DD` tree.
/// A file is either fully relocated or left untouched; the source is
/// removed only after the destination is complete.
#[derive(Debug, Clone)]
pub struct Mover {
    target_root: PathBuf,
}

impl Mover {
    pub fn new(target_root: impl Into<PathBuf>) -> Self {
        Self {
            target_root: target_root.into(),
        }
    }

    /// Destination folder for a resolved date: `{root}/{year}/{month:02}/{day:02}`.
    pub fn dest_folder(&self, date: &ResolvedDate) -> PathBuf {
        self.target_root
            .join(format!("{:04}", date.year))
            .join(format!("{:02}", date.month))
            .join(format!("{:02}", date.day))
    }

    pub fn ensure_folder(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
    }

    /// Move `source` into `dest_folder`, returning the final path.
    /// Falls back to copy + remove when the destination is on another
    /// filesystem, carrying the source mtime over.
    pub fn move_file(&self, source: &Path, dest_folder: &Path) -> anyhow::Result<PathBuf> {
        let Some(filename) = source.file_name().and_then(|n| n.to_str()) else {
            bail!("source {} has no usable filename", source.display());
        };
        let dest = unique_dest(dest_folder, filename);

        match fs::rename(source, &dest) {
            Ok(()) => Ok(dest),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                copy_then_remove(source, &dest)?;
                Ok(dest)
            }
            Err(e) => Err(e).with_context(|| {
                format!("moving {} to {}", source.display(), dest.display())
            }),
        }
    }
}

/// Cross-device move: copy to a temp name in the destination folder, rename
/// into place, then remove the source. The visible destination file never
/// exists half-written.
fn copy_then_remove(source: &Path, dest: &Path) -> anyhow::Result<()> {
    let dest_dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let tmp_name = format!(
        ".{}.part",
        dest.file_name().and_then(|n| n.to_str()).unwrap_or("file")
    );
    let tmp = dest_dir.join(tmp_name);

    fs::copy(source, &tmp)
        .with_context(|| format!("copying {} to {}", source.display(), tmp.display()))?;

    if let Ok(mtime) = fs::metadata(source).and_then(|m| m.modified()) {
        let ft = filetime::FileTime::from_system_time(mtime);
        filetime::set_file_mtime(&tmp, ft).ok();
    }

    fs::rename(&tmp, dest)
        .with_context(|| format!("renaming {} to {}", tmp.display(), dest.display()))?;
    fs::remove_file(source)
        .with_context(|| format!("removing moved source {}", source.display()))?;
    Ok(())
}

/// Resolve a destination filename collision with a `name(N).ext` suffix.
fn unique_dest(dir: &Path, filename: &str) -> PathBuf {
    let dest = dir.join(filename);
    if !dest.exists() {
        return dest;
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let mut counter = 1u32;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}({})", stem, counter)
        } else {
            format!("{}({}).{}", stem, counter, ext)
        };
        let candidate = dir.join(&new_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
