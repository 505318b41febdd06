use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::media::{MediaFile, MediaType};

/// Collect media files under each scan root.
/// Subtrees are independent and walked in parallel; the returned list keeps
/// the configured root order, then traversal order within each subtree.
pub fn scan_media(roots: &[PathBuf]) -> Vec<MediaFile> {
    let per_root: Vec<Vec<MediaFile>> = roots.par_iter().map(|root| scan_tree(root)).collect();
    per_root.into_iter().flatten().collect()
}

fn scan_tree(root: &Path) -> Vec<MediaFile> {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "scan directory missing, skipping");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "unreadable entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let media = MediaFile::new(entry.into_path());
        if media.media_type == MediaType::Unknown {
            let looks_like_media = mime_guess::from_path(&media.path)
                .first()
                .map_or(false, |m| {
                    m.type_() == mime_guess::mime::IMAGE || m.type_() == mime_guess::mime::VIDEO
                });
            if looks_like_media {
                tracing::info!(path = %media.path.display(), "media file with unsupported extension");
            }
        }
        files.push(media);
    }

    tracing::debug!(root = %root.display(), count = files.len(), "scanned subtree");
    files
}
