use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

/// Best-available origin timestamp for a file, interpreted as UTC.
/// Prefers the true creation time; where the platform or filesystem does
/// not record one, falls back to the last-modified time.
/// Fails only if the path is missing or inaccessible.
pub fn origin_timestamp(path: &Path) -> anyhow::Result<DateTime<Utc>> {
    let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;

    let system_time = match meta.created() {
        Ok(t) => t,
        Err(_) => {
            tracing::debug!(
                path = %path.display(),
                "creation time unavailable, using modification time"
            );
            meta.modified()
                .with_context(|| format!("modification time of {}", path.display()))?
        }
    };

    Ok(system_time.into())
}
