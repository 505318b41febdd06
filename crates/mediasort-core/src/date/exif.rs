use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader};

/// The field the resolution engine consumes preferentially.
pub const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// Read every embedded metadata field whose tag name contains "date"
/// (case-insensitive), mapped to its raw display value.
/// Decode failures are recoverable: logged, then reported as an empty map.
pub fn read_date_fields(path: &Path) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot open image for metadata");
            return fields;
        }
    };

    let data = match Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no readable embedded metadata");
            return fields;
        }
    };

    for field in data.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        let name = field.tag.to_string();
        if name.to_ascii_lowercase().contains("date") {
            fields.insert(name, field.display_value().to_string());
        }
    }

    fields
}

/// Parse an EXIF datetime string against `YYYY:MM:DD HH:MM:SS`.
/// Some writers use `-`, `/`, `\` or `.` as separators; normalize first.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s.replace(['-', '/', '\\', '.'], ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // Date-only value
    if let Ok(d) = NaiveDate::parse_from_str(cleaned.split(' ').next()?, "%Y:%m:%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}
