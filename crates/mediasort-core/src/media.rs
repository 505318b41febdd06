use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
}

/// File type classification, derived from the extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image(ImageFormat),
    Video(VideoFormat),
    Unknown,
}

impl MediaType {
    pub fn from_path(path: &Path) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_ascii_lowercase(),
            None => return MediaType::Unknown,
        };
        match ext.as_str() {
            "jpg" | "jpeg" => MediaType::Image(ImageFormat::Jpeg),
            "png" => MediaType::Image(ImageFormat::Png),
            "gif" => MediaType::Image(ImageFormat::Gif),
            "mp4" => MediaType::Video(VideoFormat::Mp4),
            _ => MediaType::Unknown,
        }
    }
}

/// A discovered file, immutable once classified.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Classification derived from the extension
    pub media_type: MediaType,
}

impl MediaFile {
    pub fn new(path: PathBuf) -> Self {
        let media_type = MediaType::from_path(&path);
        Self { path, media_type }
    }

    /// Just the filename, lossy-empty if the path has none.
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            MediaType::from_path(Path::new("/a/photo.jpg")),
            MediaType::Image(ImageFormat::Jpeg)
        );
        assert_eq!(
            MediaType::from_path(Path::new("/a/photo.JPEG")),
            MediaType::Image(ImageFormat::Jpeg)
        );
        assert_eq!(
            MediaType::from_path(Path::new("/a/shot.png")),
            MediaType::Image(ImageFormat::Png)
        );
        assert_eq!(
            MediaType::from_path(Path::new("/a/anim.GIF")),
            MediaType::Image(ImageFormat::Gif)
        );
        assert_eq!(
            MediaType::from_path(Path::new("/a/VID_20230815.mp4")),
            MediaType::Video(VideoFormat::Mp4)
        );
        assert_eq!(MediaType::from_path(Path::new("/a/notes.txt")), MediaType::Unknown);
        assert_eq!(MediaType::from_path(Path::new("/a/noext")), MediaType::Unknown);
    }

    #[test]
    fn test_file_name() {
        let m = MediaFile::new(PathBuf::from("/scan/sub/VID_20230815_120000.mp4"));
        assert_eq!(m.file_name(), "VID_20230815_120000.mp4");
    }
}
