use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;

/// Run configuration, read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory log files are written to
    pub log_dir: PathBuf,
    /// Log filename under `log_dir`
    pub logfile: String,
    /// Log files larger than this many bytes are truncated before the run
    pub logfile_max_size: u64,
    /// Base path scanned for media
    pub scan_root: PathBuf,
    /// Sub-path under `scan_root`
    pub scan_dir: String,
    /// Subdirectories under `scan_dir`, processed independently, in order
    pub scan_dirs: Vec<String>,
    /// Destination base for the sorted YYYY/MM/DD tree
    pub target_root_dir: PathBuf,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.target_root_dir.as_os_str().is_empty() {
            bail!("targetRootDir must not be empty");
        }
        if self.scan_dirs.is_empty() {
            bail!("scanDirs must list at least one subdirectory");
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.logfile)
    }

    pub fn scan_base(&self) -> PathBuf {
        self.scan_root.join(&self.scan_dir)
    }

    /// The subtrees to process, in configured order.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        let base = self.scan_base();
        self.scan_dirs.iter().map(|d| base.join(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "logDir": "/var/log/mediasort",
        "logfile": "mediasort.log",
        "logfileMaxSize": 1048576,
        "scanRoot": "/mnt/nas/pictures",
        "scanDir": "CameraUploads",
        "scanDirs": ["Alternate", "Phone"],
        "targetRootDir": "/mnt/nas/sorted"
    }"#;

    #[test]
    fn test_load_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        File::create(&path).unwrap().write_all(SAMPLE.as_bytes()).unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.logfile, "mediasort.log");
        assert_eq!(s.logfile_max_size, 1_048_576);
        assert_eq!(s.log_path(), PathBuf::from("/var/log/mediasort/mediasort.log"));
        assert_eq!(s.scan_base(), PathBuf::from("/mnt/nas/pictures/CameraUploads"));
        assert_eq!(
            s.scan_roots(),
            vec![
                PathBuf::from("/mnt/nas/pictures/CameraUploads/Alternate"),
                PathBuf::from("/mnt/nas/pictures/CameraUploads/Phone"),
            ]
        );
    }

    #[test]
    fn test_empty_scan_dirs_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let json = SAMPLE.replace(r#"["Alternate", "Phone"]"#, "[]");
        File::create(&path).unwrap().write_all(json.as_bytes()).unwrap();

        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn test_missing_key_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let json = SAMPLE.replace(r#""targetRootDir": "/mnt/nas/sorted""#, r#""unrelated": 1"#);
        File::create(&path).unwrap().write_all(json.as_bytes()).unwrap();

        assert!(Settings::load(&path).is_err());
    }
}
