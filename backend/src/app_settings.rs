use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

pub static CHAPTERS_JSON: &str = include_str!("../assets/chapters.json");
pub static CROSS_REFERENCES_JSON: &str = include_str!("../assets/cross_references.json");

pub static SETTINGS_FILE_NAME: &str = "settings.json";
pub static CONTENT_DIR_NAME: &str = "content";
pub static VIDEO_REGISTRY_FILE_NAME: &str = "verse-videos.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Preferred language for initial video playback.
    pub primary_video_language: String,
    /// Per-verse content files. Defaults to `<gita dir>/content`.
    pub content_dir: Option<PathBuf>,
    /// Per-verse, per-language video registry. Defaults to `<gita dir>/verse-videos.json`.
    pub video_registry_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            primary_video_language: "en".to_string(),
            content_dir: None,
            video_registry_path: None,
        }
    }
}

impl AppSettings {
    /// Read `settings.json` from the gita dir, falling back to defaults when
    /// the file doesn't exist.
    pub fn load_from_dir(gita_dir: &Path) -> Result<Self> {
        let path = gita_dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return Ok(AppSettings::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        Ok(settings)
    }

    pub fn content_dir_in(&self, gita_dir: &Path) -> PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(|| gita_dir.join(CONTENT_DIR_NAME))
    }

    pub fn video_registry_path_in(&self, gita_dir: &Path) -> PathBuf {
        self.video_registry_path
            .clone()
            .unwrap_or_else(|| gita_dir.join(VIDEO_REGISTRY_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.content_dir_in(dir.path()), dir.path().join("content"));
        assert_eq!(settings.video_registry_path_in(dir.path()), dir.path().join("verse-videos.json"));
    }

    #[test]
    fn test_partial_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), r#"{"primary_video_language": "hi"}"#).unwrap();

        let settings = AppSettings::load_from_dir(dir.path()).unwrap();
        assert_eq!(settings.primary_video_language, "hi");
        assert_eq!(settings.content_dir, None);
    }

    #[test]
    fn test_malformed_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{").unwrap();
        assert!(AppSettings::load_from_dir(dir.path()).is_err());
    }
}
