//! Runtime configuration
//!
//! Loaded once at startup from `pantry-moth.json` in the working directory.
//! A missing file yields the defaults; a malformed one is logged and yields
//! the defaults. There is no settings UI and nothing writes this file back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;

/// Settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "pantry-moth.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the sprite files are staged from
    pub assets_dir: PathBuf,
    /// High score file
    pub highscore_file: PathBuf,
    /// Log sink; the terminal backend owns the screen, so logs go to a file
    pub log_file: PathBuf,
    /// Frame cap applied on every screen
    pub target_fps: u32,
    /// Fixed seed for reproducible sessions; None seeds from the clock
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            highscore_file: PathBuf::from("pantry-moth.score"),
            log_file: PathBuf::from("pantry-moth.log"),
            target_fps: TARGET_FPS,
            rng_seed: None,
        }
    }
}

impl Settings {
    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load from a specific path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("malformed settings in {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Wall-clock budget of one frame
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.assets_dir, PathBuf::from("assets"));
        assert_eq!(s.target_fps, 30);
        assert_eq!(s.rng_seed, None);
        assert_eq!(s.frame_budget(), Duration::from_millis(33));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let s = Settings::load_from(Path::new("/nonexistent/pantry-moth.json"));
        assert_eq!(s.target_fps, Settings::default().target_fps);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "target_fps": 60 }"#).unwrap();
        assert_eq!(s.target_fps, 60);
        assert_eq!(s.highscore_file, PathBuf::from("pantry-moth.score"));
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!(
            "pantry-moth-test-settings-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        let s = Settings::load_from(&path);
        assert_eq!(s.target_fps, Settings::default().target_fps);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let s = Settings {
            target_fps: 0,
            ..Settings::default()
        };
        assert_eq!(s.frame_budget(), Duration::from_millis(1000));
    }
}
