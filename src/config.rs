// SPDX-License-Identifier: GPL-3.0-only

//! Kiosk configuration, stored as JSON under the platform config directory

use crate::backends::camera::CameraBackendType;
use crate::constants::{app_info, timing};
use crate::errors::ConfigError;
use crate::scan::{ScanKind, ScanProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Version written by this build
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    /// Camera backend to use (V4L2 or Virtual)
    pub backend: CameraBackendType,
    /// Preferred camera device path; first device when unset or missing
    pub camera_path: Option<String>,
    /// Multiplier applied to every scan delay (0.5 runs twice as fast),
    /// between 0 and [`timing::MAX_SCAN_SPEED`]
    pub scan_speed: f64,
    /// Override for the face scan's camera warm-up
    pub camera_warmup_ms: Option<u64>,
    /// Fixed backdrop layout; a fresh one per launch when unset
    pub backdrop_seed: Option<u64>,
    /// Draw the floating particles behind the kiosk screens
    pub show_particles: bool,
    /// Draw the glowing orbs behind the kiosk screens
    pub show_orbs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: CameraBackendType::default(),
            camera_path: None,
            scan_speed: 1.0,
            camera_warmup_ms: None,
            backdrop_seed: None,
            show_particles: true,
            show_orbs: true,
        }
    }
}

impl Config {
    /// `<config_dir>/opticheck/config.json`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(app_info::DIR_NAME).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;

        if config.version != CONFIG_VERSION {
            warn!(
                expected = CONFIG_VERSION,
                found = config.version,
                "Config version mismatch"
            );
        }

        debug!(path = %path.display(), backend = %config.backend, "Loaded config");
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Profile for `kind` with this configuration's timing applied
    pub fn scan_profile(&self, kind: ScanKind) -> ScanProfile {
        let mut profile = ScanProfile::for_kind(kind);
        if kind == ScanKind::Face
            && let Some(ms) = self.camera_warmup_ms
        {
            profile.warmup = Duration::from_millis(ms);
        }

        let speed = if (0.0..=timing::MAX_SCAN_SPEED).contains(&self.scan_speed) {
            self.scan_speed
        } else {
            warn!(scan_speed = self.scan_speed, "Ignoring invalid scan speed");
            1.0
        };
        profile.scaled(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = Config {
            backend: CameraBackendType::Virtual,
            camera_path: Some("/dev/video2".to_string()),
            backdrop_seed: Some(7),
            show_orbs: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "backend": "virtual" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend, CameraBackendType::Virtual);
        assert_eq!(config.scan_speed, 1.0);
        assert!(config.show_particles);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_scan_profile_applies_timing() {
        let config = Config {
            scan_speed: 0.5,
            camera_warmup_ms: Some(400),
            ..Config::default()
        };
        let face = config.scan_profile(ScanKind::Face);
        assert_eq!(face.warmup, Duration::from_millis(200));
        assert_eq!(face.period, Duration::from_millis(50));

        let vitals = Config::default().scan_profile(ScanKind::Vitals);
        assert_eq!(vitals, ScanProfile::VITALS);
    }

    #[test]
    fn test_negative_speed_ignored() {
        let config = Config {
            scan_speed: -3.0,
            ..Config::default()
        };
        assert_eq!(config.scan_profile(ScanKind::IdDocument), ScanProfile::ID_DOCUMENT);
    }

    #[test]
    fn test_huge_speed_falls_back_to_default_timing() {
        let config: Config = serde_json::from_str(r#"{ "scan_speed": 1e30 }"#).unwrap();
        assert_eq!(config.scan_profile(ScanKind::Face), ScanProfile::FACE);
        assert_eq!(config.scan_profile(ScanKind::Vitals), ScanProfile::VITALS);
    }

    #[test]
    fn test_huge_warmup_does_not_overflow() {
        let config = Config {
            camera_warmup_ms: Some(u64::MAX),
            scan_speed: timing::MAX_SCAN_SPEED,
            ..Config::default()
        };
        let face = config.scan_profile(ScanKind::Face);
        assert!(face.warmup >= Duration::from_millis(u64::MAX));
        assert!(face.duration() >= face.warmup);
    }
}
