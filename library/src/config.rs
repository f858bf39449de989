use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::LibraryError;

pub const DEFAULT_MIN_CLIP_DURATION_SEC: f64 = 0.1;
pub const DEFAULT_MIN_CLIP_GAP_SEC: f64 = 0.0;
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 5.0;
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 10.0;
pub const DEFAULT_MIN_ZOOM: f64 = 0.01;
pub const DEFAULT_EDIT_POINT_THRESHOLD_SEC: f64 = 0.1;

/// Tunables for the edit engine, persisted as `edit_settings.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EditSettings {
    /// Shortest timeline duration a trim or roll may leave behind.
    pub min_clip_duration_sec: f64,
    /// Floor for rippled clip positions.
    pub min_clip_gap_sec: f64,
    /// Pointer travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    pub snap_threshold_px: f64,
    pub grid_interval_sec: Option<f64>,
    /// Pixels per second never drop below this.
    pub min_zoom: f64,
    pub edit_point_threshold_sec: f64,
    pub ripple_all_tracks: bool,
    pub linked_selection: bool,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            min_clip_duration_sec: DEFAULT_MIN_CLIP_DURATION_SEC,
            min_clip_gap_sec: DEFAULT_MIN_CLIP_GAP_SEC,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            snap_threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
            grid_interval_sec: None,
            min_zoom: DEFAULT_MIN_ZOOM,
            edit_point_threshold_sec: DEFAULT_EDIT_POINT_THRESHOLD_SEC,
            ripple_all_tracks: false,
            linked_selection: true,
        }
    }
}

impl EditSettings {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LibraryError> {
        let settings: EditSettings = toml::from_str(toml_str)?;
        settings.validate()
    }

    pub fn to_toml_string(&self) -> Result<String, LibraryError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(self) -> Result<Self, LibraryError> {
        if !self.min_clip_duration_sec.is_finite() || self.min_clip_duration_sec < 0.0 {
            return Err(LibraryError::InvalidArgument(format!(
                "min_clip_duration_sec must be finite and non-negative, got {}",
                self.min_clip_duration_sec
            )));
        }
        if !self.min_zoom.is_finite() || self.min_zoom <= 0.0 {
            return Err(LibraryError::InvalidArgument(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if let Some(interval) = self.grid_interval_sec {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(LibraryError::InvalidArgument(format!(
                    "grid_interval_sec must be positive, got {}",
                    interval
                )));
            }
        }
        Ok(self)
    }
}

fn get_settings_path() -> Option<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("me", "liesegang", "video_editor") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            if let Err(e) = fs::create_dir_all(config_dir) {
                error!("Failed to create config directory: {}", e);
                return None;
            }
        }
        return Some(config_dir.join("edit_settings.toml"));
    }
    None
}

pub fn save_settings(settings: &EditSettings) {
    if let Some(path) = get_settings_path() {
        match settings.to_toml_string() {
            Ok(toml_str) => {
                if let Err(e) = fs::write(&path, toml_str) {
                    error!("Failed to write settings file: {}", e);
                } else {
                    info!("Edit settings saved to {}", path.display());
                }
            }
            Err(e) => {
                error!("Failed to serialize settings: {}", e);
            }
        }
    }
}

pub fn load_settings() -> EditSettings {
    if let Some(path) = get_settings_path() {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(toml_str) => match EditSettings::from_toml_str(&toml_str) {
                    Ok(settings) => return settings,
                    Err(e) => {
                        warn!("Failed to parse settings file, using defaults: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings file, using defaults: {}", e);
                }
            }
        }
    }
    EditSettings::default()
}
