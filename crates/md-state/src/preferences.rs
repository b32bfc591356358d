//! Display Preferences
//!
//! Persistent settings for the media display:
//! - History behaviour (snapshot cap, disposal of discarded snapshots)
//! - Viewport limits and wheel zoom
//! - Temporary storage location
//! - Theme variant used to build the display's palette

use std::fs;
use std::path::{Path, PathBuf};

use md_core::{DEFAULT_MIN_VISIBLE_SECS, ThemeVariant};
use serde::{Deserialize, Serialize};

/// All display preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    pub history: HistoryPreferences,
    pub viewport: ViewportPreferences,
    pub storage: StoragePreferences,
    pub theme: ThemeVariant,
}

/// History preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPreferences {
    /// Maximum snapshots kept per target (0 = unlimited)
    pub max_snapshots: usize,
    /// Delete snapshots dropped from the history
    pub release_discarded: bool,
}

impl Default for HistoryPreferences {
    fn default() -> Self {
        Self {
            max_snapshots: 0,
            release_discarded: true,
        }
    }
}

/// Viewport preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportPreferences {
    /// Narrowest visible span (seconds)
    pub min_visible_secs: f64,
    /// Zoom factor applied per mouse-wheel notch
    pub wheel_zoom_step: f64,
}

impl Default for ViewportPreferences {
    fn default() -> Self {
        Self {
            min_visible_secs: DEFAULT_MIN_VISIBLE_SECS,
            wheel_zoom_step: 1.25,
        }
    }
}

/// Temporary storage preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePreferences {
    /// Where snapshots are written (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DisplayPreferences {
    /// Load preferences from standard location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load preferences from specified path, falling back to defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed preferences {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to standard location
    pub fn save(&self) -> Result<(), PreferencesError> {
        self.save_to(Self::default_path())
    }

    /// Save preferences to specified path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), PreferencesError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get default preferences file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("mediadeck"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preferences.json")
    }

    /// Snapshot directory, resolved against the system temp dir
    pub fn temp_dir(&self) -> PathBuf {
        self.storage
            .temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("mediadeck"))
    }
}
