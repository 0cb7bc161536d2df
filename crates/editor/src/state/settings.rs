//! Editor settings with JSON persistence

use serde::{Deserialize, Serialize};

/// What a snap drag targets on the surface under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapTarget {
    #[default]
    Face,
    Vertex,
}

/// Snap behavior defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapSettings {
    pub target: SnapTarget,
    /// Align the snapped node's up axis to the hit surface normal
    pub align_rotation: bool,
}

/// Highlight colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSettings {
    /// Color of the shared selection wireframe material
    pub selection_color: [f32; 3],
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            // 0x505050 grey
            selection_color: [0.314, 0.314, 0.314],
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditorSettings {
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "meshedit", "meshedit") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "meshedit", "meshedit") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
