use serde::{Deserialize, Serialize};

use crate::runtime::storage;

pub const HOST_SETTINGS_VERSION: &str = "1";
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;

/// Persisted host configuration. Missing fields fall back to defaults so
/// older settings files keep loading.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HostSettings {
    pub version: String,
    /// Directory the engine reads its assets (shaders, models, textures)
    /// from.
    pub assets_dir: String,
    /// Directory holding the results log and saved benchmark lists.
    pub data_dir: String,
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            version: HOST_SETTINGS_VERSION.to_string(),
            assets_dir: storage::default_assets_dir()
                .display()
                .to_string(),
            data_dir: storage::default_data_dir().display().to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: "glload".to_string(),
        }
    }
}

impl HostSettings {
    pub fn results_log_path(&self) -> std::path::PathBuf {
        storage::results_log_path(&self.data_dir)
    }
}
