// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line settings, stored as RON.

use nodelib_snapshot::{RestoreOptions, DEFAULT_PLACEMENT_MARGIN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default settings file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "nodelib.ron";

/// Persistent settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings format version
    pub version: u32,
    /// Directory holding the node library files
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// Gap between existing and imported nodes
    #[serde(default = "default_margin")]
    pub placement_margin: f32,
    /// Select imported nodes
    #[serde(default = "default_select")]
    pub select_imported: bool,
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("node_library")
}

fn default_margin() -> f32 {
    DEFAULT_PLACEMENT_MARGIN
}

fn default_select() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            library_dir: default_library_dir(),
            placement_margin: default_margin(),
            select_imported: default_select(),
        }
    }
}

impl AppConfig {
    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = ron::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Config version {} is newer than supported version {}",
                    config.version, CONFIG_FORMAT_VERSION
                ),
            ));
        }

        Ok(config)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> std::io::Result<Self> {
        match Self::load(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }

    /// Restore options derived from these settings
    pub fn restore_options(&self) -> RestoreOptions {
        RestoreOptions::default()
            .with_margin(self.placement_margin)
            .with_selection(self.select_imported)
    }
}
