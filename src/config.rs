// Core configuration - video region and save-state directory/slot layout.
//
// Scoped down from the teacher's `EmulatorConfig` (which also carried
// window size, audio volume, screenshot format, and hotkey bindings): those
// are host-video/input concerns this core doesn't own. What's left is the
// handful of knobs that affect core timing (region) or core I/O (where
// snapshots land on disk).

use std::fs;
use std::path::{Path, PathBuf};

use crate::ppu::Region;

const CONFIG_FILE: &str = "nes_core_config.toml";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CoreConfig {
    pub region: Region,
    pub save_directory: PathBuf,
    pub save_slot_count: u8,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            region: Region::Ntsc,
            save_directory: PathBuf::from("saves"),
            save_slot_count: 4,
        }
    }
}

impl CoreConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Loads from the default config file location, falling back to
    /// defaults (and logging at debug level) if it doesn't exist or fails
    /// to parse.
    pub fn load_or_default() -> Self {
        match Self::load(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(err) => {
                log::debug!("using default core config: {}", err);
                Self::default()
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}
