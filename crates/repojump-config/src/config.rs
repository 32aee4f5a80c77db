use std::{
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use repojump_utils::{
    fs::{read_optional, write_atomic},
    path::{resolve_path, xdg_config_home, xdg_data_home},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    display::DisplaySettings,
    error::{ConfigError, Result},
};

/// Application's configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Path to the JSON file backing the settings storage.
    /// Default: $XDG_DATA_HOME/repojump/storage.json
    pub storage_path: Option<String>,

    /// Output settings.
    pub display: Option<DisplaySettings>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("REPOJUMP_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("repojump").join("config.toml"),
    })
});

fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .to_path_buf()
}

pub fn set_config_path(path: PathBuf) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path;
}

pub fn init() -> Result<()> {
    let config = Config::new()?;
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    Ok(())
}

/// Returns the loaded configuration, or the defaults if [`init`] was never called.
pub fn get_config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default()
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            storage_path: Some("$XDG_DATA_HOME/repojump/storage.json".to_string()),
            display: Some(DisplaySettings {
                icons: Some(true),
                color: Some(true),
            }),
        }
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match read_optional(path)? {
            Some(content) => {
                debug!(path = %path.display(), "loading configuration");
                Ok(toml::from_str(&content)?)
            }
            None => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default_config())
            }
        }
    }

    /// Location of the settings storage file.
    ///
    /// `$REPOJUMP_STORAGE` wins over `storage_path`, which wins over the XDG default.
    pub fn get_storage_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("REPOJUMP_STORAGE") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(storage_path) = &self.storage_path {
            return Ok(resolve_path(storage_path)?);
        }
        Ok(xdg_data_home().join("repojump").join("storage.json"))
    }

    pub fn display(&self) -> DisplaySettings {
        self.display.clone().unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        write_atomic(&config_path, serialized.as_bytes())?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

pub fn generate_default_config() -> Result<()> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let serialized = toml::to_string_pretty(&Config::default_config())?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, serialized)?;

    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(())
}
