//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/boardtree/boardtree.toml`
//! 3. Local config: `--config <file>`, else `./.boardtree.toml`
//! 4. Environment variables: `BOARDTREE_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{IdGenerator, SequentialIds, UuidIds};

/// How fresh card and node ids are minted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    #[default]
    Uuid,
    Sequential,
}

impl IdStyle {
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            IdStyle::Uuid => Arc::new(UuidIds),
            IdStyle::Sequential => Arc::new(SequentialIds::new()),
        }
    }
}

/// Lazy child loading settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LazyLoadConfig {
    /// Simulated fetch latency in milliseconds
    pub delay_ms: u64,
    /// Number of children each fetch returns
    pub batch: usize,
    /// Make every fetch fail
    pub fail: bool,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            batch: 2,
            fail: false,
        }
    }
}

impl LazyLoadConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print ids next to titles and names
    pub show_ids: bool,
    /// Colored output (NO_COLOR still wins)
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_ids: false,
            color: true,
        }
    }
}

/// Unified configuration for boardtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub ids: IdStyle,
    pub lazy_load: LazyLoadConfig,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for boardtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "boardtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("boardtree.toml"))
}

/// Local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".boardtree.toml";

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; when `None`, `./.boardtree.toml`
    ///   is used if present
    ///
    /// An explicit local file must exist; the global and implicit local files
    /// are optional.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), local)
    }

    /// Load with an explicit global config path (`None` skips the global layer).
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Compiled defaults
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        // 2. Global config
        if let Some(global_path) = global {
            builder = builder.add_source(File::from(global_path).format(FileFormat::Toml).required(false));
        }

        // 3. Local config
        match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                builder = builder.add_source(
                    File::with_name(LOCAL_CONFIG_FILE)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // 4. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("BOARDTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
