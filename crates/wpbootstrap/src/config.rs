//! Plugin and theme configuration.
//!
//! Configuration can be built in code or loaded from YAML:
//!
//! ```yaml
//! name: acme-gallery
//! version: 1.4.0
//! base_dir: .
//! view_directory: view     # default
//! extension: jinja         # default
//! theme_root: /srv/www/wp-content/themes/site
//! ```
//!
//! A relative `base_dir` in a file is resolved against the file's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wpbootstrap_render::DEFAULT_EXTENSION;

/// Default view directory, relative to the plugin base.
pub const DEFAULT_VIEW_DIRECTORY: &str = "view";

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

fn default_view_directory() -> String {
    DEFAULT_VIEW_DIRECTORY.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Settings for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Host-friendly plugin name; also the theme override sub-directory.
    pub name: String,
    /// Version of the plugin code, compared against the recorded version.
    pub version: String,
    /// Directory containing the plugin.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// View directory relative to `base_dir`.
    #[serde(default = "default_view_directory")]
    pub view_directory: String,
    /// View file extension.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Active theme directory; takes precedence over the host's.
    #[serde(default)]
    pub theme_root: Option<PathBuf>,
}

impl PluginConfig {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            base_dir: base_dir.into(),
            view_directory: default_view_directory(),
            extension: default_extension(),
            theme_root: None,
        }
    }

    pub fn with_view_directory(mut self, dir: impl Into<String>) -> Self {
        self.view_directory = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_theme_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.theme_root = Some(root.into());
        self
    }

    /// Parses YAML without touching the filesystem.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads YAML from `path`, resolving a relative `base_dir` against the
    /// file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&yaml)?;
        if config.base_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.base_dir = parent.join(&config.base_dir);
            }
        }
        Ok(config)
    }

    /// Checks invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_name(&self.name)?;
        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid("version must not be empty".into()));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".into()));
        }
        Ok(())
    }

    /// `base_dir/view_directory`.
    pub fn view_root(&self) -> PathBuf {
        self.base_dir.join(&self.view_directory)
    }
}

/// Settings for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub version: String,
}

impl ThemeConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        validate_name(&config.name)?;
        Ok(config)
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid("name must not be empty".into()));
    }
    if name.contains(['/', '\\']) {
        return Err(ConfigError::Invalid(format!(
            "name {:?} must not contain path separators",
            name
        )));
    }
    Ok(())
}
