use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up by [`Config::discover`].
pub const CONFIG_FILE_NAME: &str = "nuwrap.toml";

/// The `nuwrap.toml` configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub nuget: NuGetSection,
}

/// The `[nuget]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct NuGetSection {
    /// Explicit NuGet.exe; when set, no search is performed.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Directories searched before the defaults.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,
    /// Program used to host NuGet.exe, e.g. `mono`.
    #[serde(default)]
    pub launcher: Option<PathBuf>,
    /// Default `-Verbosity`.
    #[serde(default)]
    pub verbosity: Option<String>,
    /// Default `-ConfigFile`.
    #[serde(default)]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Read and parse a `nuwrap.toml`, resolving relative paths against the
    /// directory containing it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config = Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::debug!("loaded {}", path.display());
        Ok(config)
    }

    /// Parse configuration text without resolving paths.
    ///
    /// # Errors
    /// Returns an error if `content` is not a valid configuration.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `dir/nuwrap.toml` if it exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be loaded.
    pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_path(&path).map(Some)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let nuget = &mut self.nuget;
        if let Some(p) = nuget.path.take() {
            nuget.path = Some(base.join(p));
        }
        for root in &mut nuget.search_roots {
            *root = base.join(&*root);
        }
        if let Some(p) = nuget.config_file.take() {
            nuget.config_file = Some(base.join(p));
        }
        // A bare program name is looked up on PATH; only resolve real paths.
        if let Some(launcher) = nuget.launcher.take() {
            nuget.launcher = Some(if launcher.components().count() > 1 {
                base.join(launcher)
            } else {
                launcher
            });
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid nuwrap.toml at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}
