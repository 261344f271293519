//! Locating and layering config files.
//!
//! Layers, lowest precedence first:
//! 1. user config, `<config dir>/formflow/config.toml`
//! 2. project config, `./formflow.toml`
//! 3. an explicit file, from [`ConfigLoader::with_file`] or `FORMFLOW_CONFIG`
//!
//! A broken user or project file is skipped with a warning. An explicit
//! file must exist and parse.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{ConfigError, FormflowConfig, Result};

const PROJECT_CONFIG_FILE: &str = "formflow.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "formflow";

/// Overrides the user config directory.
pub const CONFIG_DIR_ENV: &str = "FORMFLOW_CONFIG_DIR";

/// Names a single config file that is layered on top of everything else.
pub const CONFIG_FILE_ENV: &str = "FORMFLOW_CONFIG";

/// Which layer a file was considered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    User,
    Project,
    Explicit,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigLayer::User => "user",
            ConfigLayer::Project => "project",
            ConfigLayer::Explicit => "explicit",
        })
    }
}

/// A file that discovery looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub layer: ConfigLayer,
    pub path: PathBuf,
    /// False when the file was absent or skipped.
    pub loaded: bool,
}

/// Merged configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FormflowConfig,
    pub sources: Vec<ConfigSource>,
    /// Skipped layers, for the caller to log.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the files that contributed to `config`.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Builder for config discovery.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_dir: Option<PathBuf>,
    project_dir: PathBuf,
    file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            user_dir: user_config_dir(),
            project_dir: PathBuf::from("."),
            file: std::env::var_os(CONFIG_FILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl ConfigLoader {
    /// Loader using the environment and platform defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    /// Skip the user layer entirely.
    pub fn without_user_config(mut self) -> Self {
        self.user_dir = None;
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Layer `path` on top, failing if it cannot be loaded.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig {
            config: FormflowConfig::new(),
            sources: Vec::new(),
            warnings: Vec::new(),
        };

        if let Some(dir) = &self.user_dir {
            merge_optional(&mut loaded, ConfigLayer::User, dir.join(USER_CONFIG_FILE));
        }
        merge_optional(
            &mut loaded,
            ConfigLayer::Project,
            self.project_dir.join(PROJECT_CONFIG_FILE),
        );

        if let Some(path) = &self.file {
            let layer = load_config_file(path)?;
            loaded.config.merge(layer);
            loaded.sources.push(ConfigSource {
                layer: ConfigLayer::Explicit,
                path: path.clone(),
                loaded: true,
            });
        }

        Ok(loaded)
    }
}

/// Discover and merge config, with `project_dir` defaulting to the cwd.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(dir) = project_dir {
        loader = loader.with_project_dir(dir);
    }
    loader.load()
}

/// Parse one file, without discovery.
pub fn load_config_file(path: &Path) -> Result<FormflowConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    FormflowConfig::from_toml(&contents)
}

/// `FORMFLOW_CONFIG_DIR`, else `<platform config dir>/formflow`.
pub fn user_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn merge_optional(loaded: &mut LoadedConfig, layer: ConfigLayer, path: PathBuf) {
    let mut source = ConfigSource {
        layer,
        path,
        loaded: false,
    };

    if source.path.is_file() {
        match load_config_file(&source.path) {
            Ok(config) => {
                loaded.config.merge(config);
                source.loaded = true;
            }
            Err(e) => loaded
                .warnings
                .push(format!("skipping {layer} config {}: {e}", source.path.display())),
        }
    }

    loaded.sources.push(source);
}
