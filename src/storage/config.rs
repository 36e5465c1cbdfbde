//! Configuration handling for todoit
//!
//! Configuration is stored in `todoit.toml` (project, found by walking up
//! from the current directory) and `~/.config/todoit/config.toml` (global).
//! Project values override global ones.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NEW_LIST_NAME;

/// Name of the project-local configuration file
pub const PROJECT_CONFIG_FILE: &str = "todoit.toml";

/// Document file used when nothing else names one
pub const DEFAULT_DOCUMENT_FILE: &str = "todo.todoit";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write configuration {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where the document lives and how new lists are named
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document path, relative to the directory holding `todoit.toml`
    pub file: Option<PathBuf>,

    /// Name given to lists added without one
    pub new_list_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            file: None,
            new_list_name: NEW_LIST_NAME.to_string(),
        }
    }
}

/// Settings for `todoit watch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before a burst of file events is reported
    pub debounce_millis: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_millis: 200,
        }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_millis)
    }
}

/// Defaults for new statuses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatusConfig {
    pub default_color: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            default_color: "#4A9EFF".to_string(),
        }
    }
}

/// Project-level configuration (`todoit.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Overrides the global output format
    pub default_format: Option<OutputFormat>,

    pub document: DocumentConfig,

    pub watch: WatchConfig,

    pub status: StatusConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        let global = Self::load_global()?;
        match Self::find_project_root() {
            Some(root) => Ok(Self {
                project: Self::load_project_config(&root)?,
                global,
                project_root: Some(root),
            }),
            None => Ok(Self {
                global,
                ..Self::default()
            }),
        }
    }

    /// Loads configuration for a specific project directory
    pub fn for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            project: Self::load_project_config(project_root)?,
            global: Self::load_global()?,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "todoit", "todoit").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig, ConfigError> {
        match Self::global_config_dir() {
            Some(dir) => read_toml(&dir.join("config.toml")),
            None => Ok(GlobalConfig::default()),
        }
    }

    fn load_project_config(project_root: &Path) -> Result<ProjectConfig, ConfigError> {
        read_toml(&project_root.join(PROJECT_CONFIG_FILE))
    }

    /// Finds the project root by looking for `todoit.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_CONFIG_FILE).is_file())
            .map(Path::to_path_buf)
    }

    /// Effective output format
    pub fn format(&self) -> OutputFormat {
        self.project.default_format.unwrap_or(self.global.default_format)
    }

    /// Document path from `[document] file`, resolved against the project root
    pub fn document_file(&self) -> Option<PathBuf> {
        let file = self.project.document.file.as_ref()?;
        Some(match &self.project_root {
            Some(root) if file.is_relative() => root.join(file),
            _ => file.clone(),
        })
    }

    /// Writes `todoit.toml` into `dir` unless one exists; returns its path
    pub fn init_project(dir: &Path, project: &ProjectConfig) -> Result<PathBuf, ConfigError> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if path.exists() {
            return Ok(path);
        }
        write_toml(&path, project)?;
        Ok(path)
    }
}

/// Reads a TOML file; a missing file yields the defaults
fn read_toml<T>(path: &Path) -> Result<T, ConfigError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let write_error = |message: String| ConfigError::Write {
        path: path.to_path_buf(),
        message,
    };
    let content = toml::to_string_pretty(value).map_err(|e| write_error(e.to_string()))?;
    fs::write(path, content).map_err(|e| write_error(e.to_string()))
}
