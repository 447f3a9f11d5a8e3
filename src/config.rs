use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::Priority;

pub const APP_NAME: &str = "taskpad";

fn default_categories() -> Vec<String> {
    vec![
        "Personal".into(),
        "Work".into(),
        "Shopping".into(),
        "Health".into(),
    ]
}

/// Optional settings read from `config.toml`. Every key may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `store.json` lives. `~` is expanded.
    pub data_dir: Option<String>,
    pub font_size: Option<f32>,
    pub categories: Vec<String>,
    pub default_priority: Priority,
    pub default_category: Option<String>,
    /// Tracing filter used when `RUST_LOG` is unset, e.g. `info` or `taskpad=debug`.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            font_size: None,
            categories: default_categories(),
            default_priority: Priority::default(),
            default_category: None,
            log_level: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Reads `path`. A missing file is not an error and yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        Self::parse(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.categories.retain(|c| !c.trim().is_empty());
        if config.categories.is_empty() {
            config.categories = default_categories();
        }
        Ok(config)
    }

    /// Resolved data directory: the configured one (tilde-expanded), else
    /// the platform data dir, else the working directory.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            let expanded = shellexpand::tilde(dir);
            return PathBuf::from(expanded.as_ref());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Category preselected in the form.
    pub fn initial_category(&self) -> String {
        self.default_category
            .clone()
            .or_else(|| self.categories.first().cloned())
            .unwrap_or_default()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size.unwrap_or(14.0).clamp(8.0, 24.0)
    }
}
