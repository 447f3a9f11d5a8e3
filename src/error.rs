use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON under key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejections from the create-task form. Nothing is mutated when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text is empty")]
    EmptyText,

    #[error("due date '{0}' is not a YYYY-MM-DD date")]
    InvalidDueDate(String),
}
