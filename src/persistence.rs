// Two keys: `tasks` (JSON array of task records) and `theme` (`light` or
// `dark`). Reads never fail; bad entries fall back to defaults.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::task::Task;
use crate::theme::Theme;

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";

/// String-keyed storage with get/set semantics and no transactions.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: String) -> Result<()>;
}

/// Volatile store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All entries kept in one JSON object on disk, rewritten atomically on
/// every `set_string`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "store.json";

    /// Opens `<data_dir>/store.json`, creating the directory if needed.
    #[tracing::instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).map_err(|e| Error::io(data_dir, e))?;
        let path = data_dir.join(Self::FILE_NAME);

        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read store file, starting empty");
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let content = serde_json::to_string_pretty(&self.entries).map_err(|source| Error::Json {
            key: Self::FILE_NAME.to_string(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.flush().map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.write_atomic()
    }
}

/// Typed load/save over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        let Some(raw) = self.store.get_string(TASKS_KEY) else {
            debug!("no stored tasks");
            return Vec::new();
        };
        let records = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&raw) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "stored tasks are malformed, starting with an empty list");
                return Vec::new();
            }
        };

        // Records decode one at a time; a bad one is dropped on its own.
        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(index, error = %e, "dropping unreadable stored task");
                    None
                }
            })
            .collect()
    }

    pub fn load_theme(&self) -> Theme {
        let Some(raw) = self.store.get_string(THEME_KEY) else {
            return Theme::default();
        };
        Theme::parse(raw.trim().trim_matches('"')).unwrap_or_else(|| {
            warn!(value = %raw, "unknown stored theme, using default");
            Theme::default()
        })
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks).map_err(|source| Error::Json {
            key: TASKS_KEY.to_string(),
            source,
        })?;
        debug!(count = tasks.len(), "saving tasks");
        self.store.set_string(TASKS_KEY, json)
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        debug!(%theme, "saving theme");
        self.store.set_string(THEME_KEY, theme.name().to_string())
    }
}
