use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::task::{Task, TaskDraft};

/// Source of "now" for ids and creation stamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Ids are millisecond timestamps, so nothing a real clock issues exceeds this.
const MAX_STORED_ID: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted records. Records with a repeated or
    /// out-of-range id, or blank text, are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        for task in tasks {
            if task.id > MAX_STORED_ID {
                warn!(id = task.id, "dropping stored task with out-of-range id");
                continue;
            }
            if store.get(task.id).is_some() {
                debug!(id = task.id, "dropping duplicate task id from storage");
                continue;
            }
            if task.text.trim().is_empty() {
                debug!(id = task.id, "dropping stored task with empty text");
                continue;
            }
            store.last_id = store.last_id.max(task.id);
            store.tasks.push(task);
        }
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Appends a task built from `draft`.
    ///
    /// The id is the creation time in milliseconds, bumped past the last
    /// issued id so two tasks created within the same millisecond (or
    /// after the clock steps backwards) never collide.
    pub fn create(&mut self, draft: TaskDraft, clock: &dyn Clock) -> Result<&Task, ValidationError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let now = clock.now();
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = stamp.max(self.last_id.saturating_add(1));
        self.last_id = id;

        let task = Task {
            id,
            text: text.to_string(),
            due_date: draft.due_date,
            priority: draft.priority,
            category: draft.category.trim().to_string(),
            location: draft
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            completed: false,
            created_at: now,
        };
        info!(id, text = %task.text, "created task");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flips `completed`. Returns `false` when no task has `id`.
    pub fn toggle_complete(&mut self, id: u64) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                info!(id, completed = task.completed, "toggled task");
                true
            }
            None => {
                debug!(id, "toggle ignored, no such task");
                false
            }
        }
    }

    /// Removes the task. Returns `false` when no task has `id`.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            info!(id, "deleted task");
        } else {
            debug!(id, "delete ignored, no such task");
        }
        removed
    }
}
