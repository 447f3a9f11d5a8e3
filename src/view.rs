use chrono::NaiveDate;

use crate::query::StatusFilter;
use crate::stats::Stats;
use crate::task::{Priority, Task};
use crate::theme::Theme;

pub const EMPTY_MESSAGE: &str = "No tasks to display";
pub const LOCATION_MARKER: &str = "📍";

/// Everything a user interaction can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit,
    ToggleComplete(u64),
    Delete(u64),
    SetFilter(StatusFilter),
    CycleFilter,
    SetSearch(String),
    ClearSearch,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: u64,
    pub completed: bool,
    pub text: String,
    pub priority: Priority,
    pub category: String,
    pub due: Option<String>,
    pub location: Option<String>,
}

impl TaskRow {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            completed: task.completed,
            text: task.text.clone(),
            priority: task.priority,
            category: task.category.clone(),
            due: task.due_date.map(format_date),
            location: task
                .location
                .as_ref()
                .map(|l| format!("{LOCATION_MARKER} {l}")),
        }
    }

    pub fn priority_label(&self) -> &'static str {
        self.priority.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Items(Vec<TaskRow>),
    Empty { message: &'static str },
}

impl ListView {
    pub fn build(visible: &[&Task]) -> Self {
        if visible.is_empty() {
            ListView::Empty {
                message: EMPTY_MESSAGE,
            }
        } else {
            ListView::Items(visible.iter().map(|t| TaskRow::from_task(t)).collect())
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        match self {
            ListView::Items(rows) => rows,
            ListView::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListView::Empty { .. })
    }
}

/// One frame's worth of derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub list: ListView,
    pub stats: Stats,
    pub filter: StatusFilter,
    pub theme: Theme,
}

/// Short, human date like `Jan 5, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
