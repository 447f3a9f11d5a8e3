use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "active" => Some(StatusFilter::Active),
            "completed" | "done" => Some(StatusFilter::Completed),
            _ => None,
        }
    }

    pub fn admits(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// What the list is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: StatusFilter,
    pub search: String,
}

impl Query {
    pub fn new(filter: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            filter,
            search: search.into(),
        }
    }
}

/// Case-insensitive substring match over text, category and location.
/// An empty needle matches everything.
pub fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    task.text.to_lowercase().contains(&needle)
        || task.category.to_lowercase().contains(&needle)
        || task
            .location
            .as_ref()
            .is_some_and(|l| l.to_lowercase().contains(&needle))
}

/// The tasks the list should show, in insertion order.
pub fn visible_tasks<'a>(tasks: &'a [Task], query: &Query) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| query.filter.admits(task) && matches_search(task, &query.search))
        .collect()
}
