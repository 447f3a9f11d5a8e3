use crate::task::Task;

/// Completion counts over the whole collection, ignoring filter and search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    /// Percentage in `[0, 100]`; zero for an empty collection.
    pub progress: f64,
}

impl Stats {
    pub fn compute(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let progress = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            completed,
            progress,
        }
    }

    pub fn total_label(&self) -> String {
        format!("{} tasks", self.total)
    }

    pub fn completion_label(&self) -> String {
        format!("{}% complete", self.progress.round() as u32)
    }

    /// Progress bar fill, `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        (self.progress / 100.0) as f32
    }
}
