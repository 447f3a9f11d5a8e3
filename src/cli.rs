use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::controller::Controller;
use crate::error::ValidationError;
use crate::input::parse_due_date;
use crate::persistence::KeyValueStore;
use crate::query::StatusFilter;
use crate::task::{Priority, TaskDraft};
use crate::theme::Theme;
use crate::view::ListView;

#[derive(Debug, Parser)]
#[command(name = "taskpad", version, about = "A small local task list")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at info level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Add a task
    Add {
        text: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Print tasks and progress
    List {
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: StatusFilter,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Flip a task between active and completed
    Toggle { id: u64 },
    /// Remove a task
    Delete { id: u64 },
    /// Set the theme, or flip it when no value is given
    Theme {
        #[arg(value_parser = parse_theme)]
        value: Option<Theme>,
    },
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| format!("expected low, medium or high, got '{s}'"))
}

fn parse_filter(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(s).ok_or_else(|| format!("expected all, active or completed, got '{s}'"))
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("expected light or dark, got '{s}'"))
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => match Config::default_path() {
                Some(path) => path,
                None => return Ok(Config::default()),
            },
        };
        Config::load(&path).with_context(|| format!("failed to load {}", path.display()))
    }
}

pub fn init_tracing(verbose: bool, configured: Option<&str>) -> anyhow::Result<()> {
    let default_level = if verbose {
        "info"
    } else {
        configured.unwrap_or("warn")
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

/// Runs one subcommand against `controller`, writing human output to `out`.
pub fn run<S: KeyValueStore, W: Write>(
    command: CliCommand,
    controller: &mut Controller<S>,
    config: &Config,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        CliCommand::Add {
            text,
            due,
            priority,
            category,
            location,
        } => {
            let mut draft = TaskDraft::new(text)
                .with_priority(priority.unwrap_or(config.default_priority))
                .with_category(category.unwrap_or_else(|| config.initial_category()));
            if let Some(location) = location {
                draft = draft.with_location(location);
            }
            if let Some(date) = parse_due_date(due.as_deref().unwrap_or(""))? {
                draft = draft.with_due_date(date);
            }
            let id = controller.create(draft).map_err(|e| match e {
                ValidationError::EmptyText => anyhow!("task text must not be empty"),
                other => anyhow!(other),
            })?;
            let task = controller
                .get(id)
                .ok_or_else(|| anyhow!("task {id} vanished after creation"))?;
            writeln!(out, "✓ Added task {}: {}", task.id, task.text)?;
        }
        CliCommand::List { filter, search } => {
            controller.set_filter(filter);
            controller.set_search(search);
            let view = controller.view();
            match &view.list {
                ListView::Empty { message } => writeln!(out, "{message}")?,
                ListView::Items(rows) => {
                    for row in rows {
                        let mut line = format!(
                            "{} {} {} [{}] {}",
                            if row.completed { "[x]" } else { "[ ]" },
                            row.id,
                            row.text,
                            row.priority_label(),
                            row.category
                        );
                        if let Some(due) = &row.due {
                            line.push_str(&format!(" · {due}"));
                        }
                        if let Some(location) = &row.location {
                            line.push_str(&format!(" · {location}"));
                        }
                        writeln!(out, "{line}")?;
                    }
                }
            }
            writeln!(
                out,
                "{} | {}",
                view.stats.total_label(),
                view.stats.completion_label()
            )?;
        }
        CliCommand::Toggle { id } => {
            if controller.toggle_complete(id) {
                let done = controller.get(id).is_some_and(|t| t.completed);
                writeln!(out, "Task {id} is now {}", if done { "completed" } else { "active" })?;
            } else {
                writeln!(out, "No task with id {id}")?;
            }
        }
        CliCommand::Delete { id } => {
            if controller.delete(id) {
                writeln!(out, "Deleted task {id}")?;
            } else {
                writeln!(out, "No task with id {id}")?;
            }
        }
        CliCommand::Theme { value } => {
            let theme = match value {
                Some(theme) => {
                    controller.set_theme(theme);
                    theme
                }
                None => controller.toggle_theme(),
            };
            writeln!(out, "Theme: {theme}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn run_args(controller: &mut Controller<MemoryStore>, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("taskpad").chain(args.iter().copied()))?;
        let command = cli.command.ok_or_else(|| anyhow!("no subcommand"))?;
        let mut out = Vec::new();
        run(command, controller, &Config::default(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn no_subcommand_means_gui() {
        let cli = Cli::try_parse_from(["taskpad", "-v"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }

    #[test]
    fn add_then_list() {
        let mut c = Controller::load(MemoryStore::new());
        let out = run_args(
            &mut c,
            &[
                "add", "Call Alice", "--priority", "high", "--category", "Work", "--due",
                "2025-01-05", "--location", "Office",
            ],
        )
        .unwrap();
        assert!(out.contains("Call Alice"));

        let out = run_args(&mut c, &["list"]).unwrap();
        assert!(out.contains("[high] Work · Jan 5, 2025 · 📍 Office"));
        assert!(out.ends_with("1 tasks | 0% complete\n"));
    }

    #[test]
    fn add_uses_config_defaults() {
        let mut c = Controller::load(MemoryStore::new());
        run_args(&mut c, &["add", "Stretch"]).unwrap();
        let task = &c.tasks()[0];
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "Personal");
    }

    #[test]
    fn add_rejects_blank_text_and_bad_dates() {
        let mut c = Controller::load(MemoryStore::new());
        assert!(run_args(&mut c, &["add", "  "]).is_err());
        assert!(run_args(&mut c, &["add", "x", "--due", "soon"]).is_err());
        assert!(c.tasks().is_empty());
    }

    #[test]
    fn list_shows_placeholder_when_nothing_matches() {
        let mut c = Controller::load(MemoryStore::new());
        let out = run_args(&mut c, &["list", "--filter", "completed"]).unwrap();
        assert_eq!(out, "No tasks to display\n0 tasks | 0% complete\n");
    }

    #[test]
    fn unknown_ids_are_reported_not_failed() {
        let mut c = Controller::load(MemoryStore::new());
        assert_eq!(run_args(&mut c, &["toggle", "5"]).unwrap(), "No task with id 5\n");
        assert_eq!(run_args(&mut c, &["delete", "5"]).unwrap(), "No task with id 5\n");
    }

    #[test]
    fn theme_toggles_or_sets() {
        let mut c = Controller::load(MemoryStore::new());
        assert_eq!(run_args(&mut c, &["theme"]).unwrap(), "Theme: dark\n");
        assert_eq!(run_args(&mut c, &["theme", "dark"]).unwrap(), "Theme: dark\n");
        assert_eq!(run_args(&mut c, &["theme"]).unwrap(), "Theme: light\n");
        assert!(run_args(&mut c, &["theme", "sepia"]).is_err());
    }
}
