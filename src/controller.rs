// Changes are saved as soon as they happen. A failed write is logged and
// the in-memory state carries on.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::error::ValidationError;
use crate::input::InputForm;
use crate::persistence::{KeyValueStore, Persistence};
use crate::query::{visible_tasks, Query, StatusFilter};
use crate::stats::Stats;
use crate::store::{Clock, SystemClock, TaskStore};
use crate::task::{Task, TaskDraft};
use crate::theme::Theme;
use crate::view::{Command, ListView, ViewModel};

pub struct Controller<S: KeyValueStore> {
    tasks: TaskStore,
    theme: Theme,
    query: Query,
    form: InputForm,
    persistence: Persistence<S>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Loads tasks and theme from `store`, using the system clock.
    pub fn load(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        let persistence = Persistence::new(store);
        let tasks = TaskStore::from_tasks(persistence.load_tasks());
        let theme = persistence.load_theme();
        info!(tasks = tasks.len(), %theme, "loaded state");
        Self {
            tasks,
            theme,
            query: Query::default(),
            form: InputForm::default(),
            persistence,
            clock,
        }
    }

    /// Seeds the form's priority and category pickers.
    pub fn with_form(mut self, form: InputForm) -> Self {
        self.form = form;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut InputForm {
        &mut self.form
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn into_store(self) -> S {
        self.persistence.into_inner()
    }

    pub fn create(&mut self, draft: TaskDraft) -> Result<u64, ValidationError> {
        let id = self.tasks.create(draft, self.clock.as_ref())?.id;
        self.persist_tasks();
        Ok(id)
    }

    /// Validates the form, creates the task and clears the form. A rejected
    /// submit leaves the collection untouched and flags the form.
    pub fn submit_form(&mut self, now: Instant) -> Result<u64, ValidationError> {
        let draft = match self.form.submit(now) {
            Ok(draft) => draft,
            Err(err) => {
                debug!(error = %err, "form rejected");
                return Err(err);
            }
        };
        let id = self.create(draft)?;
        self.form.clear_after_submit();
        Ok(id)
    }

    pub fn toggle_complete(&mut self, id: u64) -> bool {
        let changed = self.tasks.toggle_complete(id);
        if changed {
            self.persist_tasks();
        }
        changed
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let changed = self.tasks.delete(id);
        if changed {
            self.persist_tasks();
        }
        changed
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.query.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggle());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        info!(%theme, "theme changed");
        if let Err(e) = self.persistence.save_theme(theme) {
            error!(error = %e, "failed to save theme");
        }
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) {
        debug!(?command, "dispatch");
        match command {
            Command::Submit => {
                // A rejection is already flagged on the form for the UI to show.
                if let Err(err) = self.submit_form(now) {
                    debug!(error = %err, "submit command rejected");
                }
            }
            Command::ToggleComplete(id) => {
                self.toggle_complete(id);
            }
            Command::Delete(id) => {
                self.delete(id);
            }
            Command::SetFilter(filter) => self.set_filter(filter),
            Command::CycleFilter => self.set_filter(self.query.filter.next()),
            Command::SetSearch(search) => self.set_search(search),
            Command::ClearSearch => self.set_search(String::new()),
            Command::ToggleTheme => {
                self.toggle_theme();
            }
        }
    }

    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(self.tasks.tasks(), &self.query)
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(self.tasks.tasks())
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            list: ListView::build(&self.visible()),
            stats: self.stats(),
            filter: self.query.filter,
            theme: self.theme,
        }
    }

    fn persist_tasks(&mut self) {
        if let Err(e) = self.persistence.save_tasks(self.tasks.tasks()) {
            error!(error = %e, "failed to save tasks");
        }
    }
}
