use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::task::{Priority, TaskDraft};

/// How long the field stays flagged after a rejected submit.
pub const ERROR_FLASH: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct InputForm {
    pub text: String,
    /// `YYYY-MM-DD`, or empty for no due date.
    pub due_date: String,
    pub priority: Priority,
    pub category: String,
    pub location: String,
    error_until: Option<Instant>,
    last_error: Option<ValidationError>,
}

impl InputForm {
    pub fn new(priority: Priority, category: impl Into<String>) -> Self {
        Self {
            priority,
            category: category.into(),
            ..Self::default()
        }
    }

    /// Validates the current fields. On failure the error indicator is
    /// raised until `now + ERROR_FLASH` and the fields are left as typed.
    pub fn submit(&mut self, now: Instant) -> Result<TaskDraft, ValidationError> {
        match self.read_fields() {
            Ok(draft) => {
                self.clear_error();
                Ok(draft)
            }
            Err(err) => {
                self.error_until = Some(now + ERROR_FLASH);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn read_fields(&self) -> Result<TaskDraft, ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let mut draft = TaskDraft::new(text)
            .with_priority(self.priority)
            .with_category(self.category.trim())
            .with_location(self.location.as_str());
        if let Some(date) = parse_due_date(&self.due_date)? {
            draft = draft.with_due_date(date);
        }
        Ok(draft)
    }

    /// Clears text, due date and location. Priority and category stay so
    /// several similar tasks can be entered in a row.
    pub fn clear_after_submit(&mut self) {
        self.text.clear();
        self.due_date.clear();
        self.location.clear();
    }

    pub fn has_error(&self, now: Instant) -> bool {
        self.error_until.is_some_and(|until| now < until)
    }

    /// The rejection still being shown, if any.
    pub fn error(&self, now: Instant) -> Option<&ValidationError> {
        if self.has_error(now) {
            self.last_error.as_ref()
        } else {
            None
        }
    }

    /// When the indicator will go away, so the UI can schedule a repaint.
    pub fn error_deadline(&self) -> Option<Instant> {
        self.error_until
    }

    /// Typing into the form clears the indicator straight away.
    pub fn on_text_edited(&mut self) {
        self.clear_error();
    }

    fn clear_error(&mut self) {
        self.error_until = None;
        self.last_error = None;
    }
}

pub fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDueDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> InputForm {
        let mut form = InputForm::new(Priority::High, "Work");
        form.text = "  Call Alice ".into();
        form.due_date = "2025-01-05".into();
        form.location = "Office".into();
        form
    }

    #[test]
    fn submit_reads_all_fields() {
        let mut form = filled();
        let draft = form.submit(Instant::now()).unwrap();
        assert_eq!(draft.text, "Call Alice");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.category, "Work");
        assert_eq!(draft.location.as_deref(), Some("Office"));
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 1, 5));
    }

    #[test]
    fn whitespace_text_flashes_for_one_second() {
        let now = Instant::now();
        let mut form = InputForm::default();
        form.text = "   ".into();
        assert_eq!(form.submit(now), Err(ValidationError::EmptyText));
        assert!(form.has_error(now));
        assert_eq!(form.error(now), Some(&ValidationError::EmptyText));
        assert!(form.has_error(now + Duration::from_millis(999)));
        assert!(!form.has_error(now + ERROR_FLASH));
        assert_eq!(form.text, "   ");
    }

    #[test]
    fn editing_clears_the_flash() {
        let now = Instant::now();
        let mut form = InputForm::default();
        assert!(form.submit(now).is_err());
        form.on_text_edited();
        assert!(!form.has_error(now));
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let now = Instant::now();
        let mut form = filled();
        form.due_date = "next tuesday".into();
        assert_eq!(
            form.submit(now),
            Err(ValidationError::InvalidDueDate("next tuesday".into()))
        );
        assert!(form.has_error(now));
    }

    #[test]
    fn clear_keeps_priority_and_category() {
        let mut form = filled();
        form.submit(Instant::now()).unwrap();
        form.clear_after_submit();
        assert!(form.text.is_empty());
        assert!(form.due_date.is_empty());
        assert!(form.location.is_empty());
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.category, "Work");
    }
}
