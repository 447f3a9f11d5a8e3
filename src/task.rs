use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single to-do item. Only `completed` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default, with = "blank_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default, with = "blank_string")]
    pub location: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// The validated fields of a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: String,
    pub location: Option<String>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            due_date: None,
            priority: Priority::default(),
            category: String::new(),
            location: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        let trimmed = location.trim();
        self.location = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}

// Unknown labels read as the default instead of rejecting the record.
fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Priority, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().and_then(Priority::parse).unwrap_or_default())
}

/// Dates are stored as `YYYY-MM-DD`, with `""` for "no date".
mod blank_date {
    use super::*;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&date.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Optional strings are stored as `""` when absent.
mod blank_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_blank_optionals() {
        let task = Task {
            id: 1736000000000,
            text: "Buy Milk".into(),
            due_date: None,
            priority: Priority::High,
            category: "Shopping".into(),
            location: None,
            completed: false,
            created_at: DateTime::parse_from_rfc3339("2025-01-04T14:13:20Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "");
        assert_eq!(json["location"], "");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["createdAt"], "2025-01-04T14:13:20Z");
    }

    #[test]
    fn reads_browser_shaped_record() {
        let raw = r#"{
            "id": 1736000000000,
            "text": "Call Alice",
            "dueDate": "2025-01-05",
            "priority": "low",
            "category": "Work",
            "location": "",
            "completed": true,
            "createdAt": "2025-01-04T14:13:20.000Z"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(task.location, None);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.completed);
    }

    #[test]
    fn unknown_priority_reads_as_default() {
        let raw = r#"{"id": 7, "text": "Keep me", "priority": "urgent",
                      "createdAt": "2025-01-04T14:13:20Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn draft_location_is_trimmed_and_blank_means_none() {
        assert_eq!(TaskDraft::new("x").with_location("   ").location, None);
        assert_eq!(
            TaskDraft::new("x").with_location(" Office ").location.as_deref(),
            Some("Office")
        );
    }

    #[test]
    fn priority_parse_accepts_labels() {
        for p in Priority::ALL {
            assert_eq!(Priority::parse(p.label()), Some(p));
        }
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }
}
