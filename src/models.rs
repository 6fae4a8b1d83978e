// Data models for the task list

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StoreError};

/// Fixed textual date format used at every boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task identifier, unique within a store and never reused after deletion
pub type TaskId = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Short visual marker for list rendering
    pub fn marker(self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(StoreError::Validation(format!(
                "Unknown priority: {} (expected High, Medium or Low)",
                other
            ))),
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Build a pending task, trimming and validating its text
    pub fn new(id: TaskId, text: &str, priority: Priority, due_date: Option<NaiveDate>) -> Result<Self> {
        Ok(Self {
            id,
            text: validate_text(text)?,
            priority,
            due_date,
            completed: false,
            created_at: now(),
        })
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// Trim task text, rejecting empty or whitespace-only input
pub fn validate_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(
            "Task text cannot be empty or whitespace-only".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse a calendar date in strict `YYYY-MM-DD` form
///
/// Anything other than four-digit year, two-digit month and two-digit day
/// separated by `-` is rejected, as is a well-formed but impossible date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    let bytes = s.as_bytes();

    let well_formed = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });

    if !well_formed {
        return Err(StoreError::Validation(format!(
            "Invalid date format: {:?} (use YYYY-MM-DD)",
            s
        )));
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StoreError::Validation(format!("Invalid date: {} ({})", s, e)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Current local time, no time zone attached
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

mod due_date_format {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_date(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_new_trims_text() {
        let task = Task::new(1, "  Buy milk \n", Priority::default(), None).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_is_pending_tracks_completion() {
        let mut task = Task::new(1, "Buy milk", Priority::Low, None).unwrap();
        assert!(task.is_pending());
        task.completed = true;
        assert!(!task.is_pending());
    }

    #[test]
    fn test_task_new_rejects_blank_text() {
        assert!(Task::new(1, "", Priority::High, None).is_err());
        assert!(Task::new(1, "   ", Priority::High, None).is_err());
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_date(" 2024-12-31 ").unwrap(), date(2024, 12, 31));
    }

    #[test]
    fn test_parse_date_rejects_bad_input() {
        assert!(parse_date("2024-13-40").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("2024/01/05").is_err());
        assert!(parse_date("05-01-2024").is_err());
        assert!(parse_date("2024-01-05T10:00").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" LOW ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::High.to_string(), "High");
    }

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: 7,
            text: "Pay rent".to_string(),
            priority: Priority::High,
            due_date: Some(date(2024, 3, 1)),
            completed: false,
            created_at: date(2024, 2, 20).and_hms_opt(9, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["priority"], "High");
        assert_eq!(value["due_date"], "2024-03-01");
        assert_eq!(value["completed"], false);
        assert!(value["created_at"].as_str().unwrap().starts_with("2024-02-20T09:30:00"));
    }

    #[test]
    fn test_task_deserialize_tolerates_extra_fields_and_null_date() {
        let json = r#"{
            "id": 3,
            "text": "Water plants",
            "priority": "Low",
            "due_date": null,
            "completed": true,
            "created_at": "2024-01-15T08:12:45.123456",
            "color": "green"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.due_date.is_none());
        assert!(task.completed);
    }

    #[test]
    fn test_task_deserialize_rejects_bad_due_date() {
        let json = r#"{"id":1,"text":"x","priority":"High","due_date":"01/02/2024","completed":false,"created_at":"2024-01-15T08:12:45"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
