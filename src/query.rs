// Filtering, due-date status and statistics over a task collection
//
// Everything here is a pure function of its inputs.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::models::{Priority, Task};

/// Tasks due within this many days (and not today) are "due soon"
pub const DUE_SOON_DAYS: i64 = 3;

/// Status selector for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    HighPriority,
    MediumPriority,
    LowPriority,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 6] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
        StatusFilter::HighPriority,
        StatusFilter::MediumPriority,
        StatusFilter::LowPriority,
    ];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => task.is_pending(),
            StatusFilter::Completed => task.completed,
            StatusFilter::HighPriority => task.priority == Priority::High,
            StatusFilter::MediumPriority => task.priority == Priority::Medium,
            StatusFilter::LowPriority => task.priority == Priority::Low,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Pending => write!(f, "Pending"),
            StatusFilter::Completed => write!(f, "Completed"),
            StatusFilter::HighPriority => write!(f, "High Priority"),
            StatusFilter::MediumPriority => write!(f, "Medium Priority"),
            StatusFilter::LowPriority => write!(f, "Low Priority"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            "high" | "highpriority" => Ok(StatusFilter::HighPriority),
            "medium" | "mediumpriority" => Ok(StatusFilter::MediumPriority),
            "low" | "lowpriority" => Ok(StatusFilter::LowPriority),
            _ => Err(StoreError::Validation(format!("Unknown filter: {}", s.trim()))),
        }
    }
}

/// Tasks matching `status` whose text contains `search` (case-insensitive)
///
/// A search term that is empty after trimming matches everything. Creation
/// order is preserved.
pub fn filter(tasks: &[Task], status: StatusFilter, search: &str) -> Vec<Task> {
    let needle = search.trim().to_lowercase();

    tasks
        .iter()
        .filter(|t| status.matches(t))
        .filter(|t| needle.is_empty() || t.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Deadline position of a task relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    None,
    Overdue(i64),
    DueToday,
    DueSoon(i64),
    Future,
}

impl DueStatus {
    pub fn is_overdue(self) -> bool {
        matches!(self, DueStatus::Overdue(_))
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::None | DueStatus::Future => Ok(()),
            DueStatus::Overdue(days) => write!(f, "OVERDUE by {} days", days),
            DueStatus::DueToday => write!(f, "DUE TODAY"),
            DueStatus::DueSoon(days) => write!(f, "Due in {} days", days),
        }
    }
}

/// Due status of `task` on `today`. Completion is not considered.
pub fn due_status(task: &Task, today: NaiveDate) -> DueStatus {
    let Some(due) = task.due_date else {
        return DueStatus::None;
    };

    let days_left = (due - today).num_days();
    match days_left {
        d if d < 0 => DueStatus::Overdue(-d),
        0 => DueStatus::DueToday,
        d if d <= DUE_SOON_DAYS => DueStatus::DueSoon(d),
        _ => DueStatus::Future,
    }
}

/// Aggregate counts over a task collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending tasks whose due date is before today
    pub overdue: usize,
    /// Rounded to one decimal place; 0 for an empty collection
    pub completion_rate_percent: f64,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Completed: {} | Pending: {} | Overdue: {} | Completion Rate: {:.1}%",
            self.total, self.completed, self.pending, self.overdue, self.completion_rate_percent
        )
    }
}

pub fn statistics(tasks: &[Task], today: NaiveDate) -> Statistics {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks
        .iter()
        .filter(|t| t.is_pending() && t.due_date.is_some_and(|due| due < today))
        .count();

    let completion_rate_percent = if total == 0 {
        0.0
    } else {
        round_one_decimal(completed as f64 / total as f64 * 100.0)
    };

    Statistics {
        total,
        completed,
        pending: total - completed,
        overdue,
        completion_rate_percent,
    }
}

/// Round the way `{:.1}` formats: exact decimal value, ties to even
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
