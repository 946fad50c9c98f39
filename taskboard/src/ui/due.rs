//! Relative due-date labels.

use chrono::NaiveDate;

/// Describes `due` relative to `today`: "Today", "Tomorrow", "In 3 days",
/// "2 weeks ago", and so on.
#[must_use]
pub fn describe_due(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=6 => format!("In {days} days"),
        -6..=-2 => format!("{} days ago", -days),
        d if d > 0 => format!("In {} weeks", d / 7),
        d => format!("{} weeks ago", -d / 7),
    }
}

/// A task is overdue once its due date is in the past; due today is not.
#[must_use]
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}
