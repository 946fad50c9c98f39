//! Canonical task state for the board.
//!
//! The [`TaskStore`] owns the task list, team, filter, and view settings.
//! [`derive_visible_tasks`] turns that state into the filtered, sorted
//! sequence the board partitions into columns. Input coming from forms is
//! checked by [`validate_new_task`] before it reaches the store.

pub mod filter;
pub mod store;
pub mod validate;

pub use filter::{all_tags, derive_visible_tasks, page_count, paginate};
pub use store::{StoreChange, SubscriptionId, TaskStore};
pub use validate::{normalize_tags, validate_assignee, validate_new_task, validate_title};

use thiserror::Error;

/// Errors raised at the input boundary, before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("task title too long (max 256 characters)")]
    TitleTooLong,
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// Assignee is not a member of the team.
    #[error("invalid assignee: {0}")]
    InvalidAssignee(String),
}
