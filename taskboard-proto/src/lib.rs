//! Shared data model for the Taskboard kanban engine.
//!
//! Everything here is plain, serde-serializable data. Behavior that needs
//! ownership of the canonical task list lives in the `taskboard` crate.

pub mod filter;
pub mod member;
pub mod snapshot;
pub mod task;
pub mod view;

/// Error returned when a textual name does not map to a model enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Not one of `todo`, `in-progress`, `done`.
    #[error("unknown task status: {0}")]
    Status(String),
    /// Not one of `low`, `medium`, `high`.
    #[error("unknown priority: {0}")]
    Priority(String),
    /// Not one of `createdAt`, `dueDate`, `priority`.
    #[error("unknown sort field: {0}")]
    SortBy(String),
    /// Not one of `asc`, `desc`.
    #[error("unknown sort direction: {0}")]
    SortDirection(String),
    /// Not one of `kanban`, `list`, `table`.
    #[error("unknown view type: {0}")]
    ViewType(String),
}
