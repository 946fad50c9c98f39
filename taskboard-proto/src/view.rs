//! View selection and card display options.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Which presentation of the task list is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// Columns by status, with drag and drop.
    #[default]
    Kanban,
    /// Paginated list.
    List,
    /// Table.
    Table,
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kanban => write!(f, "kanban"),
            Self::List => write!(f, "list"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl FromStr for ViewType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kanban" => Ok(Self::Kanban),
            "list" => Ok(Self::List),
            "table" => Ok(Self::Table),
            other => Err(ParseError::ViewType(other.to_string())),
        }
    }
}

/// Which optional task fields are shown on cards and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools, clippy::struct_field_names)]
pub struct ViewOptions {
    /// Show tag chips.
    pub show_tags: bool,
    /// Show the assignee.
    pub show_assignee: bool,
    /// Show the due date.
    pub show_due_date: bool,
    /// Show the priority.
    pub show_priority: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_tags: true,
            show_assignee: true,
            show_due_date: true,
            show_priority: true,
        }
    }
}

impl ViewOptions {
    /// Merges `patch` into these options.
    pub const fn apply(&mut self, patch: &ViewOptionsPatch) {
        if let Some(v) = patch.show_tags {
            self.show_tags = v;
        }
        if let Some(v) = patch.show_assignee {
            self.show_assignee = v;
        }
        if let Some(v) = patch.show_due_date {
            self.show_due_date = v;
        }
        if let Some(v) = patch.show_priority {
            self.show_priority = v;
        }
    }
}

/// A partial update to [`ViewOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct ViewOptionsPatch {
    /// New `show_tags`.
    pub show_tags: Option<bool>,
    /// New `show_assignee`.
    pub show_assignee: Option<bool>,
    /// New `show_due_date`.
    pub show_due_date: Option<bool>,
    /// New `show_priority`.
    pub show_priority: Option<bool>,
}
