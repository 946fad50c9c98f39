//! Filter and sort criteria for the visible task list.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::member::MemberId;

/// Field the visible task list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Due date; tasks without one always sort last.
    DueDate,
    /// Priority ordinal.
    Priority,
}

impl FromStr for SortBy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created-at" | "created" => Ok(Self::CreatedAt),
            "dueDate" | "due-date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            other => Err(ParseError::SortBy(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first (the default: newest tasks on top).
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(ParseError::SortDirection(other.to_string())),
        }
    }
}

/// Filter and sort criteria applied to the canonical task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Case-insensitive title substring; empty matches everything.
    pub search: String,
    /// Required tags with OR semantics; empty matches everything.
    pub tags: Vec<String>,
    /// Exact assignee match when set.
    pub assigned_to: Option<MemberId>,
    /// Sort field.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_direction: SortDirection,
}

impl TaskFilter {
    /// Default criteria restricted to one assignee.
    #[must_use]
    pub fn for_member(member: MemberId) -> Self {
        Self {
            assigned_to: Some(member),
            ..Self::default()
        }
    }

    /// Returns `true` if search, tags, or sorting differ from the defaults.
    ///
    /// The assignee is not considered; it is driven by member selection.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.tags.is_empty()
            || self.sort_by != SortBy::default()
            || self.sort_direction != SortDirection::default()
    }

    /// Resets search, tags, and sorting while keeping the assignee.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            assigned_to: self.assigned_to.clone(),
            ..Self::default()
        }
    }

    /// Merges `patch` into these criteria.
    pub fn apply(&mut self, patch: &FilterPatch) {
        if let Some(search) = &patch.search {
            self.search.clone_from(search);
        }
        if let Some(tags) = &patch.tags {
            self.tags.clone_from(tags);
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to.clone_from(assigned_to);
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_direction) = patch.sort_direction {
            self.sort_direction = sort_direction;
        }
    }
}

/// A partial update to [`TaskFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    /// New search text.
    pub search: Option<String>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
    /// New assignee; `Some(None)` clears it.
    pub assigned_to: Option<Option<MemberId>>,
    /// New sort field.
    pub sort_by: Option<SortBy>,
    /// New sort direction.
    pub sort_direction: Option<SortDirection>,
}
