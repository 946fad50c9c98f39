//! Persisted board state and its JSON codec.
//!
//! The whole store state is serialized as one flat JSON object wrapped in a
//! versioned envelope (`{"state": {...}, "version": 0}`) and saved under a
//! single key. Restoring is verbatim: there is no schema migration, so a
//! shape mismatch surfaces as [`CodecError::Decode`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::TaskFilter;
use crate::member::{MemberId, TeamMember, demo_members};
use crate::task::{Priority, Task, TaskId, TaskStatus};
use crate::view::{ViewOptions, ViewType};

/// Key the board snapshot is stored under by default.
pub const DEFAULT_SNAPSHOT_KEY: &str = "task-store";

/// Envelope version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Default list-view page size.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Error type for snapshot encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The snapshot could not be serialized.
    #[error("snapshot encode error: {0}")]
    Encode(String),
    /// The stored text is not a valid snapshot.
    #[error("snapshot decode error: {0}")]
    Decode(String),
}

/// Full store state as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Canonical task list, in creation order.
    pub tasks: Vec<Task>,
    /// Team members.
    pub members: Vec<TeamMember>,
    /// Active view.
    pub view_type: ViewType,
    /// Card display options.
    pub view_options: ViewOptions,
    /// Filter and sort criteria.
    pub filter: TaskFilter,
    /// Member picked through the assignee shortcut, if any.
    pub selected_member: Option<TeamMember>,
    /// List-view page size.
    pub items_per_page: usize,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            members: Vec::new(),
            view_type: ViewType::default(),
            view_options: ViewOptions::default(),
            filter: TaskFilter::default(),
            selected_member: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl BoardSnapshot {
    /// The demo board: five members and six tasks relative to `now`.
    #[must_use]
    pub fn demo(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let seed = [
            (
                "task-1",
                "Update user dashboard",
                "Implement new analytics widgets on the main dashboard",
                TaskStatus::Todo,
                &["feature", "frontend"][..],
                3,
                "1",
                Priority::Medium,
                0,
            ),
            (
                "task-2",
                "Fix login page bug",
                "Users are experiencing intermittent login failures",
                TaskStatus::InProgress,
                &["bug", "urgent"][..],
                1,
                "3",
                Priority::High,
                2,
            ),
            (
                "task-3",
                "Implement dark mode",
                "Add dark mode support to all pages",
                TaskStatus::Done,
                &["feature", "ui"][..],
                -1,
                "2",
                Priority::Low,
                5,
            ),
            (
                "task-4",
                "Optimize API endpoints",
                "Improve performance of key API endpoints",
                TaskStatus::InProgress,
                &["backend", "performance"][..],
                5,
                "4",
                Priority::Medium,
                1,
            ),
            (
                "task-5",
                "Write documentation",
                "Create user documentation for new features",
                TaskStatus::Todo,
                &["docs"][..],
                7,
                "5",
                Priority::Low,
                3,
            ),
            (
                "task-6",
                "Implement authentication",
                "Add OAuth support for social login",
                TaskStatus::Done,
                &["feature", "security"][..],
                -2,
                "1",
                Priority::High,
                10,
            ),
        ];

        let tasks = seed
            .into_iter()
            .map(
                |(id, title, description, status, tags, due_in, member, priority, age)| Task {
                    id: TaskId::from(id),
                    title: title.to_string(),
                    description: description.to_string(),
                    status,
                    tags: tags.iter().map(|t| (*t).to_string()).collect(),
                    due_date: Some(today + Duration::days(due_in)),
                    assigned_to: Some(MemberId::from(member)),
                    priority,
                    created_at: now - Duration::days(age),
                },
            )
            .collect();

        Self {
            tasks,
            members: demo_members(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a BoardSnapshot,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: BoardSnapshot,
    #[serde(default)]
    #[allow(dead_code)]
    version: u32,
}

/// Encodes a snapshot into its persisted JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode(snapshot: &BoardSnapshot) -> Result<String, CodecError> {
    serde_json::to_string(&EnvelopeRef {
        state: snapshot,
        version: SNAPSHOT_VERSION,
    })
    .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes persisted JSON text back into a snapshot.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the text is not a snapshot envelope.
pub fn decode(text: &str) -> Result<BoardSnapshot, CodecError> {
    serde_json::from_str::<Envelope>(text)
        .map(|envelope| envelope.state)
        .map_err(|e| CodecError::Decode(e.to_string()))
}
