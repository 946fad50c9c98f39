//! Drag session controller.
//!
//! Tracks one pointer-driven drag from start to drop or cancel and applies
//! its effects to the [`ColumnPartitioner`] as the pointer moves. Status
//! changes are committed optimistically on every cross-column hover; the
//! controller returns them as [`DragCommit`]s and the board forwards them
//! to the task store before the handler returns.
//!
//! ```text
//! Idle --start--> Dragging --over(trash)--> DraggingOverTrash
//!                    ^                            |
//!                    +------over(column/task)-----+
//! Dragging | DraggingOverTrash --end/cancel--> Idle
//! ```

use taskboard_proto::task::{Task, TaskId, TaskStatus};

use super::columns::ColumnPartitioner;

/// Host id of the trash drop target.
pub const TRASH_ID: &str = "trash";

/// Something a dragged card can be dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A column, or its empty space below the last card.
    Column(TaskStatus),
    /// Another card; its column is inferred from the local columns.
    Task(TaskId),
    /// The delete zone.
    Trash,
}

impl DropTarget {
    /// Parses a host droppable id.
    ///
    /// `"trash"` and the three status ids are reserved; anything else is
    /// taken to be a task id.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        if id == TRASH_ID {
            return Self::Trash;
        }
        id.parse::<TaskStatus>()
            .map_or_else(|_| Self::Task(TaskId::from(id)), Self::Column)
    }

    /// Returns `true` for the delete zone.
    #[must_use]
    pub const fn is_trash(&self) -> bool {
        matches!(self, Self::Trash)
    }
}

impl From<&str> for DropTarget {
    fn from(id: &str) -> Self {
        Self::parse(id)
    }
}

impl std::fmt::Display for DropTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Column(status) => write!(f, "{}", status.as_str()),
            Self::Task(id) => write!(f, "{id}"),
            Self::Trash => write!(f, "{TRASH_ID}"),
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A card is being dragged over columns or cards.
    Dragging,
    /// The card is hovering the trash and is staged for deletion.
    DraggingOverTrash,
}

/// A store mutation a drag event requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragCommit {
    /// Move the task to another column.
    ChangeStatus {
        /// The dragged task.
        id: TaskId,
        /// Its new column.
        status: TaskStatus,
    },
    /// Delete the task.
    Delete(TaskId),
}

/// What `cancel` does with moves already committed during the drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Leave live status commits in place; only the session is cleared.
    #[default]
    KeepLiveMoves,
    /// Put the task back where the drag started.
    Revert,
}

/// The drag session state machine.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    phase: DragPhase,
    active: Option<TaskId>,
    hovered: Option<DropTarget>,
    origin: Option<(TaskStatus, usize)>,
    staged: Option<Task>,
    policy: CancelPolicy,
}

impl DragController {
    /// Creates an idle controller with the given cancel policy.
    #[must_use]
    pub fn new(policy: CancelPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The dragged task, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&TaskId> {
        self.active.as_ref()
    }

    /// The last resolved hover target.
    #[must_use]
    pub const fn hovered(&self) -> Option<&DropTarget> {
        self.hovered.as_ref()
    }

    /// Returns `true` while the pointer is over the trash.
    #[must_use]
    pub const fn is_over_trash(&self) -> bool {
        matches!(self.hovered, Some(DropTarget::Trash))
    }

    /// Id of the task held out of the columns while over the trash.
    #[must_use]
    pub fn staged_id(&self) -> Option<&TaskId> {
        self.staged.as_ref().map(|t| &t.id)
    }

    /// Configured cancel policy.
    #[must_use]
    pub const fn policy(&self) -> CancelPolicy {
        self.policy
    }

    /// Begins dragging `id`.
    ///
    /// Ignored (returns `false`) if a drag is already running or the task is
    /// not on the board.
    pub fn start(&mut self, id: &TaskId, columns: &ColumnPartitioner) -> bool {
        if self.phase != DragPhase::Idle {
            tracing::debug!(task_id = %id, "drag start ignored, session already active");
            return false;
        }
        let Some(origin) = columns.locate(id) else {
            tracing::debug!(task_id = %id, "drag start ignored, task not on board");
            return false;
        };
        self.phase = DragPhase::Dragging;
        self.active = Some(id.clone());
        self.origin = Some(origin);
        tracing::debug!(task_id = %id, status = %origin.0, index = origin.1, "drag started");
        true
    }

    /// Handles the pointer moving over `target`.
    ///
    /// Returns the status change to commit when the card crossed into
    /// another column.
    pub fn over(
        &mut self,
        target: &DropTarget,
        columns: &mut ColumnPartitioner,
    ) -> Option<DragCommit> {
        let active = self.active.clone()?;

        if target.is_trash() {
            self.stage(&active, columns);
            self.hovered = Some(DropTarget::Trash);
            return None;
        }

        let Some((status, index)) = resolve(target, columns) else {
            tracing::warn!(drop_target = %target, "drag over unresolvable target");
            return None;
        };
        self.hovered = Some(target.clone());

        let task = if let Some(task) = self.staged.take() {
            self.phase = DragPhase::Dragging;
            task
        } else {
            let (current, _) = columns.locate(&active)?;
            if current == status {
                return None;
            }
            let (_, _, task) = columns.take(&active)?;
            task
        };

        let moved = task.status != status;
        place(columns, task, status, index);
        moved.then(|| DragCommit::ChangeStatus { id: active, status })
    }

    /// Handles the drop.
    ///
    /// `None` means the card was released outside every target, which is
    /// treated as a cancel. An unresolvable target leaves the session as it
    /// was.
    pub fn end(
        &mut self,
        target: Option<&DropTarget>,
        columns: &mut ColumnPartitioner,
    ) -> Option<DragCommit> {
        let active = self.active.clone()?;
        let Some(target) = target else {
            return self.cancel(columns);
        };

        if target.is_trash() {
            self.stage(&active, columns);
            let commit = self.staged.take().map(|task| DragCommit::Delete(task.id));
            tracing::debug!(task_id = %active, "dropped on trash");
            self.reset();
            return commit;
        }

        let Some((status, _)) = resolve(target, columns) else {
            tracing::warn!(drop_target = %target, "drop on unresolvable target ignored");
            return None;
        };

        // A staged card, or one sitting in another column, is inserted at the
        // hovered index by `over` and needs no further move.
        let reinserted = self.staged.is_some()
            || columns.locate(&active).is_none_or(|(current, _)| current != status);
        let commit = self.over(target, columns);

        let started_here = self.origin.is_some_and(|(origin, _)| origin == status);
        if started_here
            && !reinserted
            && let DropTarget::Task(over_id) = target
            && let Some((_, from)) = columns.locate(&active)
            && let Some((over_status, to)) = columns.locate(over_id)
            && over_status == status
        {
            columns.move_within(status, from, to);
        }

        tracing::debug!(task_id = %active, drop_target = %target, "drag ended");
        self.reset();
        commit
    }

    /// Aborts the drag according to the cancel policy.
    pub fn cancel(&mut self, columns: &mut ColumnPartitioner) -> Option<DragCommit> {
        let active = self.active.clone()?;
        let commit = match (self.policy, self.origin) {
            (CancelPolicy::Revert, Some((status, index))) => {
                let task = self
                    .staged
                    .take()
                    .or_else(|| columns.take(&active).map(|(_, _, task)| task));
                task.and_then(|task| {
                    let moved = task.status != status;
                    place(columns, task, status, Some(index));
                    moved.then(|| DragCommit::ChangeStatus {
                        id: active.clone(),
                        status,
                    })
                })
            }
            _ => {
                if let Some(task) = self.staged.take() {
                    let status = task.status;
                    place(columns, task, status, None);
                }
                None
            }
        };
        tracing::debug!(task_id = %active, policy = ?self.policy, "drag cancelled");
        self.reset();
        commit
    }

    /// Pulls the active card out of the columns while it hovers the trash.
    fn stage(&mut self, active: &TaskId, columns: &mut ColumnPartitioner) {
        if self.staged.is_some() {
            return;
        }
        match columns.take(active) {
            Some((_, _, task)) => {
                self.staged = Some(task);
                self.phase = DragPhase::DraggingOverTrash;
            }
            None => tracing::warn!(task_id = %active, "cannot stage task missing from board"),
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.policy);
    }
}

/// Maps a non-trash target to a column and, for card targets, an index.
fn resolve(target: &DropTarget, columns: &ColumnPartitioner) -> Option<(TaskStatus, Option<usize>)> {
    match target {
        DropTarget::Column(status) => Some((*status, None)),
        DropTarget::Task(id) => columns
            .locate(id)
            .map(|(status, index)| (status, Some(index))),
        DropTarget::Trash => None,
    }
}

/// Inserts `task` into `status` at `index`, or at the end.
fn place(columns: &mut ColumnPartitioner, mut task: Task, status: TaskStatus, index: Option<usize>) {
    task.status = status;
    columns.insert(status, index.unwrap_or(usize::MAX), task);
}
