//! Column partitioner: per-status local order, reconciled against the
//! visible task sequence.
//!
//! The filter/sort engine knows nothing about manual drag order, so the
//! board keeps its own ordered list per column and only falls back to the
//! engine's order when a column's membership changes in a way that leaves
//! nothing to anchor the manual order to.
//!
//! Per column, a reconciliation pass does one of:
//! 1. same ids, same content: nothing ([`ColumnChange::Unchanged`]);
//! 2. same ids, edited content: refresh entries in place by id, keeping
//!    positions ([`ColumnChange::ContentUpdated`]);
//! 3. exactly one id gone and none new: drop it in place
//!    ([`ColumnChange::Removed`]);
//! 4. anything else: take the engine's order ([`ColumnChange::Reset`]).
//!
//! A change of sort key or direction bypasses this and resets every column
//! ([`ColumnPartitioner::reset`]).

use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// A fixed-size map with exactly one slot per [`TaskStatus`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap<T>([T; 3]);

impl<T> StatusMap<T> {
    /// Builds a map by calling `f` for each status in column order.
    pub fn from_fn(f: impl FnMut(TaskStatus) -> T) -> Self {
        Self(TaskStatus::ALL.map(f))
    }

    /// Iterates `(status, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &T)> {
        TaskStatus::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<TaskStatus> for StatusMap<T> {
    type Output = T;

    fn index(&self, status: TaskStatus) -> &T {
        &self.0[status.index()]
    }
}

impl<T> IndexMut<TaskStatus> for StatusMap<T> {
    fn index_mut(&mut self, status: TaskStatus) -> &mut T {
        &mut self.0[status.index()]
    }
}

/// What a reconciliation pass did to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange {
    /// Nothing changed; the column was not touched.
    Unchanged,
    /// Same members, refreshed field content, same order.
    ContentUpdated,
    /// A single task left the column and was removed in place.
    Removed(TaskId),
    /// Membership changed; the column now follows the engine's order.
    Reset,
}

impl ColumnChange {
    /// Returns `true` unless the column was left untouched.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Owns the board's per-column task order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPartitioner {
    columns: StatusMap<Vec<Task>>,
}

impl ColumnPartitioner {
    /// Creates a partitioner with three empty columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered tasks of one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status]
    }

    /// All columns.
    #[must_use]
    pub const fn columns(&self) -> &StatusMap<Vec<Task>> {
        &self.columns
    }

    /// The ids of one column, in order.
    #[must_use]
    pub fn ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.columns[status].iter().map(|t| t.id.clone()).collect()
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, c)| c.len()).sum()
    }

    /// Returns `true` if every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the column and index currently holding `id`.
    #[must_use]
    pub fn locate(&self, id: &TaskId) -> Option<(TaskStatus, usize)> {
        self.columns.iter().find_map(|(status, column)| {
            column
                .iter()
                .position(|t| &t.id == id)
                .map(|index| (status, index))
        })
    }

    /// Brings the columns in line with `visible`, the filtered and sorted
    /// task sequence, preserving local order where membership allows it.
    ///
    /// Idempotent: a second call with the same input reports
    /// [`ColumnChange::Unchanged`] for every column.
    pub fn reconcile<'a>(
        &mut self,
        visible: impl IntoIterator<Item = &'a Task>,
    ) -> StatusMap<ColumnChange> {
        let mut buckets: StatusMap<Vec<&Task>> = StatusMap::default();
        for task in visible {
            buckets[task.status].push(task);
        }

        let changes = StatusMap::from_fn(|status| {
            reconcile_column(&mut self.columns[status], &buckets[status])
        });
        for (status, change) in changes.iter() {
            if change.is_change() {
                tracing::debug!(%status, ?change, "column reconciled");
            }
        }
        changes
    }

    /// Replaces every column with the engine's order for `visible`,
    /// discarding manual order. Used when the sort itself changes.
    pub fn reset<'a>(
        &mut self,
        visible: impl IntoIterator<Item = &'a Task>,
    ) -> StatusMap<ColumnChange> {
        let mut fresh: StatusMap<Vec<Task>> = StatusMap::default();
        for task in visible {
            fresh[task.status].push(task.clone());
        }
        let changes = StatusMap::from_fn(|status| {
            if self.columns[status] == fresh[status] {
                ColumnChange::Unchanged
            } else {
                ColumnChange::Reset
            }
        });
        self.columns = fresh;
        tracing::debug!(total = self.len(), "columns reset to engine order");
        changes
    }

    /// Removes `id` from whichever column holds it.
    pub(crate) fn take(&mut self, id: &TaskId) -> Option<(TaskStatus, usize, Task)> {
        let (status, index) = self.locate(id)?;
        let task = self.columns[status].remove(index);
        Some((status, index, task))
    }

    /// Inserts `task` into `status` at `index`, clamped to the column end.
    pub(crate) fn insert(&mut self, status: TaskStatus, index: usize, task: Task) {
        let column = &mut self.columns[status];
        let index = index.min(column.len());
        column.insert(index, task);
    }

    /// Moves the entry at `from` to `to` within one column.
    ///
    /// Only the moved entry and the ones it shifts over change position.
    /// Returns `false` if either index is out of range or they are equal.
    pub(crate) fn move_within(&mut self, status: TaskStatus, from: usize, to: usize) -> bool {
        let column = &mut self.columns[status];
        if from == to || from >= column.len() || to >= column.len() {
            return false;
        }
        let task = column.remove(from);
        column.insert(to, task);
        true
    }
}

fn reconcile_column(local: &mut Vec<Task>, fresh: &[&Task]) -> ColumnChange {
    let by_id: HashMap<&TaskId, &Task> = fresh.iter().map(|t| (&t.id, *t)).collect();
    let local_ids: HashSet<&TaskId> = local.iter().map(|t| &t.id).collect();

    let added = by_id.keys().any(|id| !local_ids.contains(id));
    let removed: Vec<TaskId> = local_ids
        .iter()
        .filter(|id| !by_id.contains_key(*id))
        .map(|id| (*id).clone())
        .collect();

    if added || removed.len() > 1 {
        *local = fresh.iter().map(|t| (*t).clone()).collect();
        return ColumnChange::Reset;
    }

    if let [gone] = removed.as_slice() {
        local.retain(|t| &t.id != gone);
        refresh_content(local, &by_id);
        return ColumnChange::Removed(gone.clone());
    }

    if refresh_content(local, &by_id) {
        ColumnChange::ContentUpdated
    } else {
        ColumnChange::Unchanged
    }
}

/// Overwrites entries whose content differs from the fresh copy.
fn refresh_content(local: &mut [Task], fresh: &HashMap<&TaskId, &Task>) -> bool {
    let mut updated = false;
    for entry in local.iter_mut() {
        if let Some(current) = fresh.get(&entry.id)
            && *current != entry
        {
            entry.clone_from(current);
            updated = true;
        }
    }
    updated
}
