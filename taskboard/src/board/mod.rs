//! The board: task store, column order, and drag session wired together.
//!
//! [`Board`] is the one place that owns all three sources of truth. Every
//! store mutation it forwards is followed by a column reconciliation before
//! the call returns, so the columns never lag behind the canonical list.
//! Drag events go to the [`DragController`]; the status changes and
//! deletions it asks for are committed to the store immediately.

pub mod collision;
pub mod columns;
pub mod drag;

pub use collision::{CollisionResolver, Droppable, Point, Rect};
pub use columns::{ColumnChange, ColumnPartitioner, StatusMap};
pub use drag::{CancelPolicy, DragCommit, DragController, DragPhase, DropTarget, TRASH_ID};

use chrono::{DateTime, Utc};
use taskboard_proto::filter::{FilterPatch, SortBy, SortDirection};
use taskboard_proto::member::MemberId;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use taskboard_proto::view::{ViewOptionsPatch, ViewType};

use crate::tasks::{StoreChange, SubscriptionId, TaskStore};

/// A task store plus the kanban view state derived from it.
#[derive(Debug)]
pub struct Board {
    store: TaskStore,
    columns: ColumnPartitioner,
    drag: DragController,
    collisions: CollisionResolver,
    synced_revision: u64,
}

impl Board {
    /// Wraps `store` with the default cancel policy.
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        Self::with_cancel_policy(store, CancelPolicy::default())
    }

    /// Wraps `store`, cancelling drags according to `policy`.
    #[must_use]
    pub fn with_cancel_policy(store: TaskStore, policy: CancelPolicy) -> Self {
        let mut board = Self {
            synced_revision: store.revision(),
            store,
            columns: ColumnPartitioner::new(),
            drag: DragController::new(policy),
            collisions: CollisionResolver::new(),
        };
        board.reconcile();
        board
    }

    // --- reads ---

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Releases the store, e.g. for persisting.
    #[must_use]
    pub fn into_store(self) -> TaskStore {
        self.store
    }

    /// All columns in board order.
    #[must_use]
    pub const fn columns(&self) -> &ColumnPartitioner {
        &self.columns
    }

    /// One column's tasks in local order.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns.column(status)
    }

    /// The drag session.
    #[must_use]
    pub const fn drag(&self) -> &DragController {
        &self.drag
    }

    /// The filtered, sorted task sequence.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.store.visible_tasks()
    }

    /// Registers a store listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Removes a store listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- store mutations ---

    /// See [`TaskStore::create_task`].
    pub fn create_task(&mut self, input: NewTask) -> TaskId {
        self.mutate(|store| store.create_task(input))
    }

    /// See [`TaskStore::create_task_at`].
    pub fn create_task_at(&mut self, input: NewTask, created_at: DateTime<Utc>) -> TaskId {
        self.mutate(|store| store.create_task_at(input, created_at))
    }

    /// See [`TaskStore::update_task`].
    pub fn update_task(&mut self, id: &TaskId, patch: &TaskPatch) -> bool {
        self.mutate(|store| store.update_task(id, patch))
    }

    /// See [`TaskStore::delete_task`].
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        self.mutate(|store| store.delete_task(id))
    }

    /// See [`TaskStore::change_status`].
    pub fn change_status(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        self.mutate(|store| store.change_status(id, status))
    }

    /// Selects a team member by id. Returns `false` for unknown ids.
    pub fn select_member(&mut self, id: &MemberId) -> bool {
        let Some(member) = self.store.member(id).cloned() else {
            tracing::debug!(member_id = %id, "select ignored, unknown member");
            return false;
        };
        self.mutate(|store| store.select_member(&member));
        true
    }

    /// See [`TaskStore::clear_selected_member`].
    pub fn clear_selected_member(&mut self) {
        self.mutate(TaskStore::clear_selected_member);
    }

    /// See [`TaskStore::update_filter`].
    pub fn update_filter(&mut self, patch: &FilterPatch) {
        self.mutate(|store| store.update_filter(patch));
    }

    /// See [`TaskStore::set_view_type`].
    pub fn set_view_type(&mut self, view_type: ViewType) {
        self.mutate(|store| store.set_view_type(view_type));
    }

    /// See [`TaskStore::update_view_options`].
    pub fn update_view_options(&mut self, patch: &ViewOptionsPatch) {
        self.mutate(|store| store.update_view_options(patch));
    }

    /// See [`TaskStore::set_items_per_page`].
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.mutate(|store| store.set_items_per_page(items_per_page));
    }

    fn mutate<R>(&mut self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        let sort = sort_key(&self.store);
        let result = f(&mut self.store);
        if self.store.revision() != self.synced_revision {
            if sort_key(&self.store) == sort {
                self.reconcile();
            } else {
                self.resort();
            }
        }
        result
    }

    /// Brings the columns in line with the store.
    ///
    /// A task staged over the trash stays out of the columns until the drag
    /// resolves.
    pub fn reconcile(&mut self) -> StatusMap<ColumnChange> {
        self.synced_revision = self.store.revision();
        let staged = self.drag.staged_id();
        let visible = self
            .store
            .visible_tasks()
            .into_iter()
            .filter(|task| Some(&task.id) != staged);
        self.columns.reconcile(visible)
    }

    /// Rebuilds every column in the engine's order, dropping manual order.
    fn resort(&mut self) -> StatusMap<ColumnChange> {
        self.synced_revision = self.store.revision();
        let staged = self.drag.staged_id();
        let visible = self
            .store
            .visible_tasks()
            .into_iter()
            .filter(|task| Some(&task.id) != staged);
        self.columns.reset(visible)
    }

    // --- drag session ---

    /// Starts dragging `id`. Returns `false` if the start was ignored.
    pub fn drag_start(&mut self, id: &TaskId) -> bool {
        self.collisions.reset();
        self.drag.start(id, &self.columns)
    }

    /// The pointer moved over `target`.
    pub fn drag_over(&mut self, target: &DropTarget) {
        let commit = self.drag.over(target, &mut self.columns);
        self.apply_commit(commit);
    }

    /// Resolves the hovered droppable from geometry and forwards it to
    /// [`Board::drag_over`] when it changed.
    pub fn drag_pointer_move(
        &mut self,
        pointer: Option<Point>,
        dragged: Rect,
        droppables: &[Droppable],
    ) -> Option<DropTarget> {
        let target = self.collisions.resolve(pointer, dragged, droppables)?;
        if self.drag.hovered() != Some(&target) {
            self.drag_over(&target);
        }
        Some(target)
    }

    /// The card was released over `target`, or outside any target.
    pub fn drag_end(&mut self, target: Option<&DropTarget>) {
        let commit = self.drag.end(target, &mut self.columns);
        if self.drag.phase() == DragPhase::Idle {
            self.collisions.reset();
        }
        self.apply_commit(commit);
    }

    /// The drag was aborted.
    pub fn drag_cancel(&mut self) {
        let commit = self.drag.cancel(&mut self.columns);
        self.collisions.reset();
        self.apply_commit(commit);
    }

    fn apply_commit(&mut self, commit: Option<DragCommit>) {
        match commit {
            Some(DragCommit::ChangeStatus { id, status }) => {
                self.change_status(&id, status);
            }
            Some(DragCommit::Delete(id)) => {
                self.delete_task(&id);
            }
            None => {}
        }
    }
}

fn sort_key(store: &TaskStore) -> (SortBy, SortDirection) {
    let filter = store.filter();
    (filter.sort_by, filter.sort_direction)
}
