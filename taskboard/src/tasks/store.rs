//! Task store: the single owner of canonical board state.
//!
//! `TaskStore` is an explicitly constructed value rather than a global, so
//! every test and every host builds its own. All mutations are synchronous
//! and total; operations on unknown task ids are silent no-ops. After each
//! effective mutation the revision counter is bumped and every subscriber
//! is called with a [`StoreChange`] before the method returns.

use chrono::{DateTime, Utc};
use taskboard_proto::filter::{FilterPatch, TaskFilter};
use taskboard_proto::member::{MemberId, TeamMember};
use taskboard_proto::snapshot::BoardSnapshot;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use taskboard_proto::view::{ViewOptions, ViewOptionsPatch, ViewType};

use super::filter::derive_visible_tasks;

/// Describes a mutation that just happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// A task was appended.
    TaskCreated(TaskId),
    /// Fields of a task changed (other than through `change_status`).
    TaskUpdated(TaskId),
    /// A task moved to another column.
    StatusChanged {
        /// The task that moved.
        id: TaskId,
        /// Previous status.
        from: TaskStatus,
        /// New status.
        to: TaskStatus,
    },
    /// A task was removed.
    TaskDeleted(TaskId),
    /// Filter or sort criteria changed (including member selection).
    FilterChanged,
    /// View type, view options, or page size changed.
    ViewChanged,
}

impl StoreChange {
    /// Returns `true` if the change can alter the visible task sequence.
    #[must_use]
    pub const fn affects_visible_tasks(&self) -> bool {
        !matches!(self, Self::ViewChanged)
    }
}

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Owns the canonical task list and the settings that shape its display.
pub struct TaskStore {
    tasks: Vec<Task>,
    members: Vec<TeamMember>,
    view_type: ViewType,
    view_options: ViewOptions,
    filter: TaskFilter,
    selected_member: Option<TeamMember>,
    items_per_page: usize,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks.len())
            .field("members", &self.members.len())
            .field("filter", &self.filter)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::from_snapshot(BoardSnapshot::default())
    }
}

impl TaskStore {
    /// Creates an empty store with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from an injected initial state.
    ///
    /// If the snapshot contains repeated task ids only the first is kept.
    #[must_use]
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut tasks: Vec<Task> = Vec::with_capacity(snapshot.tasks.len());
        for task in snapshot.tasks {
            if tasks.iter().any(|t| t.id == task.id) {
                tracing::warn!(task_id = %task.id, "dropping duplicate task id from snapshot");
                continue;
            }
            tasks.push(task);
        }

        Self {
            tasks,
            members: snapshot.members,
            view_type: snapshot.view_type,
            view_options: snapshot.view_options,
            filter: snapshot.filter,
            selected_member: snapshot.selected_member,
            items_per_page: snapshot.items_per_page.max(1),
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Captures the full state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tasks: self.tasks.clone(),
            members: self.members.clone(),
            view_type: self.view_type,
            view_options: self.view_options,
            filter: self.filter.clone(),
            selected_member: self.selected_member.clone(),
            items_per_page: self.items_per_page,
        }
    }

    // --- subscriptions ---

    /// Registers a listener called synchronously after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Monotonic counter bumped on every effective mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self, change: &StoreChange) {
        self.revision += 1;
        tracing::debug!(revision = self.revision, ?change, "store changed");
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    // --- task mutations ---

    /// Appends a new task with a fresh id and `created_at = now`.
    ///
    /// The input is stored as given; validation belongs to the caller.
    pub fn create_task(&mut self, input: NewTask) -> TaskId {
        self.create_task_at(input, Utc::now())
    }

    /// Appends a new task with an explicit creation time.
    pub fn create_task_at(&mut self, input: NewTask, created_at: DateTime<Utc>) -> TaskId {
        let mut id = TaskId::new();
        while self.task(&id).is_some() {
            id = TaskId::new();
        }
        self.tasks.push(input.into_task(id.clone(), created_at));
        tracing::debug!(task_id = %id, "task created");
        self.notify(&StoreChange::TaskCreated(id.clone()));
        id
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `false` (and notifies nobody) if the task does not exist or
    /// the patch changes nothing.
    pub fn update_task(&mut self, id: &TaskId, patch: &TaskPatch) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "update ignored, task not found");
            return false;
        };
        if !task.apply(patch) {
            return false;
        }
        self.notify(&StoreChange::TaskUpdated(id.clone()));
        true
    }

    /// Removes the task with `id`. Returns `false` if it did not exist.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "delete ignored, task not found");
            return false;
        };
        self.tasks.remove(pos);
        self.notify(&StoreChange::TaskDeleted(id.clone()));
        true
    }

    /// Moves a task to another column. This is what drag-and-drop commits.
    ///
    /// Returns `false` if the task does not exist or already has `status`.
    pub fn change_status(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "status change ignored, task not found");
            return false;
        };
        let from = task.status;
        if !task.apply(&TaskPatch::status(status)) {
            return false;
        }
        self.notify(&StoreChange::StatusChanged {
            id: id.clone(),
            from,
            to: status,
        });
        true
    }

    // --- filter / view mutations ---

    /// Restricts the board to one member's tasks, resetting other criteria.
    pub fn select_member(&mut self, member: &TeamMember) {
        self.selected_member = Some(member.clone());
        self.filter = TaskFilter::for_member(member.id.clone());
        self.notify(&StoreChange::FilterChanged);
    }

    /// Clears member selection and resets all criteria to defaults.
    pub fn clear_selected_member(&mut self) {
        self.selected_member = None;
        self.filter = TaskFilter::default();
        self.notify(&StoreChange::FilterChanged);
    }

    /// Merges `patch` into the filter criteria.
    pub fn update_filter(&mut self, patch: &FilterPatch) {
        let before = self.filter.clone();
        self.filter.apply(patch);
        if self.filter != before {
            self.notify(&StoreChange::FilterChanged);
        }
    }

    /// Switches the active view.
    pub fn set_view_type(&mut self, view_type: ViewType) {
        if self.view_type != view_type {
            self.view_type = view_type;
            self.notify(&StoreChange::ViewChanged);
        }
    }

    /// Merges `patch` into the card display options.
    pub fn update_view_options(&mut self, patch: &ViewOptionsPatch) {
        let before = self.view_options;
        self.view_options.apply(patch);
        if self.view_options != before {
            self.notify(&StoreChange::ViewChanged);
        }
    }

    /// Sets the list-view page size; zero is clamped to one.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        let items_per_page = items_per_page.max(1);
        if self.items_per_page != items_per_page {
            self.items_per_page = items_per_page;
            self.notify(&StoreChange::ViewChanged);
        }
    }

    // --- reads ---

    /// The canonical task list in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// The team.
    #[must_use]
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Looks up a member by id.
    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&TeamMember> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// The member a task is assigned to. Dangling references yield `None`.
    #[must_use]
    pub fn assignee_of(&self, task: &Task) -> Option<&TeamMember> {
        task.assigned_to.as_ref().and_then(|id| self.member(id))
    }

    /// Active view.
    #[must_use]
    pub const fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Card display options.
    #[must_use]
    pub const fn view_options(&self) -> ViewOptions {
        self.view_options
    }

    /// Current filter and sort criteria.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Member chosen through the assignee shortcut.
    #[must_use]
    pub const fn selected_member(&self) -> Option<&TeamMember> {
        self.selected_member.as_ref()
    }

    /// List-view page size.
    #[must_use]
    pub const fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// The filtered, sorted task sequence.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        derive_visible_tasks(&self.tasks, &self.filter)
    }
}
