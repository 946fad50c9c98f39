//! Property-based board invariants.
//!
//! Uses proptest to verify, over random sequences of store mutations,
//! filter changes, and drag sessions:
//! 1. Task ids stay unique.
//! 2. The visible sequence is a pure function of tasks and filter.
//! 3. Reconciling twice in a row changes nothing the second time.
//! 4. Every visible task sits in exactly one column, the one matching its status.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use taskboard::board::{Board, CancelPolicy, DropTarget};
use taskboard::tasks::{TaskStore, derive_visible_tasks};
use taskboard_proto::filter::{FilterPatch, SortBy, SortDirection, TaskFilter};
use taskboard_proto::task::{NewTask, TaskId, TaskPatch, TaskStatus};

const TAGS: [&str; 3] = ["bug", "ui", "api"];

#[derive(Debug, Clone)]
enum Target {
    Column(TaskStatus),
    Card(usize),
    Trash,
}

#[derive(Debug, Clone)]
enum Release {
    Drop,
    Outside,
    Cancel,
}

#[derive(Debug, Clone)]
enum Op {
    Create {
        title: String,
        status: TaskStatus,
        tag: Option<usize>,
    },
    Rename(usize, String),
    Delete(usize),
    ChangeStatus(usize, TaskStatus),
    Search(String),
    FilterTag(Option<usize>),
    Sort(SortBy, SortDirection),
    Drag {
        task: usize,
        hops: Vec<Target>,
        release: Release,
    },
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

fn arb_sort() -> impl Strategy<Value = (SortBy, SortDirection)> {
    (
        prop_oneof![
            Just(SortBy::CreatedAt),
            Just(SortBy::Priority),
            Just(SortBy::DueDate),
        ],
        prop_oneof![Just(SortDirection::Ascending), Just(SortDirection::Descending)],
    )
}

fn arb_target() -> impl Strategy<Value = Target> {
    prop_oneof![
        arb_status().prop_map(Target::Column),
        (0usize..16).prop_map(Target::Card),
        Just(Target::Trash),
    ]
}

fn arb_release() -> impl Strategy<Value = Release> {
    prop_oneof![Just(Release::Drop), Just(Release::Outside), Just(Release::Cancel)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => ("[a-z]{1,8}", arb_status(), prop::option::of(0usize..TAGS.len()))
            .prop_map(|(title, status, tag)| Op::Create { title, status, tag }),
        1 => (0usize..16, "[a-z]{1,8}").prop_map(|(i, title)| Op::Rename(i, title)),
        1 => (0usize..16).prop_map(Op::Delete),
        2 => (0usize..16, arb_status()).prop_map(|(i, s)| Op::ChangeStatus(i, s)),
        1 => "[a-z]{0,2}".prop_map(Op::Search),
        1 => prop::option::of(0usize..TAGS.len()).prop_map(Op::FilterTag),
        1 => arb_sort().prop_map(|(by, dir)| Op::Sort(by, dir)),
        3 => (0usize..16, prop::collection::vec(arb_target(), 0..4), arb_release())
            .prop_map(|(task, hops, release)| Op::Drag { task, hops, release }),
    ]
}

fn arb_policy() -> impl Strategy<Value = CancelPolicy> {
    prop_oneof![Just(CancelPolicy::KeepLiveMoves), Just(CancelPolicy::Revert)]
}

/// Id of the `index`-th task in the store, wrapping around.
fn nth_id(board: &Board, index: usize) -> Option<TaskId> {
    let tasks = board.store().tasks();
    if tasks.is_empty() {
        return None;
    }
    Some(tasks[index % tasks.len()].id.clone())
}

fn drop_target(board: &Board, target: &Target) -> DropTarget {
    match target {
        Target::Column(status) => DropTarget::Column(*status),
        Target::Card(i) => {
            nth_id(board, *i).map_or(DropTarget::Column(TaskStatus::Todo), DropTarget::Task)
        }
        Target::Trash => DropTarget::Trash,
    }
}

fn apply(board: &mut Board, op: &Op, clock: &mut i64) {
    match op {
        Op::Create { title, status, tag } => {
            *clock += 1;
            let mut input = NewTask::titled(title.clone()).with_status(*status);
            if let Some(tag) = tag {
                input = input.with_tag(TAGS[*tag]);
            }
            board.create_task_at(input, DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(*clock));
        }
        Op::Rename(i, title) => {
            if let Some(id) = nth_id(board, *i) {
                board.update_task(&id, &TaskPatch::title(title.clone()));
            }
        }
        Op::Delete(i) => {
            if let Some(id) = nth_id(board, *i) {
                board.delete_task(&id);
            }
        }
        Op::ChangeStatus(i, status) => {
            if let Some(id) = nth_id(board, *i) {
                board.change_status(&id, *status);
            }
        }
        Op::Search(search) => board.update_filter(&FilterPatch {
            search: Some(search.clone()),
            ..FilterPatch::default()
        }),
        Op::FilterTag(tag) => board.update_filter(&FilterPatch {
            tags: Some(tag.map(|t| vec![TAGS[t].to_string()]).unwrap_or_default()),
            ..FilterPatch::default()
        }),
        Op::Sort(by, dir) => board.update_filter(&FilterPatch {
            sort_by: Some(*by),
            sort_direction: Some(*dir),
            ..FilterPatch::default()
        }),
        Op::Drag {
            task,
            hops,
            release,
        } => {
            let Some(id) = nth_id(board, *task) else {
                return;
            };
            board.drag_start(&id);
            let mut last = None;
            for hop in hops {
                let target = drop_target(board, hop);
                board.drag_over(&target);
                last = Some(target);
            }
            match release {
                Release::Drop => {
                    let target = last.unwrap_or(DropTarget::Column(TaskStatus::Todo));
                    board.drag_end(Some(&target));
                    // A stale card target leaves the session open.
                    board.drag_cancel();
                }
                Release::Outside => board.drag_end(None),
                Release::Cancel => board.drag_cancel(),
            }
        }
    }
}

fn run(ops: &[Op], policy: CancelPolicy) -> Board {
    let mut board = Board::with_cancel_policy(TaskStore::new(), policy);
    let mut clock = 0;
    for op in ops {
        apply(&mut board, op, &mut clock);
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ids_stay_unique(ops in prop::collection::vec(arb_op(), 0..40), policy in arb_policy()) {
        let board = run(&ops, policy);
        let ids: HashSet<&TaskId> = board.store().tasks().iter().map(|t| &t.id).collect();
        prop_assert_eq!(ids.len(), board.store().tasks().len());
    }

    #[test]
    fn derivation_is_pure(ops in prop::collection::vec(arb_op(), 0..30)) {
        let board = run(&ops, CancelPolicy::default());
        let tasks = board.store().tasks();
        let filter = board.store().filter();

        let first: Vec<&TaskId> = derive_visible_tasks(tasks, filter).into_iter().map(|t| &t.id).collect();
        let second: Vec<&TaskId> = derive_visible_tasks(tasks, filter).into_iter().map(|t| &t.id).collect();
        prop_assert_eq!(first, second);

        let unfiltered = TaskFilter {
            sort_by: filter.sort_by,
            sort_direction: filter.sort_direction,
            ..TaskFilter::default()
        };
        prop_assert_eq!(derive_visible_tasks(tasks, &unfiltered).len(), tasks.len());
    }

    #[test]
    fn reconcile_is_idempotent(ops in prop::collection::vec(arb_op(), 0..40), policy in arb_policy()) {
        let mut board = run(&ops, policy);
        board.reconcile();
        let before = board.columns().clone();
        let changes = board.reconcile();
        prop_assert!(changes.iter().all(|(_, c)| !c.is_change()));
        prop_assert_eq!(board.columns(), &before);
    }

    #[test]
    fn visible_tasks_sit_in_exactly_one_column(
        ops in prop::collection::vec(arb_op(), 0..40),
        policy in arb_policy(),
    ) {
        let board = run(&ops, policy);
        prop_assert!(board.drag().active().is_none());

        let mut seen = HashSet::new();
        for (status, column) in board.columns().columns().iter() {
            for task in column {
                prop_assert!(seen.insert(task.id.clone()), "duplicate {}", task.id);
                prop_assert_eq!(task.status, status);
                let canonical = board.store().task(&task.id);
                prop_assert_eq!(canonical.map(|t| t.status), Some(status));
            }
        }
        let visible: HashSet<TaskId> = board.visible_tasks().iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(seen, visible);
    }
}
