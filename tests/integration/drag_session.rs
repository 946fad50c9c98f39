//! Integration tests for drag sessions driven through the `Board`.
//!
//! Covers live status commits, in-column reordering, the trash target,
//! cancel policies, and geometry-driven hovering.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::redundant_clone)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use taskboard::board::{Board, CancelPolicy, DragPhase, DropTarget, Droppable, Point, Rect};
use taskboard::tasks::{StoreChange, TaskStore};
use taskboard_proto::snapshot::BoardSnapshot;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn make_task(id: &str, status: TaskStatus) -> Task {
    NewTask::titled(id)
        .with_status(status)
        .into_task(TaskId::from(id), DateTime::<Utc>::UNIX_EPOCH)
}

/// Todo: [T1, T2, T3], In Progress: [P1], Done: [D1].
fn make_board(policy: CancelPolicy) -> Board {
    let tasks = vec![
        make_task("T1", TaskStatus::Todo),
        make_task("T2", TaskStatus::Todo),
        make_task("T3", TaskStatus::Todo),
        make_task("P1", TaskStatus::InProgress),
        make_task("D1", TaskStatus::Done),
    ];
    Board::with_cancel_policy(
        TaskStore::from_snapshot(BoardSnapshot {
            tasks,
            ..BoardSnapshot::default()
        }),
        policy,
    )
}

fn record_changes(board: &mut Board) -> Rc<RefCell<Vec<StoreChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    board.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    log
}

fn ids(board: &Board, status: TaskStatus) -> Vec<String> {
    board
        .column(status)
        .iter()
        .map(|t| t.id.to_string())
        .collect()
}

fn id(s: &str) -> TaskId {
    TaskId::from(s)
}

fn status_of(board: &Board, task: &str) -> Option<TaskStatus> {
    board.store().task(&id(task)).map(|t| t.status)
}

fn deletions(log: &Rc<RefCell<Vec<StoreChange>>>) -> usize {
    log.borrow()
        .iter()
        .filter(|c| matches!(c, StoreChange::TaskDeleted(_)))
        .count()
}

/// Asserts every visible task appears exactly once across the columns.
fn assert_membership(board: &Board) {
    let mut on_board: Vec<String> = board
        .columns()
        .columns()
        .iter()
        .flat_map(|(_, col)| col.iter().map(|t| t.id.to_string()))
        .collect();
    let mut visible: Vec<String> = board
        .visible_tasks()
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    on_board.sort();
    visible.sort();
    assert_eq!(on_board, visible);
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

#[test]
fn same_column_reorder_is_array_move() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);

    assert!(board.drag_start(&id("T1")));
    board.drag_over(&DropTarget::Task(id("T3")));
    board.drag_end(Some(&DropTarget::Task(id("T3"))));

    assert_eq!(ids(&board, TaskStatus::Todo), ["T2", "T3", "T1"]);
    assert!(log.borrow().is_empty(), "in-column reorder touches no store state");
    assert_eq!(board.drag().phase(), DragPhase::Idle);
    assert_membership(&board);
}

#[test]
fn reorder_upwards() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T3"));
    board.drag_end(Some(&DropTarget::Task(id("T2"))));
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T3", "T2"]);
}

#[test]
fn detour_through_another_column_matches_direct_drop() {
    let mut direct = make_board(CancelPolicy::default());
    direct.drag_start(&id("T3"));
    direct.drag_end(Some(&DropTarget::Task(id("T1"))));
    assert_eq!(ids(&direct, TaskStatus::Todo), ["T3", "T1", "T2"]);

    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);
    board.drag_start(&id("T3"));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));
    board.drag_end(Some(&DropTarget::Task(id("T1"))));

    assert_eq!(ids(&board, TaskStatus::Todo), ["T3", "T1", "T2"]);
    assert_eq!(ids(&board, TaskStatus::Done), ["D1"]);
    assert_eq!(status_of(&board, "T3"), Some(TaskStatus::Todo));
    assert_eq!(log.borrow().len(), 2);
    assert_membership(&board);
}

#[test]
fn detour_over_trash_matches_direct_drop() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);
    board.drag_start(&id("T3"));
    board.drag_over(&DropTarget::Trash);
    board.drag_end(Some(&DropTarget::Task(id("T1"))));

    assert_eq!(ids(&board, TaskStatus::Todo), ["T3", "T1", "T2"]);
    assert_eq!(deletions(&log), 0);
    assert!(log.borrow().is_empty());
    assert_eq!(board.drag().phase(), DragPhase::Idle);
    assert_membership(&board);
}

#[test]
fn pointer_reorder_through_column_gap() {
    let mut board = make_board(CancelPolicy::default());
    // Cards stacked inside the Todo column with gaps between them.
    let droppables = [
        Droppable::new(
            DropTarget::Column(TaskStatus::Todo),
            Rect::new(0.0, 0.0, 100.0, 400.0),
        ),
        Droppable::new(DropTarget::Task(id("T1")), Rect::new(10.0, 10.0, 80.0, 40.0)),
        Droppable::new(DropTarget::Task(id("T2")), Rect::new(10.0, 70.0, 80.0, 40.0)),
        Droppable::new(DropTarget::Task(id("T3")), Rect::new(10.0, 130.0, 80.0, 40.0)),
    ];
    let card = |y: f64| Rect::new(10.0, y, 80.0, 40.0);

    board.drag_start(&id("T1"));
    let frames = [(20.0, 10.0), (60.0, 50.0), (150.0, 140.0)];
    let mut hit = None;
    let mut seen = Vec::new();
    for (pointer_y, card_y) in frames {
        hit = board.drag_pointer_move(Some(Point::new(50.0, pointer_y)), card(card_y), &droppables);
        seen.push(hit.clone());
    }
    assert_eq!(
        seen,
        [
            Some(DropTarget::Task(id("T1"))),
            Some(DropTarget::Column(TaskStatus::Todo)),
            Some(DropTarget::Task(id("T3"))),
        ]
    );

    board.drag_end(hit.as_ref());
    assert_eq!(ids(&board, TaskStatus::Todo), ["T2", "T3", "T1"]);
    assert_membership(&board);
}

// ---------------------------------------------------------------------------
// Cross-column moves
// ---------------------------------------------------------------------------

#[test]
fn cross_column_commit_happens_on_hover() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);

    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));

    // Committed before the drop.
    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::Done));
    assert_eq!(ids(&board, TaskStatus::Done), ["D1", "T1"]);
    assert_eq!(
        log.borrow().as_slice(),
        [StoreChange::StatusChanged {
            id: id("T1"),
            from: TaskStatus::Todo,
            to: TaskStatus::Done,
        }]
    );
    assert_membership(&board);

    board.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(ids(&board, TaskStatus::Done), ["D1", "T1"]);
}

#[test]
fn hovering_a_card_inserts_at_its_position() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T2"));
    board.drag_over(&DropTarget::Task(id("P1")));
    assert_eq!(ids(&board, TaskStatus::InProgress), ["T2", "P1"]);
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T3"]);
    assert_eq!(status_of(&board, "T2"), Some(TaskStatus::InProgress));
}

#[test]
fn passing_through_columns_commits_each_hop() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Column(TaskStatus::InProgress));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));
    board.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));

    assert_eq!(log.borrow().len(), 2);
    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::Done));
    assert_eq!(ids(&board, TaskStatus::InProgress), ["P1"]);
    assert_membership(&board);
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[test]
fn trash_drop_deletes_exactly_once() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);

    board.drag_start(&id("T2"));
    board.drag_over(&DropTarget::Trash);
    assert!(board.drag().is_over_trash());
    assert_eq!(board.drag().phase(), DragPhase::DraggingOverTrash);
    // Staged, not deleted.
    assert!(board.store().task(&id("T2")).is_some());
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T3"]);
    assert_eq!(deletions(&log), 0);

    board.drag_over(&DropTarget::Trash);
    board.drag_end(Some(&DropTarget::Trash));

    assert_eq!(deletions(&log), 1);
    assert!(board.store().task(&id("T2")).is_none());
    assert_eq!(board.drag().phase(), DragPhase::Idle);
    assert_membership(&board);
}

#[test]
fn leaving_trash_before_release_never_deletes() {
    let mut board = make_board(CancelPolicy::default());
    let log = record_changes(&mut board);

    board.drag_start(&id("T2"));
    board.drag_over(&DropTarget::Trash);
    board.drag_over(&DropTarget::Column(TaskStatus::Todo));
    assert_eq!(board.drag().phase(), DragPhase::Dragging);
    board.drag_end(Some(&DropTarget::Column(TaskStatus::Todo)));

    assert_eq!(deletions(&log), 0);
    assert!(log.borrow().is_empty());
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T3", "T2"]);
    assert_membership(&board);
}

#[test]
fn leaving_trash_into_another_column_restores_there() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Trash);
    board.drag_over(&DropTarget::Task(id("D1")));

    assert_eq!(ids(&board, TaskStatus::Done), ["T1", "D1"]);
    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::Done));
    board.drag_end(Some(&DropTarget::Task(id("D1"))));
    assert_eq!(board.columns().len(), 5);
    assert_membership(&board);
}

#[test]
fn store_changes_while_over_trash_keep_task_staged() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Trash);
    board.update_task(&id("T3"), &TaskPatch::title("Edited"));
    assert!(board.columns().locate(&id("T1")).is_none());

    board.drag_cancel();
    assert_eq!(ids(&board, TaskStatus::Todo), ["T2", "T3", "T1"]);
    assert_membership(&board);
}

// ---------------------------------------------------------------------------
// Cancel policies
// ---------------------------------------------------------------------------

#[test]
fn cancel_keeps_live_moves_by_default() {
    let mut board = make_board(CancelPolicy::KeepLiveMoves);
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));
    board.drag_cancel();

    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::Done));
    assert_eq!(board.drag().phase(), DragPhase::Idle);
    assert!(board.drag().active().is_none());
    assert_membership(&board);
}

#[test]
fn cancel_with_revert_restores_status_and_position() {
    let mut board = make_board(CancelPolicy::Revert);
    let log = record_changes(&mut board);
    board.drag_start(&id("T2"));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));
    board.drag_cancel();

    assert_eq!(status_of(&board, "T2"), Some(TaskStatus::Todo));
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T2", "T3"]);
    assert_eq!(ids(&board, TaskStatus::Done), ["D1"]);
    assert_eq!(log.borrow().len(), 2);
    assert_membership(&board);
}

#[test]
fn release_outside_targets_cancels() {
    let mut board = make_board(CancelPolicy::Revert);
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::Trash);
    board.drag_end(None);

    assert!(board.store().task(&id("T1")).is_some());
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T2", "T3"]);
    assert_eq!(board.drag().phase(), DragPhase::Idle);
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn unresolvable_targets_leave_session_untouched() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T1"));
    board.drag_over(&DropTarget::parse("no-such-task"));
    assert_eq!(board.drag().phase(), DragPhase::Dragging);
    assert_eq!(ids(&board, TaskStatus::Todo), ["T1", "T2", "T3"]);

    board.drag_end(Some(&DropTarget::parse("no-such-task")));
    assert_eq!(board.drag().active(), Some(&id("T1")));

    board.drag_end(Some(&DropTarget::parse("in-progress")));
    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::InProgress));
    assert_eq!(board.drag().phase(), DragPhase::Idle);
}

#[test]
fn second_start_during_drag_is_ignored() {
    let mut board = make_board(CancelPolicy::default());
    assert!(board.drag_start(&id("T1")));
    assert!(!board.drag_start(&id("T2")));
    assert_eq!(board.drag().active(), Some(&id("T1")));

    board.drag_cancel();
    let before = board.columns().clone();
    board.drag_over(&DropTarget::Trash);
    board.drag_end(Some(&DropTarget::Trash));
    assert_eq!(board.columns(), &before);
    assert!(board.store().task(&id("T1")).is_some());
}

#[test]
fn deleting_the_dragged_task_ends_quietly() {
    let mut board = make_board(CancelPolicy::default());
    board.drag_start(&id("T1"));
    board.delete_task(&id("T1"));
    board.drag_over(&DropTarget::Column(TaskStatus::Done));
    board.drag_end(Some(&DropTarget::Column(TaskStatus::Done)));
    assert!(board.store().task(&id("T1")).is_none());
    assert_eq!(ids(&board, TaskStatus::Done), ["D1"]);
    assert_membership(&board);
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn pointer_moves_drive_a_full_drag_to_trash() {
    let mut board = make_board(CancelPolicy::default());
    let droppables = [
        Droppable::new(
            DropTarget::Column(TaskStatus::Todo),
            Rect::new(0.0, 0.0, 100.0, 400.0),
        ),
        Droppable::new(
            DropTarget::Column(TaskStatus::InProgress),
            Rect::new(110.0, 0.0, 100.0, 400.0),
        ),
        Droppable::new(
            DropTarget::Column(TaskStatus::Done),
            Rect::new(220.0, 0.0, 100.0, 400.0),
        ),
        Droppable::new(DropTarget::Trash, Rect::new(0.0, 420.0, 320.0, 60.0)),
    ];
    let card = |x: f64, y: f64| Rect::new(x, y, 80.0, 30.0);

    board.drag_start(&id("T1"));
    let hit = board.drag_pointer_move(
        Some(Point::new(150.0, 100.0)),
        card(120.0, 90.0),
        &droppables,
    );
    assert_eq!(hit, Some(DropTarget::Column(TaskStatus::InProgress)));
    assert_eq!(status_of(&board, "T1"), Some(TaskStatus::InProgress));

    let hit = board.drag_pointer_move(
        Some(Point::new(150.0, 450.0)),
        card(120.0, 440.0),
        &droppables,
    );
    assert_eq!(hit, Some(DropTarget::Trash));
    assert!(board.drag().is_over_trash());

    board.drag_end(hit.as_ref());
    assert!(board.store().task(&id("T1")).is_none());
    assert_membership(&board);
}
