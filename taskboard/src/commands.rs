//! Command execution for the `taskboard` binary.
//!
//! Each [`Command`] runs against a [`Board`] and returns the text to print.
//! Input validation happens here, at the boundary; the board and store
//! below never see an invalid title or assignee.

use chrono::NaiveDate;
use taskboard_proto::filter::FilterPatch;
use taskboard_proto::member::MemberId;
use taskboard_proto::snapshot::BoardSnapshot;
use taskboard_proto::task::{NewTask, TaskId, TaskPatch};

use crate::board::{Board, DropTarget};
use crate::config::{AddArgs, ClientConfig, Command, EditArgs, FilterArgs};
use crate::persist::PersistError;
use crate::tasks::{TaskError, all_tags, normalize_tags, validate_assignee, validate_new_task, validate_title};
use crate::ui;

/// Errors reported by the command line.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Rejected input.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Saved state could not be loaded or written.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// The drop target did not resolve to a column, task, or trash.
    #[error("cannot drop on {0}")]
    InvalidTarget(String),
}

/// The state a board starts from when nothing has been saved yet.
#[must_use]
pub fn initial_snapshot(config: &ClientConfig, now: chrono::DateTime<chrono::Utc>) -> BoardSnapshot {
    let base = if config.seed_demo_data {
        BoardSnapshot::demo(now)
    } else {
        BoardSnapshot::default()
    };
    BoardSnapshot {
        items_per_page: config.items_per_page.max(1),
        view_options: config.view_options,
        ..base
    }
}

/// Runs `command` and returns its output.
///
/// # Errors
///
/// Returns [`CommandError`] for invalid input or unknown ids.
pub fn execute(board: &mut Board, command: Command, today: NaiveDate) -> Result<String, CommandError> {
    tracing::debug!(?command, "executing");
    match command {
        Command::Board => Ok(ui::render_board(board, today)),
        Command::List { page } => Ok(ui::render_list(board.store(), page, today)),
        Command::Add(args) => add(board, args),
        Command::Edit(args) => edit(board, args),
        Command::Move { id, target } => move_task(board, &TaskId::from(id.as_str()), &target),
        Command::Delete { id } => {
            let id = TaskId::from(id.as_str());
            if board.delete_task(&id) {
                Ok(format!("Deleted {id}\n"))
            } else {
                Err(TaskError::TaskNotFound(id.to_string()).into())
            }
        }
        Command::Members => Ok(ui::render_members(board.store())),
        Command::Filter(args) => {
            filter(board, args);
            Ok(ui::render_view(board, 1, today))
        }
        Command::SelectMember { id } => {
            if !board.select_member(&MemberId::from(id.as_str())) {
                return Err(TaskError::InvalidAssignee(id).into());
            }
            Ok(ui::render_view(board, 1, today))
        }
        Command::ClearMember => {
            board.clear_selected_member();
            Ok(ui::render_view(board, 1, today))
        }
        Command::View { view } => {
            board.set_view_type(view);
            Ok(ui::render_view(board, 1, today))
        }
        Command::Tags => {
            let mut out = all_tags(board.store().tasks()).join("\n");
            out.push('\n');
            Ok(out)
        }
    }
}

fn add(board: &mut Board, args: AddArgs) -> Result<String, CommandError> {
    let mut input = NewTask::titled(args.title)
        .with_status(args.status)
        .with_priority(args.priority);
    input.description = args.description;
    input.tags = args.tags;
    input.due_date = args.due;
    input.assigned_to = args.assignee.map(MemberId::new);

    let input = validate_new_task(input)?;
    if let Some(member) = &input.assigned_to {
        validate_assignee(member, board.store().members())?;
    }
    let id = board.create_task(input);
    Ok(format!("Created {id}\n"))
}

fn edit(board: &mut Board, args: EditArgs) -> Result<String, CommandError> {
    let id = TaskId::from(args.id.as_str());
    if board.store().task(&id).is_none() {
        return Err(TaskError::TaskNotFound(args.id).into());
    }

    let assigned_to = if args.unassign {
        Some(None)
    } else if let Some(member) = args.assignee.map(MemberId::new) {
        validate_assignee(&member, board.store().members())?;
        Some(Some(member))
    } else {
        None
    };
    let patch = TaskPatch {
        title: args.title.as_deref().map(validate_title).transpose()?,
        description: args.description,
        status: args.status,
        tags: (!args.tags.is_empty()).then(|| normalize_tags(&args.tags)),
        due_date: if args.clear_due { Some(None) } else { args.due.map(Some) },
        assigned_to,
        priority: args.priority,
    };

    if board.update_task(&id, &patch) {
        Ok(format!("Updated {id}\n"))
    } else {
        Ok(format!("No changes to {id}\n"))
    }
}

/// Moves a task by running a complete drag session: start, hover, drop.
fn move_task(board: &mut Board, id: &TaskId, target: &str) -> Result<String, CommandError> {
    if !board.drag_start(id) {
        return Err(TaskError::TaskNotFound(id.to_string()).into());
    }
    let target = DropTarget::parse(target);
    board.drag_over(&target);
    board.drag_end(Some(&target));

    if board.drag().active().is_some() {
        board.drag_cancel();
        return Err(CommandError::InvalidTarget(target.to_string()));
    }

    // Order within a column is not saved, so only the status is reported.
    Ok(match board.store().task(id) {
        None => format!("Deleted {id}\n"),
        Some(task) => format!("Moved {id} to {}\n", task.status.label()),
    })
}

fn filter(board: &mut Board, args: FilterArgs) {
    if args.clear {
        let cleared = board.store().filter().cleared();
        board.update_filter(&FilterPatch {
            search: Some(cleared.search),
            tags: Some(cleared.tags),
            sort_by: Some(cleared.sort_by),
            sort_direction: Some(cleared.sort_direction),
            ..FilterPatch::default()
        });
    }
    board.update_filter(&FilterPatch {
        search: args.search,
        tags: (!args.tags.is_empty()).then(|| normalize_tags(&args.tags)),
        assigned_to: args.assignee.map(|a| (!a.is_empty()).then(|| MemberId::new(a))),
        sort_by: args.sort_by,
        sort_direction: args.direction,
    });
}
