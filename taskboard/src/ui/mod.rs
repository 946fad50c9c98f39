//! Plain-text rendering of the board, list, and table views.

pub mod due;

pub use due::{describe_due, is_overdue};

use chrono::NaiveDate;
use taskboard_proto::task::{Task, TaskStatus};
use taskboard_proto::view::{ViewOptions, ViewType};

use crate::board::Board;
use crate::tasks::{TaskStore, page_count, paginate};

/// Renders whichever view the store has selected.
#[must_use]
pub fn render_view(board: &Board, page: usize, today: NaiveDate) -> String {
    match board.store().view_type() {
        ViewType::Kanban => render_board(board, today),
        ViewType::List => render_list(board.store(), page, today),
        ViewType::Table => render_table(board.store(), today),
    }
}

/// Kanban view: one section per column in local drag order.
#[must_use]
pub fn render_board(board: &Board, today: NaiveDate) -> String {
    let store = board.store();
    let mut lines = Vec::new();
    if let Some(member) = store.selected_member() {
        lines.push(format!("Showing tasks for {}", member.name));
        lines.push(String::new());
    }
    for status in TaskStatus::ALL {
        let column = board.column(status);
        lines.push(format!("== {} ({}) ==", status.label(), column.len()));
        if column.is_empty() {
            lines.push("  No tasks".to_string());
        }
        for task in column {
            lines.extend(card_lines(store, task, today));
        }
        lines.push(String::new());
    }
    finish(lines)
}

/// List view: one page of the filtered, sorted tasks.
#[must_use]
pub fn render_list(store: &TaskStore, page: usize, today: NaiveDate) -> String {
    let visible = store.visible_tasks();
    let per_page = store.items_per_page();
    let pages = page_count(visible.len(), per_page);

    let mut lines = Vec::new();
    let shown = paginate(&visible, page, per_page);
    if shown.is_empty() {
        lines.push("No tasks".to_string());
    }
    for task in shown {
        let mut card = card_lines(store, task, today);
        if let Some(first) = card.first_mut() {
            *first = format!("{first}  ({})", task.status.label());
        }
        lines.extend(card);
    }
    lines.push(String::new());
    lines.push(format!(
        "Page {page} of {pages} ({} tasks)",
        visible.len()
    ));
    finish(lines)
}

/// Table view: one row per visible task.
#[must_use]
pub fn render_table(store: &TaskStore, today: NaiveDate) -> String {
    let options = store.view_options();
    let mut header = vec!["ID", "Title", "Status"];
    if options.show_priority {
        header.push("Priority");
    }
    if options.show_assignee {
        header.push("Assignee");
    }
    if options.show_due_date {
        header.push("Due");
    }
    if options.show_tags {
        header.push("Tags");
    }

    let mut lines = vec![header.join(" | ")];
    for task in store.visible_tasks() {
        let mut row = vec![
            task.id.to_string(),
            task.title.clone(),
            task.status.label().to_string(),
        ];
        if options.show_priority {
            row.push(task.priority.to_string());
        }
        if options.show_assignee {
            row.push(
                store
                    .assignee_of(task)
                    .map_or_else(|| "-".to_string(), |m| m.name.clone()),
            );
        }
        if options.show_due_date {
            row.push(task.due_date.map_or_else(
                || "-".to_string(),
                |d| describe_due(d, today),
            ));
        }
        if options.show_tags {
            row.push(task.tags.join(", "));
        }
        lines.push(row.join(" | "));
    }
    finish(lines)
}

/// The team, with online markers.
#[must_use]
pub fn render_members(store: &TaskStore) -> String {
    let lines = store
        .members()
        .iter()
        .map(|m| {
            let marker = if m.is_online { "●" } else { "○" };
            let selected = store
                .selected_member()
                .is_some_and(|s| s.id == m.id);
            format!(
                "{marker} {:<4} {} ({}){}",
                m.id.as_str(),
                m.name,
                m.initials(),
                if selected { "  [selected]" } else { "" }
            )
        })
        .collect();
    finish(lines)
}

fn card_lines(store: &TaskStore, task: &Task, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![format!("  [{}] {}", task.id, task.title)];
    let details = card_details(store, task, store.view_options(), today);
    if !details.is_empty() {
        lines.push(format!("      {}", details.join(" · ")));
    }
    lines
}

fn card_details(
    store: &TaskStore,
    task: &Task,
    options: ViewOptions,
    today: NaiveDate,
) -> Vec<String> {
    let mut details = Vec::new();
    if options.show_priority {
        details.push(task.priority.to_string());
    }
    if options.show_tags && !task.tags.is_empty() {
        details.push(task.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "));
    }
    if options.show_assignee
        && let Some(member) = store.assignee_of(task)
    {
        details.push(format!("@{}", member.name));
    }
    if options.show_due_date
        && let Some(due) = task.due_date
    {
        let label = describe_due(due, today);
        if is_overdue(due, today) && task.status != TaskStatus::Done {
            details.push(format!("due {label} (overdue)"));
        } else {
            details.push(format!("due {label}"));
        }
    }
    details
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
