//! Filter/sort engine: canonical tasks + criteria → visible sequence.
//!
//! Everything here is a pure function of its inputs. Sorting is stable, so
//! tasks that compare equal keep their canonical (creation) order across
//! repeated recomputations.

use std::cmp::Ordering;

use taskboard_proto::filter::{SortBy, TaskFilter};
use taskboard_proto::task::Task;

/// Returns `true` if `task` passes every predicate in `filter`.
///
/// `needle` is the lowercased search text, computed once per derivation.
fn matches(task: &Task, filter: &TaskFilter, needle: &str) -> bool {
    if !needle.is_empty() && !task.title.to_lowercase().contains(needle) {
        return false;
    }
    if !filter.tags.is_empty() && !task.shares_tag(&filter.tags) {
        return false;
    }
    if let Some(member) = &filter.assigned_to
        && task.assigned_to.as_ref() != Some(member)
    {
        return false;
    }
    true
}

/// Compares two tasks under the filter's sort field and direction.
///
/// Tasks without a due date sort after dated ones in both directions.
#[must_use]
pub fn compare(a: &Task, b: &Task, filter: &TaskFilter) -> Ordering {
    let direction = filter.sort_direction;
    match filter.sort_by {
        SortBy::CreatedAt => direction.apply(a.created_at.cmp(&b.created_at)),
        SortBy::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortBy::Priority => direction.apply(a.priority.rank().cmp(&b.priority.rank())),
    }
}

/// Filters and sorts `tasks` according to `filter`.
#[must_use]
pub fn derive_visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let needle = filter.search.to_lowercase();
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| matches(task, filter, &needle))
        .collect();
    visible.sort_by(|a, b| compare(a, b, filter));
    visible
}

/// Unique tags across `tasks`, in first-seen order.
#[must_use]
pub fn all_tags(tasks: &[Task]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in tasks.iter().flat_map(|t| &t.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Number of pages needed for `len` items; at least one.
#[must_use]
pub fn page_count(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1)).max(1)
}

/// The 1-based `page` of `items`. Out-of-range pages are empty.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let per_page = per_page.max(1);
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(per_page)) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}
