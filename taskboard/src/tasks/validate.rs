//! Form-boundary validation for task input.
//!
//! The store trusts its callers; these checks run first.

use taskboard_proto::member::{MemberId, TeamMember};
use taskboard_proto::task::{MAX_TASK_TITLE_LENGTH, NewTask};

use super::TaskError;

/// Trims a title and checks it is non-empty and within the length limit.
///
/// # Errors
///
/// Returns [`TaskError::TitleEmpty`] if nothing is left after trimming, or
/// [`TaskError::TitleTooLong`] if it exceeds 256 characters.
pub fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::TitleEmpty);
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(TaskError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Checks that `member` refers to someone on the team.
///
/// # Errors
///
/// Returns [`TaskError::InvalidAssignee`] if no member has that id.
pub fn validate_assignee(member: &MemberId, team: &[TeamMember]) -> Result<(), TaskError> {
    if team.iter().any(|m| &m.id == member) {
        Ok(())
    } else {
        Err(TaskError::InvalidAssignee(member.to_string()))
    }
}

/// Trims tags and drops empties and repeats, keeping first occurrences.
#[must_use]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Normalizes new-task input the way the add-task form does.
///
/// The title is trimmed and checked, tags are trimmed with empties and
/// repeats dropped (first occurrence wins), and an empty assignee id means
/// unassigned.
///
/// # Errors
///
/// Propagates title errors from [`validate_title`].
pub fn validate_new_task(input: NewTask) -> Result<NewTask, TaskError> {
    let title = validate_title(&input.title)?;
    let tags = normalize_tags(&input.tags);
    let assigned_to = input.assigned_to.filter(|m| !m.as_str().is_empty());

    Ok(NewTask {
        title,
        tags,
        assigned_to,
        ..input
    })
}
