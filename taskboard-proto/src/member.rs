//! Team members that tasks can be assigned to.

use serde::{Deserialize, Serialize};

/// Identifier of a team member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member of the team. Read-only from the board's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Unique identifier referenced by `Task::assigned_to`.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Avatar URL, opaque to the engine.
    pub avatar: String,
    /// Whether the member is currently online.
    pub is_online: bool,
}

impl TeamMember {
    /// Initials derived from the display name (at most two letters).
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// The built-in demo team.
#[must_use]
pub fn demo_members() -> Vec<TeamMember> {
    [
        ("1", "Alex Johnson", true),
        ("2", "Sam Taylor", false),
        ("3", "Jordan Lee", true),
        ("4", "Casey Morgan", true),
        ("5", "Riley Smith", false),
    ]
    .into_iter()
    .map(|(id, name, is_online)| TeamMember {
        id: MemberId::from(id),
        name: name.to_string(),
        avatar: format!("https://img.heroui.chat/image/avatar?w=200&h=200&u={id}"),
        is_online,
    })
    .collect()
}
