// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four membership roles a user can hold within a group. Greater roles
/// outrank lower ones when a user qualifies for membership through more than
/// one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupRole {
    /// Membership through an explicit user rule, a role or unit rule, or a
    /// nested group.
    Participant,

    /// Listed as a mentor of the group.
    Mentor,

    /// Listed as a moderator of the group.
    Moderator,

    /// The single owner of the group.
    Owner,
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupRole::Participant => "participant",
            GroupRole::Mentor => "mentor",
            GroupRole::Moderator => "moderator",
            GroupRole::Owner => "owner",
        };

        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::GroupRole;

    #[test]
    fn roles_rank_by_significance() {
        assert!(GroupRole::Owner > GroupRole::Moderator);
        assert!(GroupRole::Moderator > GroupRole::Mentor);
        assert!(GroupRole::Mentor > GroupRole::Participant);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(GroupRole::Owner.to_string(), "owner");
        assert_eq!(GroupRole::Participant.to_string(), "participant");
    }
}
