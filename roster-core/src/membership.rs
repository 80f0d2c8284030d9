// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::identity::{GroupId, UserId};
use crate::role::GroupRole;

/// The derived fact that a user is a member of a group, with exactly one
/// role.
///
/// Records are produced by resolution and written by synchronization, never
/// edited directly. Storage holds at most one record per `(user, group)`
/// pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user: UserId,
    pub group: GroupId,
    pub role: GroupRole,
}

impl Membership {
    pub fn new(user: impl Into<UserId>, group: impl Into<GroupId>, role: GroupRole) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
            role,
        }
    }
}
