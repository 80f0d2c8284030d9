// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::{GroupId, OrgUnitId, OrgUnitType, RoleName, UserId};

/// One rule describing where members of a group come from.
///
/// A group carries an ordered sequence of these; order matters because
/// resolution walks them in declaration order and the first rule to reach a
/// user decides their inclusion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberSource {
    /// One explicitly named user.
    User(UserId),

    /// Every user currently assigned a role within an organizational unit,
    /// optionally restricted to certain unit types.
    RoleHolders {
        role: RoleName,
        scope: OrgUnitId,
        unit_types: Option<BTreeSet<OrgUnitType>>,
    },

    /// Every user contained (transitively) in an organizational unit,
    /// optionally restricted to certain unit types.
    UnitMembers {
        scope: OrgUnitId,
        unit_types: Option<BTreeSet<OrgUnitType>>,
    },

    /// The resolved members of another group.
    Group(GroupId),
}

impl MemberSource {
    /// Rule including a single user.
    pub fn user(id: impl Into<UserId>) -> Self {
        Self::User(id.into())
    }

    /// Rule including all holders of a role within a unit, without a
    /// unit-type restriction.
    pub fn role_holders(role: impl Into<RoleName>, scope: OrgUnitId) -> Self {
        Self::RoleHolders {
            role: role.into(),
            scope,
            unit_types: None,
        }
    }

    /// Rule including all users of a unit, without a unit-type restriction.
    pub fn unit_members(scope: OrgUnitId) -> Self {
        Self::UnitMembers {
            scope,
            unit_types: None,
        }
    }

    /// Rule including the members of another group.
    pub fn group(id: impl Into<GroupId>) -> Self {
        Self::Group(id.into())
    }
}

/// A group as declared by its administrators.
///
/// The struct holds only the declarations: the owner, moderator and mentor
/// assignments plus the member source rules. The resolved membership list is
/// not a field here; it lives in storage as the result of the last
/// synchronization pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub owner: Option<UserId>,
    pub moderators: Vec<UserId>,
    pub mentors: Vec<UserId>,
    pub sources: Vec<MemberSource>,
}

impl Group {
    /// A group with no owner, assignments or member sources.
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            moderators: Vec::new(),
            mentors: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the moderator list.
    pub fn with_moderators(mut self, moderators: impl IntoIterator<Item = UserId>) -> Self {
        self.moderators = moderators.into_iter().collect();
        self
    }

    /// Set the mentor list.
    pub fn with_mentors(mut self, mentors: impl IntoIterator<Item = UserId>) -> Self {
        self.mentors = mentors.into_iter().collect();
        self
    }

    /// Append one member source rule.
    pub fn with_source(mut self, source: MemberSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Ids of the groups named by `Group` rules, in declaration order.
    pub fn nested_group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.sources.iter().filter_map(|source| match source {
            MemberSource::Group(id) => Some(*id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Group, MemberSource};
    use crate::identity::{GroupId, OrgUnitId};

    #[test]
    fn builders_accumulate() {
        let group = Group::new(1)
            .with_owner(10)
            .with_moderators([11.into(), 12.into()])
            .with_source(MemberSource::user(13))
            .with_source(MemberSource::unit_members(OrgUnitId::new(7)));

        assert_eq!(group.owner, Some(10.into()));
        assert_eq!(group.moderators.len(), 2);
        assert!(group.mentors.is_empty());
        assert_eq!(group.sources.len(), 2);
    }

    #[test]
    fn nested_group_ids_keeps_declaration_order() {
        let group = Group::new(1)
            .with_source(MemberSource::group(3))
            .with_source(MemberSource::user(13))
            .with_source(MemberSource::group(2));

        let nested: Vec<GroupId> = group.nested_group_ids().collect();
        assert_eq!(nested, vec![GroupId::new(3), GroupId::new(2)]);
    }
}
