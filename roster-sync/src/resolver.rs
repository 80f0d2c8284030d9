// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of a group's declared member sources into one deduplicated,
//! role-assigned member set.
//!
//! Sources are evaluated in fixed priority order: the owner, then
//! moderators, then mentors, then explicit user rules, role rules, unit
//! rules and finally nested groups. The first source to reach a user decides
//! their role; later sources never duplicate or downgrade an entry. Nested
//! group references are expanded through their transitive closure with cycle
//! protection, and everybody they contribute joins as a plain participant.

use std::collections::{HashSet, VecDeque};

use roster_core::{Group, GroupId, GroupRole, MemberSource, Membership, UserId};
use tracing::{debug, trace};

use crate::engine::SyncError;
use crate::traits::{GroupStore, OrgHierarchy, RoleDirectory};

/// Compute the full member set a group should have, one entry per user, in
/// evaluation order.
///
/// Reads only the group declarations and the two query collaborators; never
/// writes. A rule referencing a group, role or unit nobody knows contributes
/// nothing. A failing collaborator aborts the whole resolution.
pub fn resolve_members<G, D, H>(
    group: &Group,
    groups: &G,
    directory: &D,
    hierarchy: &H,
) -> Result<Vec<Membership>, SyncError>
where
    G: GroupStore,
    D: RoleDirectory,
    H: OrgHierarchy,
{
    let mut seen: HashSet<UserId> = HashSet::new();
    let mut members: Vec<Membership> = Vec::new();

    for (user, role) in direct_members(group, directory, hierarchy)? {
        if seen.insert(user) {
            members.push(Membership::new(user, group.id, role));
        }
    }

    for nested_id in nested_groups(group, groups)? {
        let Some(nested) = groups.group(nested_id)? else {
            continue;
        };

        let mut contributed = 0;
        for (user, _) in direct_members(&nested, directory, hierarchy)? {
            if seen.insert(user) {
                members.push(Membership::new(user, group.id, GroupRole::Participant));
                contributed += 1;
            }
        }

        trace!(group = %group.id, nested = %nested_id, contributed, "nested group evaluated");
    }

    debug!(group = %group.id, members = members.len(), "membership resolved");

    Ok(members)
}

/// All groups reachable from `origin` through `Group` rules, in discovery
/// order.
///
/// The origin itself is never part of the closure, even when a cycle routes
/// back to it, and a reference to an unknown group is skipped. Each group is
/// visited once, so the walk terminates on any reference graph.
pub fn nested_groups<G>(origin: &Group, groups: &G) -> Result<Vec<GroupId>, SyncError>
where
    G: GroupStore,
{
    let mut visited: HashSet<GroupId> = HashSet::from([origin.id]);
    let mut closure: Vec<GroupId> = Vec::new();
    let mut queue: VecDeque<GroupId> = origin.nested_group_ids().collect();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }

        let Some(group) = groups.group(id)? else {
            trace!(group = %origin.id, nested = %id, "skipping dangling group reference");
            continue;
        };

        closure.push(id);
        queue.extend(group.nested_group_ids());
    }

    Ok(closure)
}

/// The members a single group gathers through sources other than nested
/// groups, paired with the role each source grants.
///
/// Duplicates are kept; the caller's first-wins insertion handles them.
fn direct_members<D, H>(
    group: &Group,
    directory: &D,
    hierarchy: &H,
) -> Result<Vec<(UserId, GroupRole)>, SyncError>
where
    D: RoleDirectory,
    H: OrgHierarchy,
{
    let mut users: Vec<(UserId, GroupRole)> = Vec::new();

    if let Some(owner) = group.owner {
        users.push((owner, GroupRole::Owner));
    }

    for &moderator in &group.moderators {
        users.push((moderator, GroupRole::Moderator));
    }

    for &mentor in &group.mentors {
        users.push((mentor, GroupRole::Mentor));
    }

    for source in &group.sources {
        if let MemberSource::User(user) = source {
            users.push((*user, GroupRole::Participant));
        }
    }

    for source in &group.sources {
        if let MemberSource::RoleHolders {
            role,
            scope,
            unit_types,
        } = source
        {
            let holders = directory.users_with_role(role, *scope, unit_types.as_ref())?;
            trace!(group = %group.id, %role, %scope, holders = holders.len(), "role rule evaluated");
            users.extend(holders.into_iter().map(|user| (user, GroupRole::Participant)));
        }
    }

    for source in &group.sources {
        if let MemberSource::UnitMembers { scope, unit_types } = source {
            let contained = hierarchy.users_in_unit(*scope, unit_types.as_ref())?;
            trace!(group = %group.id, %scope, contained = contained.len(), "unit rule evaluated");
            users.extend(contained.into_iter().map(|user| (user, GroupRole::Participant)));
        }
    }

    Ok(users)
}
