// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end runs of the engine over an in-memory school organization.

use roster_core::{Group, GroupId, GroupRole, MemberSource, OrgUnitId};
use roster_sync::test_utils::{
    MemoryDirectory, MemoryHierarchy, MemoryStore, assert_members, setup_logging,
};
use roster_sync::{SyncEngine, SyncOutcome};

#[test]
fn school_roster_lifecycle() {
    setup_logging();

    let store = MemoryStore::new();
    let directory = MemoryDirectory::new();
    let hierarchy = MemoryHierarchy::new();

    // One school with two classes; teachers hold their role at the school
    // unit.
    let school = OrgUnitId::new(1);
    let class_a = OrgUnitId::new(2);
    let class_b = OrgUnitId::new(3);
    hierarchy.add_unit(school, "school");
    hierarchy.add_unit(class_a, "class");
    hierarchy.add_unit(class_b, "class");
    hierarchy.add_child(school, class_a);
    hierarchy.add_child(school, class_b);
    for user in [10, 11, 12] {
        hierarchy.add_user(class_a, user);
    }
    for user in [20, 21] {
        hierarchy.add_user(class_b, user);
    }

    directory.set_unit_type(school, "school");
    directory.assign(2, "teacher", school);
    directory.assign(3, "teacher", school);

    // Class groups owned by their teacher, a staff group fed by the role
    // rule, and an everybody group nesting all three.
    store.insert_group(
        Group::new(1)
            .with_owner(2)
            .with_source(MemberSource::unit_members(class_a)),
    );
    store.insert_group(
        Group::new(2)
            .with_owner(3)
            .with_source(MemberSource::unit_members(class_b)),
    );
    store.insert_group(
        Group::new(3)
            .with_owner(1)
            .with_source(MemberSource::role_holders("teacher", school)),
    );
    store.insert_group(
        Group::new(4)
            .with_owner(1)
            .with_source(MemberSource::group(1))
            .with_source(MemberSource::group(2))
            .with_source(MemberSource::group(3)),
    );

    let engine = SyncEngine::new(
        store.clone(),
        store.clone(),
        directory.clone(),
        hierarchy.clone(),
    );

    let report = engine.synchronize_all().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.changed(), 4);

    assert_members(
        &store.memberships_of(GroupId::new(1)),
        &[
            (2, GroupRole::Owner),
            (10, GroupRole::Participant),
            (11, GroupRole::Participant),
            (12, GroupRole::Participant),
        ],
    );
    assert_members(
        &store.memberships_of(GroupId::new(3)),
        &[
            (1, GroupRole::Owner),
            (2, GroupRole::Participant),
            (3, GroupRole::Participant),
        ],
    );
    // Everybody: own owner first, then the nested groups in declaration
    // order, each collapsed to participants.
    assert_members(
        &store.memberships_of(GroupId::new(4)),
        &[
            (1, GroupRole::Owner),
            (2, GroupRole::Participant),
            (10, GroupRole::Participant),
            (11, GroupRole::Participant),
            (12, GroupRole::Participant),
            (3, GroupRole::Participant),
            (20, GroupRole::Participant),
            (21, GroupRole::Participant),
        ],
    );

    // A second sweep has nothing to do.
    store.clear_writes();
    let report = engine.synchronize_all().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.changed(), 0);
    assert!(store.writes().is_empty());

    // A new student joins class B; resynchronizing picks them up.
    hierarchy.add_user(class_b, 22);
    let outcome = engine.synchronize(GroupId::new(2)).unwrap();
    assert_eq!(outcome, SyncOutcome::Replaced { members: 4 });
    let outcome = engine.synchronize(GroupId::new(4)).unwrap();
    assert_eq!(outcome, SyncOutcome::Replaced { members: 9 });

    // Teacher 2 becomes a moderator of the staff group. The member set is
    // unchanged, so nothing is written and the stored role stays behind.
    store.insert_group(
        Group::new(3)
            .with_owner(1)
            .with_moderators([2.into()])
            .with_source(MemberSource::role_holders("teacher", school)),
    );
    let outcome = engine.synchronize(GroupId::new(3)).unwrap();
    assert_eq!(outcome, SyncOutcome::Unchanged);
    let stored = store.memberships_of(GroupId::new(3));
    let teacher = stored.iter().find(|m| m.user.as_u64() == 2).unwrap();
    assert_eq!(teacher.role, GroupRole::Participant);

    // Once a new teacher forces a write, the replace path refreshes the
    // stored role along the way.
    directory.assign(4, "teacher", school);
    let outcome = engine.synchronize(GroupId::new(3)).unwrap();
    assert_eq!(outcome, SyncOutcome::Replaced { members: 4 });
    assert_members(
        &store.memberships_of(GroupId::new(3)),
        &[
            (1, GroupRole::Owner),
            (2, GroupRole::Moderator),
            (3, GroupRole::Participant),
            (4, GroupRole::Participant),
        ],
    );
}

#[test]
fn mutually_nested_groups_settle_immediately() {
    let store = MemoryStore::new();
    let directory = MemoryDirectory::new();
    let hierarchy = MemoryHierarchy::new();

    store.insert_group(
        Group::new(1)
            .with_owner(1)
            .with_source(MemberSource::group(2)),
    );
    store.insert_group(
        Group::new(2)
            .with_owner(2)
            .with_source(MemberSource::group(1)),
    );

    let engine = SyncEngine::new(
        store.clone(),
        store.clone(),
        directory.clone(),
        hierarchy.clone(),
    );

    let report = engine.synchronize_all().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.changed(), 2);

    assert_members(
        &store.memberships_of(GroupId::new(1)),
        &[(1, GroupRole::Owner), (2, GroupRole::Participant)],
    );
    assert_members(
        &store.memberships_of(GroupId::new(2)),
        &[(2, GroupRole::Owner), (1, GroupRole::Participant)],
    );

    // Resolution reads declarations, never the lists the sweep wrote, so a
    // second sweep finds the fixed point already reached.
    let report = engine.synchronize_all().unwrap();
    assert_eq!(report.changed(), 0);
}
