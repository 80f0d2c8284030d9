// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborators and fixtures for tests.
//!
//! Every fake is a cheaply cloneable handle onto shared state, so a test
//! keeps one handle for inspection and hands clones to the engine. Answers
//! come back in insertion order, which keeps resolution output deterministic,
//! and each fake can be switched into a failing mode to exercise error
//! propagation.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roster_core::{
    Group, GroupId, GroupRole, MemberSource, Membership, OrgUnitId, OrgUnitType, RoleName, UserId,
};

use crate::traits::{
    DirectoryError, GroupStore, HierarchyError, MembershipStore, OrgHierarchy, RoleDirectory,
    StoreError,
};

/// Route `tracing` output of a test run to the subscriber configured through
/// the environment.
pub fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn passes_filter(filter: Option<&BTreeSet<OrgUnitType>>, unit_type: Option<&OrgUnitType>) -> bool {
    match filter {
        None => true,
        Some(types) => unit_type.is_some_and(|unit_type| types.contains(unit_type)),
    }
}

/// In-memory user/role directory.
///
/// Assignments are flat: a query returns the users assigned the role at
/// exactly the queried unit, provided the unit's recorded type passes the
/// filter.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    inner: Arc<RwLock<DirectoryInner>>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    unit_types: HashMap<OrgUnitId, OrgUnitType>,
    assignments: Vec<(RoleName, OrgUnitId, UserId)>,
    failing: bool,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of a unit, consulted by filter checks.
    pub fn set_unit_type(&self, unit: OrgUnitId, unit_type: impl Into<OrgUnitType>) {
        self.inner
            .write()
            .expect("poisoned lock")
            .unit_types
            .insert(unit, unit_type.into());
    }

    /// Assign `role` to `user` within `unit`.
    pub fn assign(&self, user: impl Into<UserId>, role: impl Into<RoleName>, unit: OrgUnitId) {
        self.inner
            .write()
            .expect("poisoned lock")
            .assignments
            .push((role.into(), unit, user.into()));
    }

    /// Make every following query fail.
    pub fn fail(&self) {
        self.inner.write().expect("poisoned lock").failing = true;
    }

    /// Undo [`MemoryDirectory::fail`].
    pub fn recover(&self) {
        self.inner.write().expect("poisoned lock").failing = false;
    }
}

impl RoleDirectory for MemoryDirectory {
    fn users_with_role(
        &self,
        role: &RoleName,
        scope: OrgUnitId,
        unit_types: Option<&BTreeSet<OrgUnitType>>,
    ) -> Result<Vec<UserId>, DirectoryError> {
        let inner = self.inner.read().expect("poisoned lock");
        if inner.failing {
            return Err(DirectoryError::Backend("injected directory failure".into()));
        }

        if !passes_filter(unit_types, inner.unit_types.get(&scope)) {
            return Ok(Vec::new());
        }

        Ok(inner
            .assignments
            .iter()
            .filter(|(assigned, unit, _)| assigned == role && *unit == scope)
            .map(|(_, _, user)| *user)
            .collect())
    }
}

/// In-memory organization hierarchy.
///
/// Units carry a type, directly contained users and child units; a query
/// walks the subtree under the scope and collects the users of every unit
/// whose type passes the filter.
#[derive(Clone, Debug, Default)]
pub struct MemoryHierarchy {
    inner: Arc<RwLock<HierarchyInner>>,
}

#[derive(Debug, Default)]
struct HierarchyInner {
    units: HashMap<OrgUnitId, UnitEntry>,
    failing: bool,
}

#[derive(Debug, Default)]
struct UnitEntry {
    unit_type: Option<OrgUnitType>,
    users: Vec<UserId>,
    children: Vec<OrgUnitId>,
}

impl MemoryHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit of the given type.
    pub fn add_unit(&self, unit: OrgUnitId, unit_type: impl Into<OrgUnitType>) {
        self.inner
            .write()
            .expect("poisoned lock")
            .units
            .entry(unit)
            .or_default()
            .unit_type = Some(unit_type.into());
    }

    /// Put a user directly into a unit.
    pub fn add_user(&self, unit: OrgUnitId, user: impl Into<UserId>) {
        self.inner
            .write()
            .expect("poisoned lock")
            .units
            .entry(unit)
            .or_default()
            .users
            .push(user.into());
    }

    /// Nest `child` under `parent`.
    pub fn add_child(&self, parent: OrgUnitId, child: OrgUnitId) {
        self.inner
            .write()
            .expect("poisoned lock")
            .units
            .entry(parent)
            .or_default()
            .children
            .push(child);
    }

    /// Make every following query fail.
    pub fn fail(&self) {
        self.inner.write().expect("poisoned lock").failing = true;
    }

    /// Undo [`MemoryHierarchy::fail`].
    pub fn recover(&self) {
        self.inner.write().expect("poisoned lock").failing = false;
    }
}

impl OrgHierarchy for MemoryHierarchy {
    fn users_in_unit(
        &self,
        scope: OrgUnitId,
        unit_types: Option<&BTreeSet<OrgUnitType>>,
    ) -> Result<Vec<UserId>, HierarchyError> {
        let inner = self.inner.read().expect("poisoned lock");
        if inner.failing {
            return Err(HierarchyError::Backend("injected hierarchy failure".into()));
        }

        let mut users: Vec<UserId> = Vec::new();
        let mut visited: HashSet<OrgUnitId> = HashSet::from([scope]);
        let mut queue: VecDeque<OrgUnitId> = VecDeque::from([scope]);

        while let Some(unit) = queue.pop_front() {
            let Some(entry) = inner.units.get(&unit) else {
                continue;
            };

            if passes_filter(unit_types, entry.unit_type.as_ref()) {
                users.extend(entry.users.iter().copied());
            }

            for &child in &entry.children {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        Ok(users)
    }
}

/// One membership write observed by [`MemoryStore`], with the number of
/// records it carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Added(GroupId, usize),
    Removed(GroupId, usize),
    Replaced(GroupId, usize),
}

/// In-memory group and membership storage.
///
/// One struct backs both store contracts and records every membership write,
/// so tests can assert which persistence path ran and that an idempotent
/// pass wrote nothing. Seeding helpers bypass the write log.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    groups: BTreeMap<GroupId, Group>,
    memberships: HashMap<GroupId, Vec<Membership>>,
    writes: Vec<StoreOp>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a group declaration into the store, replacing any previous one.
    pub fn insert_group(&self, group: Group) {
        self.inner
            .write()
            .expect("poisoned lock")
            .groups
            .insert(group.id, group);
    }

    /// Seed the stored membership list of a group.
    pub fn set_memberships(&self, group: GroupId, memberships: Vec<Membership>) {
        self.inner
            .write()
            .expect("poisoned lock")
            .memberships
            .insert(group, memberships);
    }

    /// The stored membership list of a group.
    pub fn memberships_of(&self, group: GroupId) -> Vec<Membership> {
        self.inner
            .read()
            .expect("poisoned lock")
            .memberships
            .get(&group)
            .cloned()
            .unwrap_or_default()
    }

    /// Membership writes observed so far, oldest first.
    pub fn writes(&self) -> Vec<StoreOp> {
        self.inner.read().expect("poisoned lock").writes.clone()
    }

    /// Forget the observed writes.
    pub fn clear_writes(&self) {
        self.inner.write().expect("poisoned lock").writes.clear();
    }

    /// Make every following call fail.
    pub fn fail(&self) {
        self.inner.write().expect("poisoned lock").failing = true;
    }

    /// Undo [`MemoryStore::fail`].
    pub fn recover(&self) {
        self.inner.write().expect("poisoned lock").failing = false;
    }
}

impl StoreInner {
    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Backend("injected storage failure".into()))
        } else {
            Ok(())
        }
    }
}

impl GroupStore for MemoryStore {
    fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
        let inner = self.inner.read().expect("poisoned lock");
        inner.check()?;

        Ok(inner.groups.get(&id).cloned())
    }

    fn group_ids(&self) -> Result<Vec<GroupId>, StoreError> {
        let inner = self.inner.read().expect("poisoned lock");
        inner.check()?;

        Ok(inner.groups.keys().copied().collect())
    }
}

impl MembershipStore for MemoryStore {
    fn memberships(&self, group: GroupId) -> Result<Vec<Membership>, StoreError> {
        let inner = self.inner.read().expect("poisoned lock");
        inner.check()?;

        Ok(inner.memberships.get(&group).cloned().unwrap_or_default())
    }

    fn add(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("poisoned lock");
        inner.check()?;

        inner
            .memberships
            .entry(group)
            .or_default()
            .extend_from_slice(memberships);
        inner.writes.push(StoreOp::Added(group, memberships.len()));

        Ok(())
    }

    fn remove(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("poisoned lock");
        inner.check()?;

        let removed: HashSet<UserId> = memberships.iter().map(|m| m.user).collect();
        if let Some(list) = inner.memberships.get_mut(&group) {
            list.retain(|m| !removed.contains(&m.user));
        }
        inner.writes.push(StoreOp::Removed(group, memberships.len()));

        Ok(())
    }

    fn replace_all(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("poisoned lock");
        inner.check()?;

        inner.memberships.insert(group, memberships.to_vec());
        inner
            .writes
            .push(StoreOp::Replaced(group, memberships.len()));

        Ok(())
    }
}

/// Assert resolved members against `(user id, role)` pairs, order included.
pub fn assert_members(members: &[Membership], expected: &[(u64, GroupRole)]) {
    let got: Vec<(u64, GroupRole)> = members.iter().map(|m| (m.user.as_u64(), m.role)).collect();
    assert_eq!(got, expected);
}

/// A store holding `group_count` randomly wired groups drawing on
/// `user_count` users, deterministic per seed.
///
/// Group references are unconstrained: self references, duplicates and
/// cycles all occur, which makes the fixture useful for termination checks.
pub fn random_group_graph(seed: u64, group_count: u64, user_count: u64) -> MemoryStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let store = MemoryStore::new();

    for id in 0..group_count {
        let mut group = Group::new(id);

        if rng.random_bool(0.7) {
            group = group.with_owner(rng.random_range(0..user_count));
        }

        let moderators: Vec<UserId> = (0..rng.random_range(0..3))
            .map(|_| UserId::new(rng.random_range(0..user_count)))
            .collect();
        group = group.with_moderators(moderators);

        for _ in 0..rng.random_range(0..4) {
            group = group.with_source(MemberSource::user(rng.random_range(0..user_count)));
        }

        for _ in 0..rng.random_range(0..3) {
            group = group.with_source(MemberSource::group(rng.random_range(0..group_count)));
        }

        store.insert_group(group);
    }

    store
}
