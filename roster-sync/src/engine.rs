// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronization of stored membership lists with their declared sources.

use std::sync::Mutex;

use roster_core::{GroupId, Membership};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::diff::{MembershipDiff, WriteStrategy, choose_strategy};
use crate::resolver;
use crate::traits::{
    DirectoryError, GroupStore, HierarchyError, MembershipStore, OrgHierarchy, RoleDirectory,
    StoreError,
};

/// Default divisor of the patch-or-replace heuristic.
pub const DEFAULT_PATCH_DIVISOR: usize = 20;

/// Tuning knobs of the synchronization engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Divisor of the patch-or-replace heuristic: a delta is written
    /// incrementally while it stays strictly below `current / patch_divisor`
    /// records. Zero is treated as one.
    pub patch_divisor: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            patch_divisor: DEFAULT_PATCH_DIVISOR,
        }
    }
}

/// What one synchronization pass did to a group's stored list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Stored and desired membership already agreed; nothing was written.
    Unchanged,

    /// The delta was written incrementally.
    Patched { added: usize, removed: usize },

    /// The stored list was overwritten with the desired one.
    Replaced { members: usize },
}

/// Result of a whole-system sweep.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Outcome per synchronized group, in sweep order.
    pub outcomes: Vec<(GroupId, SyncOutcome)>,

    /// Groups whose synchronization failed, with the error that stopped
    /// each. The sweep continues past them.
    pub failures: Vec<(GroupId, SyncError)>,
}

impl SyncReport {
    /// No group failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of groups whose stored list was written.
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, SyncOutcome::Unchanged))
            .count()
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("no group stored under id {0}")]
    UnknownGroup(GroupId),

    #[error("engine lock is poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves group memberships and reconciles storage against them.
///
/// The engine owns its four collaborators. The two synchronizing entry
/// points share one process-wide lock, so the stored list read by a pass is
/// never mutated by another pass in between. There is no retry logic and no
/// transaction spanning the incremental writes; a collaborator failure
/// aborts the pass for that group and propagates, with the lock released.
#[derive(Debug)]
pub struct SyncEngine<G, M, D, H> {
    groups: G,
    memberships: M,
    directory: D,
    hierarchy: H,
    config: SyncConfig,
    lock: Mutex<()>,
}

impl<G, M, D, H> SyncEngine<G, M, D, H>
where
    G: GroupStore,
    M: MembershipStore,
    D: RoleDirectory,
    H: OrgHierarchy,
{
    pub fn new(groups: G, memberships: M, directory: D, hierarchy: H) -> Self {
        Self::with_config(groups, memberships, directory, hierarchy, SyncConfig::default())
    }

    pub fn with_config(
        groups: G,
        memberships: M,
        directory: D,
        hierarchy: H,
        config: SyncConfig,
    ) -> Self {
        Self {
            groups,
            memberships,
            directory,
            hierarchy,
            config,
            lock: Mutex::new(()),
        }
    }

    /// Resolve one group and persist the delta against its stored list.
    ///
    /// Blocks while another synchronization is running. An id without a
    /// stored group is an error; the caller reacting to an edit of a
    /// just-deleted group needs the signal, while dangling references
    /// *inside* declarations degrade to empty contributions.
    ///
    /// A user who stays a member keeps their stored record untouched: a
    /// change of role alone is invisible to the delta and only reaches
    /// storage when a pass takes the replace path.
    pub fn synchronize(&self, group_id: GroupId) -> Result<SyncOutcome, SyncError> {
        let _guard = self.lock.lock().map_err(|_| SyncError::LockPoisoned)?;
        self.synchronize_locked(group_id)
    }

    /// Resolve and persist every stored group, under one lock acquisition.
    ///
    /// A failing group does not abort the sweep; the error is recorded in
    /// the report and the sweep moves on. Only a failure to list the groups
    /// fails the sweep itself.
    pub fn synchronize_all(&self) -> Result<SyncReport, SyncError> {
        let _guard = self.lock.lock().map_err(|_| SyncError::LockPoisoned)?;

        let mut report = SyncReport::default();
        for group_id in self.groups.group_ids()? {
            match self.synchronize_locked(group_id) {
                Ok(outcome) => report.outcomes.push((group_id, outcome)),
                Err(err) => {
                    warn!(group = %group_id, "skipping group after failure: {err}");
                    report.failures.push((group_id, err));
                }
            }
        }

        debug!(
            synced = report.outcomes.len(),
            failed = report.failures.len(),
            "sweep finished"
        );

        Ok(report)
    }

    /// Compute the desired membership of one group without persisting.
    ///
    /// Runs without the engine lock; nothing is read from the membership
    /// store.
    pub fn resolve_members(&self, group_id: GroupId) -> Result<Vec<Membership>, SyncError> {
        let group = self
            .groups
            .group(group_id)?
            .ok_or(SyncError::UnknownGroup(group_id))?;

        resolver::resolve_members(&group, &self.groups, &self.directory, &self.hierarchy)
    }

    fn synchronize_locked(&self, group_id: GroupId) -> Result<SyncOutcome, SyncError> {
        let group = self
            .groups
            .group(group_id)?
            .ok_or(SyncError::UnknownGroup(group_id))?;

        let desired = resolver::resolve_members(&group, &self.groups, &self.directory, &self.hierarchy)?;
        let current = self.memberships.memberships(group_id)?;

        let diff = MembershipDiff::between(&current, &desired);
        if diff.is_empty() {
            debug!(group = %group_id, "membership unchanged");
            return Ok(SyncOutcome::Unchanged);
        }

        let outcome = match choose_strategy(current.len(), diff.len(), self.config.patch_divisor) {
            WriteStrategy::Patch => {
                // Two sequential saves; a failure in between leaves the list
                // partially patched.
                if !diff.to_remove.is_empty() {
                    self.memberships.remove(group_id, &diff.to_remove)?;
                }
                if !diff.to_add.is_empty() {
                    self.memberships.add(group_id, &diff.to_add)?;
                }

                SyncOutcome::Patched {
                    added: diff.to_add.len(),
                    removed: diff.to_remove.len(),
                }
            }
            WriteStrategy::Replace => {
                self.memberships.replace_all(group_id, &desired)?;

                SyncOutcome::Replaced {
                    members: desired.len(),
                }
            }
        };

        debug!(group = %group_id, ?outcome, "membership synchronized");

        Ok(outcome)
    }
}
