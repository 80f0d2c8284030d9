// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delta computation between the stored and the desired membership list.

use std::collections::HashSet;

use roster_core::{Membership, UserId};

/// The additions and removals turning the stored membership list into the
/// desired one.
///
/// The comparison is keyed by user: a user present in both lists is retained
/// and appears in neither vec, even when the stored role differs from the
/// desired one. Role changes of retained members are invisible to the delta.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: Vec<Membership>,
    pub to_remove: Vec<Membership>,
}

impl MembershipDiff {
    /// Compare the stored list against the desired list.
    pub fn between(current: &[Membership], desired: &[Membership]) -> Self {
        let current_users: HashSet<UserId> = current.iter().map(|m| m.user).collect();
        let desired_users: HashSet<UserId> = desired.iter().map(|m| m.user).collect();

        let to_add = desired
            .iter()
            .filter(|m| !current_users.contains(&m.user))
            .copied()
            .collect();
        let to_remove = current
            .iter()
            .filter(|m| !desired_users.contains(&m.user))
            .copied()
            .collect();

        Self { to_add, to_remove }
    }

    /// Neither additions nor removals.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Number of records the delta touches.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// How a delta gets persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Remove and append only the delta, leaving retained records untouched.
    Patch,

    /// Overwrite the whole stored list with the desired one.
    Replace,
}

/// Pick the persistence strategy for a delta of `changed` records against a
/// stored list of `current_len` records.
///
/// The delta is patched incrementally while it stays strictly below one
/// `divisor`-th of the stored list, under integer division; anything larger
/// replaces the list wholesale. A `divisor` of zero is treated as one.
pub fn choose_strategy(current_len: usize, changed: usize, divisor: usize) -> WriteStrategy {
    // Integer division and strict comparison: with 100 stored records and a
    // divisor of 20, a delta of 4 patches, a delta of 5 replaces.
    if current_len / divisor.max(1) > changed {
        WriteStrategy::Patch
    } else {
        WriteStrategy::Replace
    }
}
