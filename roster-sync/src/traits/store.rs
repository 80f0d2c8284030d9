// SPDX-License-Identifier: MIT OR Apache-2.0

use roster_core::{Group, GroupId, Membership};
use thiserror::Error;

/// Read access to the stored group declarations.
pub trait GroupStore {
    /// Get a group by id.
    ///
    /// `None` for an id no stored group carries, including ids left behind
    /// by a deleted group.
    fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError>;

    /// Ids of all stored groups.
    fn group_ids(&self) -> Result<Vec<GroupId>, StoreError>;
}

/// Access to the persisted membership lists, keyed by group.
///
/// Every write is one atomic save against the backing storage. The engine
/// never wraps the calls in an outer transaction; a failure leaves the list
/// in whatever state the backend call reached.
pub trait MembershipStore {
    /// The membership list of a group as last persisted, in stored order.
    fn memberships(&self, group: GroupId) -> Result<Vec<Membership>, StoreError>;

    /// Append membership records to a group's list.
    fn add(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError>;

    /// Remove the stored records matching the given records' users.
    fn remove(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError>;

    /// Overwrite a group's list with the given records.
    fn replace_all(&self, group: GroupId, memberships: &[Membership]) -> Result<(), StoreError>;
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("group storage failed: {0}")]
    Backend(String),
}
