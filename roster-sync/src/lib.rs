// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution and synchronization of group memberships.
//!
//! A group declares its member sources; this crate turns those declarations
//! into the persisted membership list. [`resolver`] computes the full,
//! deduplicated, role-assigned member set a group should have, walking
//! nested group references with cycle protection. [`diff`] compares that
//! target against the stored list and picks between an incremental patch and
//! a full replace. [`SyncEngine`] ties both together behind a process-wide
//! lock and drives the four collaborators: a group store, a membership
//! store, a user/role directory and an organization hierarchy service (see
//! [`traits`]).

pub mod diff;
pub mod engine;
pub mod resolver;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;

pub use diff::{MembershipDiff, WriteStrategy};
pub use engine::{SyncConfig, SyncEngine, SyncError, SyncOutcome, SyncReport};
