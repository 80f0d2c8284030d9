// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contracts of the collaborators the engine consumes.
//!
//! All four are synchronous, side-effect-free to read from and owned by the
//! surrounding system; implementations are expected to use interior
//! mutability where their backend needs it. Unknown ids answer empty (or
//! `None`), never with an error: errors on these seams always mean the
//! backend itself failed.

mod directory;
mod hierarchy;
mod store;

pub use directory::{DirectoryError, RoleDirectory};
pub use hierarchy::{HierarchyError, OrgHierarchy};
pub use store::{GroupStore, MembershipStore, StoreError};
