// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data types for group membership resolution.
//!
//! A [`Group`] declares where its members come from: an optional owner,
//! moderator and mentor lists, and an ordered sequence of [`MemberSource`]
//! rules (explicit users, role holders inside an organizational unit, all
//! users of an organizational unit, or the members of another group).
//!
//! Resolving those declarations into concrete [`Membership`] records, one per
//! user with a single [`GroupRole`], is the job of the accompanying engine
//! crate. The types here carry no behaviour beyond construction and
//! comparison; all identifiers are opaque handles into the surrounding
//! system.

pub mod group;
pub mod identity;
pub mod membership;
pub mod role;

pub use group::{Group, MemberSource};
pub use identity::{GroupId, OrgUnitId, OrgUnitType, RoleName, UserId};
pub use membership::Membership;
pub use role::GroupRole;
