// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use roster_core::{OrgUnitId, OrgUnitType, UserId};
use thiserror::Error;

/// API of the organization hierarchy service.
pub trait OrgHierarchy {
    /// All users contained transitively in the unit `scope`, optionally
    /// restricted to units of the given types.
    ///
    /// An unknown unit yields an empty answer.
    fn users_in_unit(
        &self,
        scope: OrgUnitId,
        unit_types: Option<&BTreeSet<OrgUnitType>>,
    ) -> Result<Vec<UserId>, HierarchyError>;
}

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("organization hierarchy query failed: {0}")]
    Backend(String),
}
