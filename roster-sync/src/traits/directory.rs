// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use roster_core::{OrgUnitId, OrgUnitType, RoleName, UserId};
use thiserror::Error;

/// API of the user/role directory.
pub trait RoleDirectory {
    /// All users currently assigned `role` within the unit `scope`,
    /// optionally restricted to units of the given types.
    ///
    /// An unknown role or unit yields an empty answer.
    fn users_with_role(
        &self,
        role: &RoleName,
        scope: OrgUnitId,
        unit_types: Option<&BTreeSet<OrgUnitType>>,
    ) -> Result<Vec<UserId>, DirectoryError>;
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("role directory query failed: {0}")]
    Backend(String),
}
