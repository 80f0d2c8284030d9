// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque identifiers for the entities the engine talks about.
//!
//! Users, groups and organizational units are owned by the surrounding
//! system; this crate only ever compares and copies their ids. Stable
//! equality and ordering is all the resolution algorithm relies on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(u64);

impl GroupId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for GroupId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an organizational unit.
///
/// Units form a hierarchy maintained elsewhere; membership rules only name a
/// unit as the scope of a directory or hierarchy query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrgUnitId(u64);

impl OrgUnitId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for OrgUnitId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrgUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a role as understood by the user/role directory.
///
/// Role names are not interpreted here, they are passed through to the
/// directory verbatim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for RoleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of an organizational unit.
///
/// Membership rules can restrict a unit-scoped query to certain unit types;
/// the filter is passed through to the collaborator answering the query.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrgUnitType(String);

impl OrgUnitType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrgUnitType {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for OrgUnitType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for OrgUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(UserId::new(7), UserId::from(7));
        assert!(GroupId::new(1) < GroupId::new(2));
        assert_eq!(OrgUnitId::new(3).as_u64(), 3);
    }

    #[test]
    fn labels_display_verbatim() {
        assert_eq!(RoleName::from("teacher").to_string(), "teacher");
        assert_eq!(OrgUnitType::new("class").as_str(), "class");
    }
}
