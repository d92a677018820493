use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The three cached directory collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Doctors,
    Hospitals,
    Departments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Doctors,
        EntityKind::Hospitals,
        EntityKind::Departments,
    ];

    /// Collection name, also the URL path segment under `/api`.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Doctors => "doctors",
            EntityKind::Hospitals => "hospitals",
            EntityKind::Departments => "departments",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Doctors => "doctor",
            EntityKind::Hospitals => "hospital",
            EntityKind::Departments => "department",
        }
    }

    /// Key under which the whole collection snapshot is cached.
    pub fn cache_key(self) -> &'static str {
        match self {
            EntityKind::Doctors => "doctors:all",
            EntityKind::Hospitals => "hospitals:all",
            EntityKind::Departments => "departments:all",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctors" | "doctor" => Ok(EntityKind::Doctors),
            "hospitals" | "hospital" => Ok(EntityKind::Hospitals),
            "departments" | "department" => Ok(EntityKind::Departments),
            other => Err(CoreError::InvalidEntityKind(other.to_string())),
        }
    }
}
