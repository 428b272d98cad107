//! Entity Module
//!
//! Entity type names and the generic record shape held in entity tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FleetError;

// == Entity Type ==
/// Every entity type that participates in freshness tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Trucks,
    Drivers,
    Groups,
    Stats,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Trucks,
        EntityType::Drivers,
        EntityType::Groups,
        EntityType::Stats,
    ];

    /// Canonical upper-case name (`TRUCKS`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Trucks => "TRUCKS",
            EntityType::Drivers => "DRIVERS",
            EntityType::Groups => "GROUPS",
            EntityType::Stats => "STATS",
        }
    }

    /// Collection path on the remote fleet service.
    pub fn path(&self) -> &'static str {
        match self {
            EntityType::Trucks => "trucks",
            EntityType::Drivers => "drivers",
            EntityType::Groups => "groups",
            EntityType::Stats => "stats",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FleetError::UnknownEntityType(s.to_string()))
    }
}

// == Entity Record ==
/// One row of an entity table.
///
/// Fields are kept as loose JSON so the same table machinery serves trucks,
/// drivers, groups and stats alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Instant of the last live patch; `None` for records straight off a pull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_observed: Option<u64>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            last_observed: None,
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
