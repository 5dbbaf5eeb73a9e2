use serde::{Deserialize, Serialize};

use crate::error::location::LocationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// NPC station
    Station,
    /// Player-owned Upwell structure
    Structure,
    Unknown,
}

/// Solar system context from the static reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub system_id: i64,
    pub system_name: String,
    pub region_name: String,
    pub security: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationInfo {
    #[serde(default)]
    pub station_id: i64,
    pub name: String,
    pub system_id: i64,
    pub type_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructureInfo {
    pub name: String,
    pub owner_id: i64,
    pub solar_system_id: i64,
    #[serde(default)]
    pub type_id: Option<i64>,
}

/// What a successful resolution strategy learned about a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub kind: LocationKind,
    pub name: String,
    pub solar_system_id: i64,
    pub type_id: Option<i64>,
}

impl From<StationInfo> for ResolvedLocation {
    fn from(station: StationInfo) -> Self {
        Self {
            kind: LocationKind::Station,
            name: station.name,
            solar_system_id: station.system_id,
            type_id: Some(station.type_id),
        }
    }
}

impl From<StructureInfo> for ResolvedLocation {
    fn from(structure: StructureInfo) -> Self {
        Self {
            kind: LocationKind::Structure,
            name: structure.name,
            solar_system_id: structure.solar_system_id,
            type_id: structure.type_id,
        }
    }
}

/// A distinct root container observed in one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootLocation {
    pub location_id: i64,
    pub kind: LocationKind,
    pub name: Option<String>,
    pub solar_system: Option<SystemInfo>,
    /// Type ID of the station or structure, used for its icon
    pub type_id: Option<i64>,
    pub error: Option<LocationError>,
    pub item_count: usize,
}

impl RootLocation {
    pub fn unknown(location_id: i64, error: LocationError) -> Self {
        Self {
            location_id,
            kind: LocationKind::Unknown,
            name: None,
            solar_system: None,
            type_id: None,
            error: Some(error),
            item_count: 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.kind != LocationKind::Unknown
    }

    pub fn is_kind(&self, kind: LocationKind) -> bool {
        self.kind == kind
    }
}
