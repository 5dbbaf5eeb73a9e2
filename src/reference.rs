//! Static reference data: solar systems and NPC stations.
//!
//! The location resolver only ever asks synchronous point questions of this data, so it is
//! loaded from the database once and served from memory.

use std::collections::HashMap;

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::{
    data::eve::{solar_system::SolarSystemRepository, station::StationRepository},
    error::Error,
    model::location::{StationInfo, SystemInfo},
};

/// Read-only lookup of static reference data.
pub trait ReferenceStore: Send + Sync {
    fn system_info(&self, system_id: i64) -> Option<SystemInfo>;

    /// NPC station from the local catalog, if known.
    fn station(&self, station_id: i64) -> Option<StationInfo>;
}

/// In-memory reference catalog.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    systems: HashMap<i64, SystemInfo>,
    stations: HashMap<i64, StationInfo>,
}

impl ReferenceCatalog {
    pub fn new(
        systems: impl IntoIterator<Item = SystemInfo>,
        stations: impl IntoIterator<Item = StationInfo>,
    ) -> Self {
        Self {
            systems: systems
                .into_iter()
                .map(|system| (system.system_id, system))
                .collect(),
            stations: stations
                .into_iter()
                .map(|station| (station.station_id, station))
                .collect(),
        }
    }

    /// Load the full catalog from the reference tables.
    pub async fn load(db: &DatabaseConnection) -> Result<Self, Error> {
        let systems = SolarSystemRepository::new(db).get_all().await?;
        let stations = StationRepository::new(db).get_all().await?;

        let catalog = Self::new(
            systems.into_iter().map(SystemInfo::from),
            stations.into_iter().map(StationInfo::from),
        );

        tracing::info!(
            "Loaded reference catalog with {} solar systems and {} stations",
            catalog.systems.len(),
            catalog.stations.len()
        );

        Ok(catalog)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl ReferenceStore for ReferenceCatalog {
    fn system_info(&self, system_id: i64) -> Option<SystemInfo> {
        self.systems.get(&system_id).cloned()
    }

    fn station(&self, station_id: i64) -> Option<StationInfo> {
        self.stations.get(&station_id).cloned()
    }
}

impl From<entity::eve_solar_system::Model> for SystemInfo {
    fn from(model: entity::eve_solar_system::Model) -> Self {
        Self {
            system_id: model.system_id,
            system_name: model.name,
            region_name: model.region_name,
            security: model.security_status,
        }
    }
}

impl From<entity::eve_station::Model> for StationInfo {
    fn from(model: entity::eve_station::Model) -> Self {
        Self {
            station_id: model.station_id,
            name: model.name,
            system_id: model.system_id,
            type_id: model.type_id,
        }
    }
}
