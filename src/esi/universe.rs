//! Universe endpoints used to identify root locations.

use crate::{
    error::{esi::EsiError, Error},
    esi::{
        source::{StationLookup, StructureLookup},
        EsiClient,
    },
    model::location::{StationInfo, StructureInfo},
};

impl EsiClient {
    /// Fetch public information of an NPC station.
    pub async fn fetch_station(&self, station_id: i64) -> Result<Option<StationInfo>, EsiError> {
        let endpoint = format!("/universe/stations/{}/", station_id);

        let station: Option<StationInfo> = self.get_optional(&endpoint, None).await?;

        Ok(station.map(|mut station| {
            station.station_id = station_id;
            station
        }))
    }

    /// Fetch a player structure as seen by `owner_id`.
    ///
    /// Requires the owner's bearer token; ESI answers 403 when the owner has no docking access.
    pub async fn fetch_structure(
        &self,
        structure_id: i64,
        owner_id: i64,
    ) -> Result<Option<StructureInfo>, EsiError> {
        let endpoint = format!("/universe/structures/{}/", structure_id);

        self.get_optional(&endpoint, Some(owner_id)).await
    }
}

impl StationLookup for EsiClient {
    async fn station(&self, location_id: i64) -> Result<Option<StationInfo>, Error> {
        Ok(self.fetch_station(location_id).await?)
    }
}

impl StructureLookup for EsiClient {
    async fn structure(
        &self,
        location_id: i64,
        owner_id: i64,
    ) -> Result<Option<StructureInfo>, Error> {
        Ok(self.fetch_structure(location_id, owner_id).await?)
    }
}
