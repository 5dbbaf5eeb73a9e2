//! Reference data database insertion utilities.

use entity::{eve_solar_system, eve_station};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    error::TestError,
    fixtures::eve::{
        factory::{MOCK_REGION_ID, MOCK_REGION_NAME},
        EveFixtures,
    },
};

impl<'a> EveFixtures<'a> {
    /// Insert a mock solar system into the database.
    ///
    /// The system is placed in The Forge with high security status. If a system with the
    /// specified ID already exists, returns the existing record instead of creating a duplicate.
    ///
    /// # Arguments
    /// - `system_id` - The EVE Online solar system ID to insert
    /// - `name` - Solar system name
    ///
    /// # Returns
    /// - `Ok(eve_solar_system::Model)` - The created or existing solar system record
    /// - `Err(TestError::DbErr)` - Database query or insert operation failed
    pub async fn insert_mock_solar_system(
        &self,
        system_id: i64,
        name: &str,
    ) -> Result<eve_solar_system::Model, TestError> {
        self.insert_mock_solar_system_in_region(system_id, name, MOCK_REGION_ID, MOCK_REGION_NAME)
            .await
    }

    /// Insert a mock solar system into the given region.
    pub async fn insert_mock_solar_system_in_region(
        &self,
        system_id: i64,
        name: &str,
        region_id: i64,
        region_name: &str,
    ) -> Result<eve_solar_system::Model, TestError> {
        if let Some(existing) = entity::prelude::EveSolarSystem::find()
            .filter(eve_solar_system::Column::SystemId.eq(system_id))
            .one(&self.setup.db)
            .await?
        {
            return Ok(existing);
        }

        Ok(
            entity::prelude::EveSolarSystem::insert(eve_solar_system::ActiveModel {
                system_id: ActiveValue::Set(system_id),
                name: ActiveValue::Set(name.to_string()),
                region_id: ActiveValue::Set(region_id),
                region_name: ActiveValue::Set(region_name.to_string()),
                security_status: ActiveValue::Set(0.9459),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a mock NPC station into the database.
    ///
    /// The station's solar system is created in The Forge if it doesn't exist.
    ///
    /// # Arguments
    /// - `station_id` - The EVE Online station ID to insert
    /// - `system_id` - Solar system the station is in
    /// - `name` - Station name
    ///
    /// # Returns
    /// - `Ok(eve_station::Model)` - The created or existing station record
    /// - `Err(TestError::DbErr)` - Database query or insert operation failed
    pub async fn insert_mock_station(
        &self,
        station_id: i64,
        system_id: i64,
        name: &str,
    ) -> Result<eve_station::Model, TestError> {
        if let Some(existing) = entity::prelude::EveStation::find()
            .filter(eve_station::Column::StationId.eq(station_id))
            .one(&self.setup.db)
            .await?
        {
            return Ok(existing);
        }

        if entity::prelude::EveSolarSystem::find()
            .filter(eve_solar_system::Column::SystemId.eq(system_id))
            .one(&self.setup.db)
            .await?
            .is_none()
        {
            self.insert_mock_solar_system(system_id, &format!("System {}", system_id))
                .await?;
        }

        Ok(
            entity::prelude::EveStation::insert(eve_station::ActiveModel {
                station_id: ActiveValue::Set(station_id),
                name: ActiveValue::Set(name.to_string()),
                system_id: ActiveValue::Set(system_id),
                type_id: ActiveValue::Set(52678),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
