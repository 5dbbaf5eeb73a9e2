use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub struct SolarSystemRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SolarSystemRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get every solar system ordered by EVE system ID
    pub async fn get_all(&self) -> Result<Vec<entity::eve_solar_system::Model>, DbErr> {
        entity::prelude::EveSolarSystem::find()
            .order_by_asc(entity::eve_solar_system::Column::SystemId)
            .all(self.db)
            .await
    }

    /// Get a solar system using its EVE Online system ID
    pub async fn get_by_system_id(
        &self,
        system_id: i64,
    ) -> Result<Option<entity::eve_solar_system::Model>, DbErr> {
        entity::prelude::EveSolarSystem::find()
            .filter(entity::eve_solar_system::Column::SystemId.eq(system_id))
            .one(self.db)
            .await
    }
}
