use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub struct StationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_all(&self) -> Result<Vec<entity::eve_station::Model>, DbErr> {
        entity::prelude::EveStation::find()
            .order_by_asc(entity::eve_station::Column::StationId)
            .all(self.db)
            .await
    }

    /// Get all stations located in a solar system
    pub async fn get_by_system_id(
        &self,
        system_id: i64,
    ) -> Result<Vec<entity::eve_station::Model>, DbErr> {
        entity::prelude::EveStation::find()
            .filter(entity::eve_station::Column::SystemId.eq(system_id))
            .order_by_asc(entity::eve_station::Column::StationId)
            .all(self.db)
            .await
    }
}
