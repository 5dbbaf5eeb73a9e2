pub use sea_orm_migration::prelude::*;

mod m20251101_000001_eve_solar_system;
mod m20251101_000002_eve_station;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_eve_solar_system::Migration),
            Box::new(m20251101_000002_eve_station::Migration),
        ]
    }
}
