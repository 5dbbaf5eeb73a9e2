use sea_orm_migration::{prelude::*, schema::*};

static IDX_EVE_STATION_SYSTEM_ID: &str = "idx-eve_station-system_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EveStation::Table)
                    .if_not_exists()
                    .col(pk_auto(EveStation::Id))
                    .col(big_integer_uniq(EveStation::StationId))
                    .col(string(EveStation::Name))
                    .col(big_integer(EveStation::SystemId))
                    .col(big_integer(EveStation::TypeId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVE_STATION_SYSTEM_ID)
                    .table(EveStation::Table)
                    .col(EveStation::SystemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EveStation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EveStation {
    Table,
    Id,
    StationId,
    Name,
    SystemId,
    TypeId,
}
