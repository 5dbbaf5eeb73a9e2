use std::sync::Arc;

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::{
    cache::AssetCache,
    config::Config,
    error::Error,
    esi::EsiClient,
    reference::{ReferenceCatalog, ReferenceStore},
    service::owners::OwnerServices,
    util::time::SystemClock,
};

/// Build the ESI client and register the configured access token for every owner
pub async fn build_esi_client(config: &Config) -> Result<EsiClient, Error> {
    let esi_client = EsiClient::builder()
        .esi_url(&config.esi_url)
        .user_agent(&config.user_agent)
        .build()?;

    if let Some(token) = &config.esi_access_token {
        for owner in &config.owners {
            esi_client.set_access_token(owner.owner_id, token.clone()).await;
        }
    }

    Ok(esi_client)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Load the solar system and station reference catalog
pub async fn load_reference_catalog(db: &DatabaseConnection) -> Result<Arc<dyn ReferenceStore>, Error> {
    let catalog = ReferenceCatalog::load(db).await?;

    if catalog.system_count() == 0 {
        tracing::warn!(
            "Reference catalog has no solar systems, every location will report an unknown system"
        );
    }

    Ok(Arc::new(catalog))
}

/// Build the character and corporation asset services over a shared cache
pub fn build_asset_services(
    config: &Config,
    esi_client: EsiClient,
    reference: Arc<dyn ReferenceStore>,
) -> OwnerServices {
    let cache = AssetCache::new(config.cache.clone(), Arc::new(SystemClock));

    OwnerServices::new(esi_client, reference, cache, config.service.clone())
}

/// Aggregate every configured owner once so the first reads are served from cache
///
/// Failures are logged; the scheduler retries the affected owners on its next run.
pub async fn warm_asset_cache(config: &Config, services: &OwnerServices) {
    for owner in &config.owners {
        match services.get_aggregated_assets(*owner, false).await {
            Ok(inventory) => tracing::info!(
                "Warmed asset cache for owner {} ({} items)",
                owner.owner_id,
                inventory.item_count()
            ),
            Err(e) => tracing::error!(
                "Failed to warm asset cache for owner {}: {}",
                owner.owner_id,
                e
            ),
        }
    }
}
