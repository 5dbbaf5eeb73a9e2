//! Shared setup for integration tests.

use std::sync::Arc;

use stockpile::{
    cache::{AssetCache, CacheConfig},
    esi::EsiClient,
    reference::{ReferenceCatalog, ReferenceStore},
    service::{asset::config::AssetServiceConfig, owners::OwnerServices},
    util::time::SystemClock,
};
use stockpile_test_utils::prelude::*;
use tempfile::TempDir;

/// ESI client pointed at the mock server with the test token registered for `owner_ids`.
pub async fn esi_client(test: &TestContext, owner_ids: &[i64]) -> EsiClient {
    let client = EsiClient::builder()
        .esi_url(&test.esi_url())
        .user_agent(TEST_USER_AGENT)
        .build()
        .unwrap();

    for owner_id in owner_ids {
        client.set_access_token(*owner_id, TEST_ACCESS_TOKEN).await;
    }

    client
}

/// Asset services over the test database's reference tables with snapshots in `dir`.
///
/// Pages are fetched one at a time so every requested page is predictable.
pub async fn owner_services(test: &TestContext, dir: &TempDir, owner_ids: &[i64]) -> OwnerServices {
    let reference: Arc<dyn ReferenceStore> =
        Arc::new(ReferenceCatalog::load(&test.db).await.unwrap());
    let cache = AssetCache::new(CacheConfig::new(dir.path()), Arc::new(SystemClock));

    OwnerServices::new(
        esi_client(test, owner_ids).await,
        reference,
        cache,
        AssetServiceConfig::new(1, 2),
    )
}
