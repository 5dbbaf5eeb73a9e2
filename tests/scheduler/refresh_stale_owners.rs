use std::{sync::Arc, time::Duration};

use stockpile::{cache::CacheLookup, esi::assets::AssetOwner, scheduler::cache::refresh_stale_owners};
use stockpile_test_utils::prelude::*;
use tempfile::TempDir;

use super::CHARACTER_ID;
use crate::util::owner_services;

/// Expect a refresh to start for an owner without cached assets, and none once it is fresh
#[tokio::test]
async fn refreshes_owner_without_fresh_entry() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_reference_tables()
        .with_mock_station(60003760, 30000142, "Jita IV - Moon 4 - Caldari Navy Assembly Plant")
        .with_character_assets_endpoint(
            CHARACTER_ID,
            vec![vec![factory::mock_asset_stack(1, 60003760, 34, 1000)]],
            1,
        )
        .build()
        .await?;
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CHARACTER_ID]).await;
    let owners: Arc<[AssetOwner]> = vec![AssetOwner::character(CHARACTER_ID)].into();

    let started = refresh_stale_owners(services.clone(), Arc::clone(&owners))
        .await
        .unwrap();
    assert_eq!(started, 1);

    while services.cache().is_refreshing(CHARACTER_ID) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(matches!(
        services.cache().lookup(CHARACTER_ID).await,
        CacheLookup::Fresh(_)
    ));

    let started = refresh_stale_owners(services, owners).await.unwrap();
    assert_eq!(started, 0);
    test.assert_mocks();

    Ok(())
}
