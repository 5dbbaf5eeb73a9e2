use stockpile::{cache::CacheLookup, esi::assets::AssetOwner, scheduler::cache::prune_asset_snapshots};
use stockpile_test_utils::prelude::*;
use tempfile::TempDir;

use super::CHARACTER_ID;
use crate::util::owner_services;

/// Expect nothing to be pruned while snapshots are within retention
#[tokio::test]
async fn keeps_recent_snapshots() -> Result<(), TestError> {
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
    let owner = AssetOwner::character(CHARACTER_ID);
    services.get_aggregated_assets(owner, false).await.unwrap();

    let pruned = prune_asset_snapshots(services.clone(), vec![owner].into())
        .await
        .unwrap();

    assert_eq!(pruned, 0);
    assert!(matches!(
        services.cache().lookup(CHARACTER_ID).await,
        CacheLookup::Fresh(_)
    ));
    test.assert_mocks();

    Ok(())
}
