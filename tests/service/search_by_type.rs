use stockpile::esi::assets::AssetOwner;
use stockpile_test_utils::prelude::*;
use tempfile::TempDir;

use crate::util::owner_services;

const CHARACTER_ID: i64 = 2114794365;
const JITA_STATION: i64 = 60003760;

/// Expect one path per matching item, from its root down to the match
#[tokio::test]
async fn finds_items_in_containers() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_reference_tables()
        .with_mock_station(
            JITA_STATION,
            30000142,
            "Jita IV - Moon 4 - Caldari Navy Assembly Plant",
        )
        .with_character_assets_endpoint(
            CHARACTER_ID,
            vec![vec![
                factory::mock_asset(1, JITA_STATION, 17366),
                factory::mock_asset_stack(2, 1, 34, 500),
                factory::mock_asset_stack(3, JITA_STATION, 34, 100),
                factory::mock_asset_stack(4, JITA_STATION, 35, 100),
            ]],
            1,
        )
        .build()
        .await?;
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CHARACTER_ID]).await;

    let paths = services
        .search_by_type(AssetOwner::character(CHARACTER_ID), &[34])
        .await
        .unwrap();

    let item_ids: Vec<Vec<i64>> = paths
        .iter()
        .map(|path| path.nodes.iter().map(|node| node.asset.item_id).collect())
        .collect();
    assert_eq!(item_ids, vec![vec![1, 2], vec![3]]);
    assert!(paths.iter().all(|path| path.location_id == JITA_STATION));
    test.assert_mocks();

    Ok(())
}
