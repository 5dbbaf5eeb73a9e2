//! End-to-end aggregation against the mock ESI server and SQLite reference tables.

use stockpile::{esi::assets::AssetOwner, model::location::LocationKind};
use stockpile_test_utils::{fixtures::eve::mockito::character_assets_path, prelude::*};
use tempfile::TempDir;

use crate::util::owner_services;

const CHARACTER_ID: i64 = 2114794365;
const CORPORATION_ID: i64 = 98000001;
const JITA_STATION: i64 = 60003760;
const PERIMETER_KEEPSTAR: i64 = 1_022_734_985_679;

/// A freighter in Jita 4-4 holding a named container of Tritanium, and a ship in a Keepstar.
async fn character_setup() -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_reference_tables()
        .with_mock_solar_system(30000142, "Jita")
        .with_mock_solar_system(30000144, "Perimeter")
        .with_mock_station(
            JITA_STATION,
            30000142,
            "Jita IV - Moon 4 - Caldari Navy Assembly Plant",
        )
        .with_character_assets_endpoint(
            CHARACTER_ID,
            vec![
                vec![
                    factory::mock_asset(1, JITA_STATION, 20185),
                    factory::mock_asset(2, 1, 17366),
                ],
                vec![
                    factory::mock_asset_stack(3, 2, 34, 120000),
                    factory::mock_asset(4, PERIMETER_KEEPSTAR, 587),
                ],
            ],
            1,
        )
        .with_structure_endpoint(
            PERIMETER_KEEPSTAR,
            factory::mock_structure(30000144, "Perimeter - Tranquility Trading Tower"),
            1,
        )
        .with_character_asset_names_endpoint(CHARACTER_ID, vec![(2, "Minerals")], 1)
        .build()
        .await
}

/// Expect the full forest, resolved and sorted locations, and container names
#[tokio::test]
async fn aggregates_character_assets() -> Result<(), TestError> {
    let test = character_setup().await?;
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CHARACTER_ID]).await;

    let inventory = services
        .get_aggregated_assets(AssetOwner::character(CHARACTER_ID), false)
        .await
        .unwrap();

    assert_eq!(inventory.item_count(), 4);
    assert_eq!(inventory.forest.len(), 2);
    let container = &inventory.forest[0].children[0];
    assert_eq!(container.name.as_deref(), Some("Minerals"));
    assert_eq!(container.children[0].asset.quantity, 120000);

    let locations: Vec<(i64, usize)> = inventory
        .locations
        .iter()
        .map(|location| (location.location_id, location.item_count))
        .collect();
    assert_eq!(locations, vec![(JITA_STATION, 3), (PERIMETER_KEEPSTAR, 1)]);
    assert_eq!(inventory.locations[0].kind, LocationKind::Station);
    assert_eq!(inventory.locations[1].kind, LocationKind::Structure);
    assert!(inventory.locations.iter().all(|location| location.error.is_none()));

    test.assert_mocks();

    Ok(())
}

/// Expect a second read within the TTL to be served without calling ESI again
#[tokio::test]
async fn serves_second_read_from_cache() -> Result<(), TestError> {
    let test = character_setup().await?;
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CHARACTER_ID]).await;
    let owner = AssetOwner::character(CHARACTER_ID);

    let first = services.get_aggregated_assets(owner, false).await.unwrap();
    let second = services.get_aggregated_assets(owner, false).await.unwrap();

    assert_eq!(first, second);
    assert!(dir
        .path()
        .join(format!("assets_{}.json", CHARACTER_ID))
        .exists());
    test.assert_mocks();

    Ok(())
}

/// Expect corporations to be fetched from the corporation endpoints
#[tokio::test]
async fn aggregates_corporation_assets() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_reference_tables()
        .with_mock_station(
            JITA_STATION,
            30000142,
            "Jita IV - Moon 4 - Caldari Navy Assembly Plant",
        )
        .with_corporation_assets_endpoint(
            CORPORATION_ID,
            vec![vec![factory::mock_asset_stack(1, JITA_STATION, 34, 1000)]],
            1,
        )
        .build()
        .await?;
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CORPORATION_ID]).await;

    let inventory = services
        .get_aggregated_assets(AssetOwner::corporation(CORPORATION_ID), false)
        .await
        .unwrap();

    assert_eq!(inventory.item_count(), 1);
    assert_eq!(inventory.locations[0].location_id, JITA_STATION);
    test.assert_mocks();

    Ok(())
}

/// Expect a failed page to fail the read and leave nothing cached
#[tokio::test]
async fn failed_page_is_not_cached() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_reference_tables().build().await?;
    let mock = test.eve().create_error_endpoint(
        "GET",
        &character_assets_path(CHARACTER_ID),
        403,
        1,
    );
    let dir = TempDir::new().unwrap();
    let services = owner_services(&test, &dir, &[CHARACTER_ID]).await;

    let result = services
        .get_aggregated_assets(AssetOwner::character(CHARACTER_ID), false)
        .await;

    assert!(result.is_err());
    assert!(!dir
        .path()
        .join(format!("assets_{}.json", CHARACTER_ID))
        .exists());
    mock.assert();

    Ok(())
}
