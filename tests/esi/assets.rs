//! Tests for the ESI asset and asset name endpoints.

use stockpile::{
    error::{esi::EsiError, Error},
    esi::{assets::OwnerKind, source::AssetPage},
};
use stockpile_test_utils::{fixtures::eve::mockito::character_assets_path, prelude::*};

use crate::util::esi_client;

const CHARACTER_ID: i64 = 2114794365;

/// Expect the page's records along with the reported page count
#[tokio::test]
async fn fetches_asset_page() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_asset_page_endpoint(
        &character_assets_path(CHARACTER_ID),
        2,
        vec![
            factory::mock_asset(3, 60003760, 670),
            factory::mock_asset_stack(4, 60003760, 34, 5000),
        ],
        2,
        1,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let page = client
        .fetch_asset_page(OwnerKind::Character, CHARACTER_ID, 2)
        .await
        .unwrap();

    match page {
        AssetPage::Assets {
            assets,
            total_pages,
        } => {
            assert_eq!(assets.len(), 2);
            assert_eq!(assets[0].item_id, 3);
            assert_eq!(assets[1].quantity, 5000);
            assert_eq!(total_pages, Some(2));
        }
        AssetPage::PageNotExist => panic!("expected assets"),
    }
    mock.assert();

    Ok(())
}

/// Expect ESI's "page does not exist" 404 to end pagination rather than fail
#[tokio::test]
async fn reports_page_not_exist() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_asset_page_not_exist_endpoint(
        &character_assets_path(CHARACTER_ID),
        3,
        1,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let page = client
        .fetch_asset_page(OwnerKind::Character, CHARACTER_ID, 3)
        .await
        .unwrap();

    assert!(matches!(page, AssetPage::PageNotExist));
    mock.assert();

    Ok(())
}

/// Expect any other 404 to be reported as a status error
#[tokio::test]
async fn other_not_found_is_an_error() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_error_endpoint(
        "GET",
        &character_assets_path(CHARACTER_ID),
        404,
        1,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let result = client
        .fetch_asset_page(OwnerKind::Character, CHARACTER_ID, 1)
        .await;

    assert!(matches!(
        result,
        Err(Error::EsiError(EsiError::Status { status: 404, .. }))
    ));
    mock.assert();

    Ok(())
}

/// Expect a body that doesn't match the asset schema to fail decoding
#[tokio::test]
async fn rejects_undecodable_page() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_mock_endpoint(|server| {
            server
                .mock("GET", character_assets_path(CHARACTER_ID).as_str())
                .match_query(mockito::Matcher::Any)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"[{"item_id": "not a number"}]"#)
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let result = client
        .fetch_asset_page(OwnerKind::Character, CHARACTER_ID, 1)
        .await;

    assert!(matches!(
        result,
        Err(Error::EsiError(EsiError::Decode { .. }))
    ));
    test.assert_mocks();

    Ok(())
}

/// Expect owner endpoints to fail without a registered token and without sending a request
#[tokio::test]
async fn requires_access_token() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_character_assets_endpoint(
            CHARACTER_ID,
            vec![vec![factory::mock_asset(1, 60003760, 670)]],
            0,
        )
        .build()
        .await?;
    let client = esi_client(&test, &[]).await;

    let result = client
        .fetch_asset_page(OwnerKind::Character, CHARACTER_ID, 1)
        .await;

    assert!(matches!(
        result,
        Err(Error::EsiError(EsiError::MissingAccessToken(CHARACTER_ID)))
    ));
    test.assert_mocks();

    Ok(())
}

/// Expect names keyed by item ID
#[tokio::test]
async fn fetches_asset_names() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_asset_names_endpoint(
        &character_assets_path(CHARACTER_ID),
        &[(1, "Jump Freighter"), (2, "None")],
        1,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let names = client
        .fetch_asset_names(OwnerKind::Character, CHARACTER_ID, &[1, 2])
        .await
        .unwrap();

    assert_eq!(names.len(), 2);
    assert_eq!(names[&1], "Jump Freighter");
    mock.assert();

    Ok(())
}

/// Expect batches ESI would reject to fail before any request is sent
#[tokio::test]
async fn rejects_unencodable_name_batches() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_asset_names_endpoint(
        &character_assets_path(CHARACTER_ID),
        &[],
        0,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let empty = client
        .fetch_asset_names(OwnerKind::Character, CHARACTER_ID, &[])
        .await;
    let oversized_ids: Vec<i64> = (1..=1001).collect();
    let oversized = client
        .fetch_asset_names(OwnerKind::Character, CHARACTER_ID, &oversized_ids)
        .await;

    assert!(matches!(empty, Err(Error::InvalidInput(_))));
    assert!(matches!(oversized, Err(Error::InvalidInput(_))));
    mock.assert();

    Ok(())
}
