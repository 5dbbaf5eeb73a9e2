//! Tests for the ESI station and structure endpoints.

use stockpile::{
    error::{esi::EsiError, Error},
    esi::source::{StationLookup, StructureLookup},
};
use stockpile_test_utils::prelude::*;

use crate::util::esi_client;

const CHARACTER_ID: i64 = 2114794365;
const PERIMETER_KEEPSTAR: i64 = 1_022_734_985_679;

/// Expect station information with the requested station ID attached
#[tokio::test]
async fn fetches_station() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_station_endpoint(
            60003760,
            factory::mock_station(30000142, "Jita IV - Moon 4 - Caldari Navy Assembly Plant"),
            1,
        )
        .build()
        .await?;
    let client = esi_client(&test, &[]).await;

    let station = client.station(60003760).await.unwrap().unwrap();

    assert_eq!(station.station_id, 60003760);
    assert_eq!(station.system_id, 30000142);
    assert_eq!(station.name, "Jita IV - Moon 4 - Caldari Navy Assembly Plant");
    test.assert_mocks();

    Ok(())
}

/// Expect an unknown station to be a miss rather than an error
#[tokio::test]
async fn missing_station_is_none() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test
        .eve()
        .create_error_endpoint("GET", "/universe/stations/60000001/", 404, 1);
    let client = esi_client(&test, &[]).await;

    let station = client.station(60000001).await;

    assert!(matches!(station, Ok(None)));
    mock.assert();

    Ok(())
}

/// Expect server errors to keep their status for retry classification
#[tokio::test]
async fn station_server_error_keeps_status() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test
        .eve()
        .create_error_endpoint("GET", "/universe/stations/60003760/", 503, 1);
    let client = esi_client(&test, &[]).await;

    let station = client.station(60003760).await;

    assert!(matches!(
        station,
        Err(Error::EsiError(EsiError::Status { status: 503, .. }))
    ));
    mock.assert();

    Ok(())
}

/// Expect structure information fetched with the owner's token
#[tokio::test]
async fn fetches_structure() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_structure_endpoint(
            PERIMETER_KEEPSTAR,
            factory::mock_structure(30000144, "Perimeter - Tranquility Trading Tower"),
            1,
        )
        .build()
        .await?;
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let structure = client
        .structure(PERIMETER_KEEPSTAR, CHARACTER_ID)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(structure.name, "Perimeter - Tranquility Trading Tower");
    assert_eq!(structure.solar_system_id, 30000144);
    assert_eq!(structure.type_id, Some(35834));
    test.assert_mocks();

    Ok(())
}

/// Expect 403 to be reported for an owner without docking access
#[tokio::test]
async fn forbidden_structure() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let mock = test.eve().create_error_endpoint(
        "GET",
        &format!("/universe/structures/{}/", PERIMETER_KEEPSTAR),
        403,
        1,
    );
    let client = esi_client(&test, &[CHARACTER_ID]).await;

    let structure = client.structure(PERIMETER_KEEPSTAR, CHARACTER_ID).await;

    assert!(matches!(
        structure,
        Err(Error::EsiError(EsiError::Status { status: 403, .. }))
    ));
    mock.assert();

    Ok(())
}
