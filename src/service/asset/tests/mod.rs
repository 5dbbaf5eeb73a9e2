
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use super::*;
use crate::{
    cache::CacheConfig,
    error::esi::EsiError,
    model::{asset::Asset, location::LocationKind},
    service::retry::RetryPolicy,
    util::{
        test::{
            asset, mock_resolver, numbered_assets, MockAssetSource, MockNameLookup,
            MockStationLookup, MockStructureLookup, JITA,
        },
        time::ManualClock,
    },
};

const OWNER_ID: i64 = 2114794365;

/// Station holding the root of [`single_child_assets`]
const STATION_ID: i64 = 100;
const CONTAINER_TYPE_ID: i64 = 17366;
const TRITANIUM_TYPE_ID: i64 = 34;

/// Service wired to in-process fakes, a temporary snapshot directory and a manual clock.
struct Harness {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    source: MockAssetSource,
    structures: MockStructureLookup,
    service: AssetService<MockAssetSource, MockNameLookup>,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()
}

/// A container in station 100 holding one stack.
fn single_child_assets() -> Vec<Asset> {
    vec![
        asset(1, STATION_ID, CONTAINER_TYPE_ID),
        asset(2, 1, TRITANIUM_TYPE_ID),
    ]
}

fn jita_station() -> MockStationLookup {
    MockStationLookup::default().with_station(STATION_ID, "Jita IV - Moon 4", JITA)
}

fn harness(
    source: MockAssetSource,
    names: MockNameLookup,
    stations: MockStationLookup,
    structures: MockStructureLookup,
) -> Harness {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(start()));

    // Memory residency outlives the TTL so stale reads never touch the disk.
    let cache = AssetCache::new(
        CacheConfig::new(dir.path()).with_memory_ttl(Duration::hours(2)),
        clock.clone(),
    );
    let config =
        AssetServiceConfig::default().with_retry(RetryPolicy::new(2, StdDuration::from_millis(1)));
    let service = AssetService::new(
        source.clone(),
        names,
        mock_resolver(stations, structures.clone()),
        cache,
        config,
    );

    Harness {
        _dir: dir,
        clock,
        source,
        structures,
        service,
    }
}

fn single_child_harness() -> Harness {
    harness(
        MockAssetSource::paged(single_child_assets(), 1000),
        MockNameLookup::default(),
        jita_station(),
        MockStructureLookup::default(),
    )
}
