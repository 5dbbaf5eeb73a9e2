//! ESI response bodies with standard test values.

use serde_json::{json, Value};

/// Region every mock solar system is placed in.
pub const MOCK_REGION_ID: i64 = 10000002;
pub const MOCK_REGION_NAME: &str = "The Forge";

/// Create a mock asset record as served by the assets endpoints.
///
/// The item is an unpackaged singleton in a hangar; use [`mock_asset_stack`] for stacks.
///
/// # Arguments
/// - `item_id` - Unique item ID
/// - `location_id` - Station, structure or containing item ID
/// - `type_id` - Item type ID
pub fn mock_asset(item_id: i64, location_id: i64, type_id: i64) -> Value {
    json!({
        "is_singleton": true,
        "item_id": item_id,
        "location_flag": "Hangar",
        "location_id": location_id,
        "location_type": "item",
        "quantity": 1,
        "type_id": type_id
    })
}

/// Create a mock stack of `quantity` packaged items.
pub fn mock_asset_stack(item_id: i64, location_id: i64, type_id: i64, quantity: i32) -> Value {
    json!({
        "is_singleton": false,
        "item_id": item_id,
        "location_flag": "Hangar",
        "location_id": location_id,
        "location_type": "station",
        "quantity": quantity,
        "type_id": type_id
    })
}

/// Create a mock NPC station as served by `/universe/stations/{station_id}/`.
pub fn mock_station(system_id: i64, name: &str) -> Value {
    json!({
        "max_dockable_ship_volume": 50000000.0,
        "name": name,
        "office_rental_cost": 10000.0,
        "owner": 1000035,
        "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
        "race_id": 1,
        "reprocessing_efficiency": 0.5,
        "reprocessing_stations_take": 0.05,
        "services": ["market", "repair-facilities"],
        "system_id": system_id,
        "type_id": 1529
    })
}

/// Create a mock player structure as served by `/universe/structures/{structure_id}/`.
pub fn mock_structure(system_id: i64, name: &str) -> Value {
    json!({
        "name": name,
        "owner_id": 98000001,
        "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
        "solar_system_id": system_id,
        "type_id": 35834
    })
}
