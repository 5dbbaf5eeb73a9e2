use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a root location could not be resolved.
///
/// Stored on the affected [`RootLocation`](crate::model::location::RootLocation) and persisted
/// with the cache snapshot, so it must stay serializable. It is never fatal to an aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    #[error("Location {0} was not found as a station or structure")]
    NotFound(i64),
    #[error("Owner is not allowed to view structure {0}")]
    Forbidden(i64),
    #[error("Solar system {system_id} of location {location_id} is missing from the reference catalog")]
    UnknownSolarSystem { location_id: i64, system_id: i64 },
    #[error("Lookup of location {location_id} failed: {reason}")]
    Upstream { location_id: i64, reason: String },
}
