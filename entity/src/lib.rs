//! SeaORM entities for the static EVE Online reference data Stockpile reads.

pub mod prelude;

pub mod eve_solar_system;
pub mod eve_station;
