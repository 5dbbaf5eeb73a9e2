//! Asset aggregation and location resolution for EVE Online characters and corporations.
//!
//! Stockpile pulls an owner's paginated asset records from ESI, rebuilds the containment
//! forest (ships, containers and what they hold), resolves every top-level location against
//! static reference data and ESI, and serves the result from a tiered memory and disk cache.
//!
//! The entry point is [`service::asset::AssetService`]; [`service::owners::OwnerServices`]
//! routes characters and corporations to their respective endpoints.

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod esi;
pub mod model;
pub mod reference;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
