//! Utility functions and helpers.
//!
//! Clock abstraction used for cache TTL decisions and EVE Online / ESI constants.

pub mod eve;
pub mod time;
