//! Data access layer repositories.
//!
//! Read access to the static EVE reference tables the location resolver relies on.

pub mod eve;
