//! EVE Online static reference data repositories.
//!
//! Solar systems and NPC stations change only with game expansions; they are loaded once at
//! startup into the in-memory [`ReferenceCatalog`](crate::reference::ReferenceCatalog).

pub mod solar_system;
pub mod station;
