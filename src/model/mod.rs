//! Domain models shared by the fetcher, tree builder, resolver and cache.

pub mod asset;
pub mod location;
