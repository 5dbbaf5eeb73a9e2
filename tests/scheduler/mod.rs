//! Tests for the cache maintenance jobs.

mod prune_asset_snapshots;
mod refresh_stale_owners;

const CHARACTER_ID: i64 = 2114794365;
