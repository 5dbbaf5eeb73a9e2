//! Cache maintenance jobs.

use std::sync::Arc;

use dioxus_logger::tracing;

use crate::{
    cache::CacheLookup, error::Error, esi::assets::AssetOwner, service::owners::OwnerServices,
};

/// Deletes asset snapshots older than the configured disk retention.
///
/// # Returns
/// - `Ok(usize)` - Number of snapshots deleted
/// - `Err(Error)` - The snapshot directory could not be listed
pub async fn prune_asset_snapshots(
    services: OwnerServices,
    _owners: Arc<[AssetOwner]>,
) -> Result<usize, Error> {
    services.cache().prune_disk().await
}

/// Starts a background refresh for every configured owner without a fresh cache entry.
///
/// Owners with a refresh already in flight are skipped; the running refresh covers them.
///
/// # Returns
/// - `Ok(usize)` - Number of refreshes started
pub async fn refresh_stale_owners(
    services: OwnerServices,
    owners: Arc<[AssetOwner]>,
) -> Result<usize, Error> {
    let mut started = 0;

    for owner in owners.iter() {
        if let CacheLookup::Fresh(_) = services.cache().lookup(owner.owner_id).await {
            continue;
        }

        if services.spawn_refresh(*owner) {
            started += 1;
        } else {
            tracing::debug!("Refresh of owner {} still running", owner.owner_id);
        }
    }

    Ok(started)
}
