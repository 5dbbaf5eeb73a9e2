//! Asset aggregation service.
//!
//! [`AssetService`] turns an owner's paginated asset records into an [`AssetInventory`]:
//! fetch every page, build the containment forest, resolve each distinct root location,
//! resolve container names, count items per location, sort locations and cache the result.
//! Reads are served from the tiered [`AssetCache`]; stale entries are returned immediately
//! while a single background task per owner refreshes them.

pub mod config;
pub mod fetch;
pub mod location;
pub mod names;
pub mod search;
pub mod tree;

#[cfg(test)]
mod tests;

use std::{sync::Arc, time::Instant};

use dioxus_logger::tracing;

use crate::{
    cache::{AssetCache, CacheEntry, CacheLookup},
    error::Error,
    esi::source::{AssetSource, NameLookup},
    model::{
        asset::{AssetInventory, MatchPath},
        location::RootLocation,
    },
};

use self::{
    config::AssetServiceConfig,
    fetch::AssetFetcher,
    location::{sort_locations, LocationResolver},
    names::enrich_names,
    search::find_paths,
    tree::{build_forest, count_items_by_location, root_location_ids},
};

/// Aggregates and caches the assets of characters or corporations served by one source.
pub struct AssetService<S: AssetSource, N: NameLookup> {
    inner: Arc<AssetServiceRef<S, N>>,
}

struct AssetServiceRef<S: AssetSource, N: NameLookup> {
    fetcher: AssetFetcher<S>,
    names: N,
    resolver: LocationResolver,
    cache: AssetCache,
    config: AssetServiceConfig,
}

impl<S: AssetSource, N: NameLookup> Clone for AssetService<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AssetSource, N: NameLookup> AssetService<S, N> {
    /// Creates a new instance of [`AssetService`].
    ///
    /// # Arguments
    /// - `source` - Paginated asset records of the owners this service aggregates
    /// - `names` - Lookup of player-assigned container names
    /// - `resolver` - Root location resolver
    /// - `cache` - Tiered cache shared with the scheduler
    /// - `config` - Page concurrency and retry policy
    pub fn new(
        source: S,
        names: N,
        resolver: LocationResolver,
        cache: AssetCache,
        config: AssetServiceConfig,
    ) -> Self {
        let fetcher = AssetFetcher::new(source, config.page_concurrency, config.retry);

        Self {
            inner: Arc::new(AssetServiceRef {
                fetcher,
                names,
                resolver,
                cache,
                config,
            }),
        }
    }

    pub fn cache(&self) -> &AssetCache {
        &self.inner.cache
    }

    /// Get the aggregated assets of an owner.
    ///
    /// A fresh cache entry is returned as is. A stale entry is returned as is while a
    /// background refresh is started, unless one is already running for the owner. Without
    /// a cache entry, or with `force_refresh`, the assets are aggregated before returning.
    ///
    /// # Arguments
    /// - `owner_id` - EVE character or corporation ID
    /// - `force_refresh` - Ignore the cache and aggregate now
    ///
    /// # Returns
    /// - `Ok(Arc<AssetInventory>)` - Forest and sorted root locations
    /// - `Err(Error)` - Fetching the asset records failed; any previous cache entry is kept
    pub async fn get_aggregated_assets(
        &self,
        owner_id: i64,
        force_refresh: bool,
    ) -> Result<Arc<AssetInventory>, Error> {
        if !force_refresh {
            match self.inner.cache.lookup(owner_id).await {
                CacheLookup::Fresh(entry) => {
                    tracing::debug!("Serving fresh cached assets for owner {}", owner_id);
                    return Ok(Arc::clone(&entry.inventory));
                }
                CacheLookup::Stale(entry) => {
                    tracing::debug!("Serving stale cached assets for owner {}", owner_id);
                    self.spawn_refresh(owner_id);
                    return Ok(Arc::clone(&entry.inventory));
                }
                CacheLookup::Absent => {}
            }
        }

        let entry = self.aggregate(owner_id).await?;

        Ok(Arc::clone(&entry.inventory))
    }

    /// Find every item of the requested types with the path of containers holding it.
    ///
    /// Uses the same cache as [`get_aggregated_assets`](Self::get_aggregated_assets).
    pub async fn search_by_type(
        &self,
        owner_id: i64,
        type_ids: &[i64],
    ) -> Result<Vec<MatchPath>, Error> {
        let inventory = self.get_aggregated_assets(owner_id, false).await?;

        Ok(find_paths(&inventory.forest, type_ids))
    }

    /// Resolve a single root location again, such as one previously reported unknown.
    ///
    /// When the owner's cached inventory contains the location, the cache is updated with the
    /// new resolution and the location keeps its item count.
    pub async fn resolve_location(&self, owner_id: i64, location_id: i64) -> RootLocation {
        let mut location = self.inner.resolver.resolve(location_id, owner_id).await;

        let updated = self
            .inner
            .cache
            .update(owner_id, |cached| {
                let previous = cached
                    .inventory
                    .locations
                    .iter()
                    .find(|cached| cached.location_id == location_id)?;
                location.item_count = previous.item_count;

                let mut locations: Vec<RootLocation> = cached
                    .inventory
                    .locations
                    .iter()
                    .map(|cached| {
                        if cached.location_id == location_id {
                            location.clone()
                        } else {
                            cached.clone()
                        }
                    })
                    .collect();
                sort_locations(&mut locations);

                Some(CacheEntry {
                    owner_id,
                    timestamp: cached.timestamp,
                    inventory: Arc::new(AssetInventory {
                        forest: cached.inventory.forest.clone(),
                        locations,
                    }),
                })
            })
            .await;

        if let Err(e) = updated {
            tracing::warn!(
                "Failed to persist re-resolved location {} for owner {}: {}",
                location_id,
                owner_id,
                e
            );
        }

        location
    }

    /// Drop an owner's cached assets from memory and disk.
    pub async fn clear_cache(&self, owner_id: i64) -> Result<(), Error> {
        self.inner.cache.clear(owner_id).await
    }

    /// Start a background refresh of an owner unless one is already running.
    ///
    /// Returns whether a refresh was started.
    pub fn spawn_refresh(&self, owner_id: i64) -> bool {
        let Some(guard) = self.inner.cache.begin_refresh(owner_id) else {
            tracing::debug!("Asset refresh for owner {} already running", owner_id);
            return false;
        };

        let service = self.clone();
        tokio::spawn(async move {
            let _guard = guard;

            if let CacheLookup::Fresh(_) = service.inner.cache.lookup(owner_id).await {
                return;
            }
            if let Err(e) = service.aggregate(owner_id).await {
                tracing::error!("Background asset refresh for owner {} failed: {}", owner_id, e);
            }
        });

        true
    }

    /// Run the full aggregation pipeline for an owner and cache the result.
    ///
    /// Only a failed fetch aborts the run. Unresolvable locations are kept as unknown, a
    /// failed name lookup leaves names unset and a failed snapshot write leaves the result
    /// cached in memory only.
    async fn aggregate(&self, owner_id: i64) -> Result<Arc<CacheEntry>, Error> {
        let inner = &self.inner;
        let started = Instant::now();

        let assets = inner.fetcher.fetch_all(owner_id).await?;
        let mut forest = build_forest(&assets);

        let root_ids = root_location_ids(&forest);
        let mut locations = inner.resolver.resolve_all(&root_ids, owner_id).await;

        if let Err(e) = enrich_names(&mut forest, owner_id, &inner.names, inner.config.retry).await
        {
            tracing::warn!("Failed to resolve asset names for owner {}: {}", owner_id, e);
        }

        let counts = count_items_by_location(&forest);
        for location in &mut locations {
            location.item_count = counts.get(&location.location_id).copied().unwrap_or(0);
        }
        sort_locations(&mut locations);

        let entry = Arc::new(CacheEntry {
            owner_id,
            timestamp: inner.cache.now(),
            inventory: Arc::new(AssetInventory { forest, locations }),
        });

        if let Err(e) = inner.cache.store(Arc::clone(&entry)).await {
            tracing::error!(
                "Failed to write asset snapshot for owner {}, serving from memory only: {}",
                owner_id,
                e
            );
        }

        let unresolved = entry
            .inventory
            .locations
            .iter()
            .filter(|location| !location.is_resolved())
            .count();
        tracing::info!(
            "Aggregated {} assets in {} locations ({} unresolved) for owner {} in {:?}",
            assets.len(),
            entry.inventory.locations.len(),
            unresolved,
            owner_id,
            started.elapsed()
        );

        Ok(entry)
    }
}
