//! Tiered cache of aggregated assets.
//!
//! Entries live in a memory map backed by per-owner JSON snapshots on disk. Reads consult
//! memory first and fall back to disk, promoting disk hits into memory. An entry is
//! [`CacheLookup::Fresh`] until it is older than the configured TTL and
//! [`CacheLookup::Stale`] afterwards; stale entries are still served while the caller refreshes
//! them in the background, at most one refresh per owner at a time.

pub mod config;
pub mod disk;

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use tokio::sync::RwLock;

use crate::{
    error::Error,
    model::asset::AssetInventory,
    util::time::{age, Clock},
};

pub use config::CacheConfig;
pub use disk::DiskStore;

/// Result of one successful aggregation.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub owner_id: i64,
    /// When the aggregation that produced this entry finished
    pub timestamp: DateTime<Utc>,
    pub inventory: Arc<AssetInventory>,
}

/// Outcome of a cache read.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Fresh(Arc<CacheEntry>),
    /// Older than the TTL; serve it and refresh
    Stale(Arc<CacheEntry>),
    Absent,
}

struct MemoryEntry {
    entry: Arc<CacheEntry>,
    /// When the entry entered the memory tier
    loaded_at: DateTime<Utc>,
}

/// Cheaply cloneable handle to the shared cache state.
#[derive(Clone)]
pub struct AssetCache {
    inner: Arc<AssetCacheRef>,
}

struct AssetCacheRef {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    memory: RwLock<HashMap<i64, MemoryEntry>>,
    disk: DiskStore,
    /// Per-owner lock held across the memory and disk halves of a write
    writes: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
    refreshing: Mutex<HashSet<i64>>,
}

impl AssetCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let disk = DiskStore::new(config.dir.clone());

        Self {
            inner: Arc::new(AssetCacheRef {
                config,
                clock,
                memory: RwLock::new(HashMap::new()),
                disk,
                writes: Mutex::new(HashMap::new()),
                refreshing: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Look up an owner's entry, memory first, then disk.
    ///
    /// A memory copy resident for longer than the memory TTL is dropped and the disk
    /// snapshot read again, unless the memory copy is the newer of the two. Disk read
    /// failures are logged and reported as absent.
    pub async fn lookup(&self, owner_id: i64) -> CacheLookup {
        let now = self.now();

        {
            let memory = self.inner.memory.read().await;
            if let Some(resident) = memory.get(&owner_id) {
                if age(resident.loaded_at, now) < self.inner.config.memory_ttl {
                    return self.classify(Arc::clone(&resident.entry), now);
                }
            }
        }

        let from_disk = match self.inner.disk.read(owner_id).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to read asset snapshot of owner {}: {}", owner_id, e);
                None
            }
        };

        let mut memory = self.inner.memory.write().await;

        // A store may have landed while the disk was being read.
        if let Some(resident) = memory.get(&owner_id) {
            let still_resident = age(resident.loaded_at, now) < self.inner.config.memory_ttl;
            let newer_than_disk = from_disk
                .as_ref()
                .is_some_and(|entry| resident.entry.timestamp > entry.timestamp);
            if still_resident || newer_than_disk {
                return self.classify(Arc::clone(&resident.entry), now);
            }
        }

        match from_disk {
            Some(entry) => {
                let entry = Arc::new(entry);
                memory.insert(
                    owner_id,
                    MemoryEntry {
                        entry: Arc::clone(&entry),
                        loaded_at: now,
                    },
                );
                tracing::debug!("Promoted asset snapshot of owner {} into memory", owner_id);

                self.classify(entry, now)
            }
            None => {
                memory.remove(&owner_id);
                CacheLookup::Absent
            }
        }
    }

    fn classify(&self, entry: Arc<CacheEntry>, now: DateTime<Utc>) -> CacheLookup {
        if age(entry.timestamp, now) >= self.inner.config.ttl {
            CacheLookup::Stale(entry)
        } else {
            CacheLookup::Fresh(entry)
        }
    }

    fn write_lock(&self, owner_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut writes = self
            .inner
            .writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Arc::clone(writes.entry(owner_id).or_default())
    }

    /// Replace an owner's entry in both tiers.
    ///
    /// An entry older than the one already held for the owner is dropped, so racing writers
    /// always leave the newest aggregation in both tiers. The memory tier is always updated;
    /// the returned error only reports a failed disk write, after which the entry is served
    /// from memory until its residency ends.
    pub async fn store(&self, entry: Arc<CacheEntry>) -> Result<(), Error> {
        let lock = self.write_lock(entry.owner_id);
        let _guard = lock.lock().await;

        if let Some(resident) = self.resident(entry.owner_id).await {
            if resident.timestamp > entry.timestamp {
                tracing::debug!(
                    "Dropping asset entry of owner {} from {}, superseded by {}",
                    entry.owner_id,
                    entry.timestamp,
                    resident.timestamp
                );
                return Ok(());
            }
        }

        self.write_both(entry).await
    }

    /// Replace an owner's entry with one derived from the entry currently cached.
    ///
    /// `update` sees the newest entry, read under the owner's write lock, and returns `None`
    /// to leave the cache untouched. Nothing is written when the owner has no entry.
    ///
    /// # Returns
    /// - `Ok(Some(entry))` - The entry now cached
    /// - `Ok(None)` - No entry cached, or `update` declined
    /// - `Err(Error)` - The snapshot write failed; the entry is cached in memory only
    pub async fn update<F>(&self, owner_id: i64, update: F) -> Result<Option<Arc<CacheEntry>>, Error>
    where
        F: FnOnce(&CacheEntry) -> Option<CacheEntry>,
    {
        let lock = self.write_lock(owner_id);
        let _guard = lock.lock().await;

        let current = match self.lookup(owner_id).await {
            CacheLookup::Fresh(entry) | CacheLookup::Stale(entry) => entry,
            CacheLookup::Absent => return Ok(None),
        };
        let Some(updated) = update(&current) else {
            return Ok(None);
        };

        let updated = Arc::new(updated);
        self.write_both(Arc::clone(&updated)).await?;

        Ok(Some(updated))
    }

    /// Entry held in memory regardless of residency. Callers hold the owner's write lock, so
    /// this is the last entry written or promoted.
    async fn resident(&self, owner_id: i64) -> Option<Arc<CacheEntry>> {
        self.inner
            .memory
            .read()
            .await
            .get(&owner_id)
            .map(|resident| Arc::clone(&resident.entry))
    }

    async fn write_both(&self, entry: Arc<CacheEntry>) -> Result<(), Error> {
        self.inner.memory.write().await.insert(
            entry.owner_id,
            MemoryEntry {
                entry: Arc::clone(&entry),
                loaded_at: self.now(),
            },
        );

        self.inner.disk.write(&entry).await
    }

    /// Remove an owner's entry from both tiers.
    pub async fn clear(&self, owner_id: i64) -> Result<(), Error> {
        let lock = self.write_lock(owner_id);
        let _guard = lock.lock().await;

        self.inner.memory.write().await.remove(&owner_id);
        let removed = self.inner.disk.remove(owner_id).await?;

        tracing::debug!(
            "Cleared asset cache of owner {} (snapshot existed: {})",
            owner_id,
            removed
        );

        Ok(())
    }

    /// Delete snapshots older than the disk retention, and matching memory entries.
    ///
    /// Returns the number of snapshots deleted from disk.
    pub async fn prune_disk(&self) -> Result<usize, Error> {
        let cutoff = self.now() - self.inner.config.disk_retention;

        self.inner
            .memory
            .write()
            .await
            .retain(|_, resident| resident.entry.timestamp >= cutoff);

        self.inner.disk.prune(cutoff).await
    }

    /// Claim the refresh slot of an owner.
    ///
    /// Returns `None` while another refresh of the same owner holds the slot. The slot is
    /// released when the returned guard is dropped.
    pub fn begin_refresh(&self, owner_id: i64) -> Option<RefreshGuard> {
        let mut refreshing = self
            .inner
            .refreshing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        refreshing.insert(owner_id).then(|| RefreshGuard {
            cache: self.clone(),
            owner_id,
        })
    }

    pub fn is_refreshing(&self, owner_id: i64) -> bool {
        self.inner
            .refreshing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&owner_id)
    }
}

/// Holds an owner's refresh slot until dropped.
pub struct RefreshGuard {
    cache: AssetCache,
    owner_id: i64,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.cache
            .inner
            .refreshing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.owner_id);
    }
}
