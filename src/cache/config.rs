use std::path::PathBuf;

use chrono::Duration;

/// Lower bound of the asset data TTL.
pub const MIN_ASSET_CACHE_TTL: Duration = Duration::minutes(5);
/// Upper bound of the asset data TTL.
pub const MAX_ASSET_CACHE_TTL: Duration = Duration::hours(24);
/// How long aggregated assets are served as fresh.
pub const DEFAULT_ASSET_CACHE_TTL: Duration = Duration::hours(1);
/// How long an entry stays in memory before the disk snapshot is re-read.
pub const DEFAULT_MEMORY_TTL: Duration = Duration::minutes(5);
/// Age at which disk snapshots are deleted by the prune job.
pub const DEFAULT_DISK_RETENTION: Duration = Duration::days(7);

/// Configuration of the tiered asset cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one JSON snapshot per owner
    pub dir: PathBuf,
    /// Age after which an entry is stale and refreshed in the background
    pub ttl: Duration,
    /// Residency of an entry in the memory tier
    pub memory_ttl: Duration,
    /// Age after which a snapshot is removed from disk
    pub disk_retention: Duration,
}

impl CacheConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_ASSET_CACHE_TTL,
            memory_ttl: DEFAULT_MEMORY_TTL,
            disk_retention: DEFAULT_DISK_RETENTION,
        }
    }

    /// Set the data TTL, clamped to 5 minutes..=24 hours.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl.clamp(MIN_ASSET_CACHE_TTL, MAX_ASSET_CACHE_TTL);
        self
    }

    pub fn with_memory_ttl(mut self, memory_ttl: Duration) -> Self {
        self.memory_ttl = memory_ttl.max(Duration::zero());
        self
    }

    pub fn with_disk_retention(mut self, disk_retention: Duration) -> Self {
        self.disk_retention = disk_retention.max(Duration::zero());
        self
    }
}
