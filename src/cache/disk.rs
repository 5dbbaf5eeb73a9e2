//! On-disk JSON snapshots, one file per owner.
//!
//! Snapshots are written to a temporary file and renamed over the target so readers never
//! see a partial file. Writes, removals and prunes of the same owner are serialized by a
//! per-owner lock. A snapshot whose `version` differs from [`SNAPSHOT_VERSION`] is deleted
//! instead of being parsed.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use serde::{Deserialize, Serialize};

use crate::{
    cache::CacheEntry,
    error::Error,
    model::{
        asset::{AssetInventory, AssetNode},
        location::RootLocation,
    },
};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

const SNAPSHOT_PREFIX: &str = "assets_";
const SNAPSHOT_EXTENSION: &str = "json";

/// Serialized form borrowed from a [`CacheEntry`] so writes do not copy the forest.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    owner_id: i64,
    timestamp: DateTime<Utc>,
    forest: &'a [AssetNode],
    locations: &'a [RootLocation],
}

#[derive(Deserialize)]
struct Snapshot {
    owner_id: i64,
    timestamp: DateTime<Utc>,
    forest: Vec<AssetNode>,
    locations: Vec<RootLocation>,
}

/// Leading fields checked before the full snapshot is decoded.
#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
    timestamp: DateTime<Utc>,
}

pub struct DiskStore {
    dir: PathBuf,
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, owner_id: i64) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", SNAPSHOT_PREFIX, owner_id, SNAPSHOT_EXTENSION))
    }

    fn lock(&self, owner_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Arc::clone(locks.entry(owner_id).or_default())
    }

    /// Read an owner's snapshot.
    ///
    /// # Returns
    /// - `Ok(Some(CacheEntry))` - A readable snapshot of the current version
    /// - `Ok(None)` - No snapshot, or one that was corrupt or of another version (now deleted)
    /// - `Err(Error::IoError)` - The file exists but could not be read
    pub async fn read(&self, owner_id: i64) -> Result<Option<CacheEntry>, Error> {
        let path = self.path(owner_id);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let header = match serde_json::from_slice::<SnapshotHeader>(&bytes) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("Discarding unreadable asset snapshot {:?}: {}", path, e);
                self.discard(owner_id, &bytes).await?;
                return Ok(None);
            }
        };
        if header.version != SNAPSHOT_VERSION {
            tracing::info!(
                "Discarding asset snapshot {:?} with version {} (current {})",
                path,
                header.version,
                SNAPSHOT_VERSION
            );
            self.discard(owner_id, &bytes).await?;
            return Ok(None);
        }

        let snapshot = match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) if snapshot.owner_id == owner_id => snapshot,
            Ok(snapshot) => {
                tracing::warn!(
                    "Discarding asset snapshot {:?} belonging to owner {}",
                    path,
                    snapshot.owner_id
                );
                self.discard(owner_id, &bytes).await?;
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("Discarding corrupt asset snapshot {:?}: {}", path, e);
                self.discard(owner_id, &bytes).await?;
                return Ok(None);
            }
        };

        Ok(Some(CacheEntry {
            owner_id,
            timestamp: snapshot.timestamp,
            inventory: Arc::new(AssetInventory {
                forest: snapshot.forest,
                locations: snapshot.locations,
            }),
        }))
    }

    /// Write an entry's snapshot, replacing any previous one atomically.
    pub async fn write(&self, entry: &CacheEntry) -> Result<(), Error> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            owner_id: entry.owner_id,
            timestamp: entry.timestamp,
            forest: &entry.inventory.forest,
            locations: &entry.inventory.locations,
        };
        let bytes = serde_json::to_vec(&snapshot)?;

        let path = self.path(entry.owner_id);
        let tmp_path = path.with_extension(format!("{}.tmp", SNAPSHOT_EXTENSION));

        let lock = self.lock(entry.owner_id);
        let _guard = lock.lock().await;

        tokio::fs::create_dir_all(&self.dir).await?;
        if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::debug!(
            "Wrote asset snapshot for owner {} ({} bytes)",
            entry.owner_id,
            bytes.len()
        );

        Ok(())
    }

    /// Delete an owner's snapshot.
    ///
    /// Returns whether a snapshot existed.
    pub async fn remove(&self, owner_id: i64) -> Result<bool, Error> {
        let lock = self.lock(owner_id);
        let _guard = lock.lock().await;

        self.remove_file(owner_id).await
    }

    /// Delete a snapshot judged unusable, unless a write replaced it since it was read.
    async fn discard(&self, owner_id: i64, unusable: &[u8]) -> Result<(), Error> {
        let lock = self.lock(owner_id);
        let _guard = lock.lock().await;

        match tokio::fs::read(self.path(owner_id)).await {
            Ok(current) if current == unusable => {
                self.remove_file(owner_id).await?;
            }
            Ok(_) => {
                tracing::debug!(
                    "Asset snapshot of owner {} was rewritten while being read, keeping it",
                    owner_id
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    async fn remove_file(&self, owner_id: i64) -> Result<bool, Error> {
        match tokio::fs::remove_file(self.path(owner_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every snapshot stamped before `cutoff`, along with unreadable or outdated ones.
    ///
    /// Returns the number of snapshots deleted.
    pub async fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize, Error> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut pruned = 0;
        while let Some(entry) = entries.next_entry().await? {
            let Some(owner_id) = owner_id_from_path(&entry.path()) else {
                continue;
            };

            let lock = self.lock(owner_id);
            let _guard = lock.lock().await;

            let expired = match tokio::fs::read(entry.path()).await {
                Ok(bytes) => match serde_json::from_slice::<SnapshotHeader>(&bytes) {
                    Ok(header) => header.version != SNAPSHOT_VERSION || header.timestamp < cutoff,
                    Err(_) => true,
                },
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };

            if expired && self.remove_file(owner_id).await? {
                pruned += 1;
            }
        }

        Ok(pruned)
    }
}

/// Owner ID encoded in a snapshot file name, `None` for any other file.
fn owner_id_from_path(path: &Path) -> Option<i64> {
    if path.extension()? != SNAPSHOT_EXTENSION {
        return None;
    }

    path.file_stem()?
        .to_str()?
        .strip_prefix(SNAPSHOT_PREFIX)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        error::location::LocationError,
        service::asset::tree::build_forest,
        util::test::asset,
    };

    const OWNER_ID: i64 = 2114794365;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()
    }

    fn entry(owner_id: i64, timestamp: DateTime<Utc>) -> CacheEntry {
        let mut location = RootLocation::unknown(1_035_466_617_946, LocationError::Forbidden(1_035_466_617_946));
        location.item_count = 2;

        let mut forest = build_forest(&[asset(1, 1_035_466_617_946, 587), asset(2, 1, 34)]);
        forest[0].children[0].name = Some("Ammo".to_string());

        CacheEntry {
            owner_id,
            timestamp,
            inventory: Arc::new(AssetInventory {
                forest,
                locations: vec![location],
            }),
        }
    }

    /// Expect a written snapshot to read back as an equal entry
    #[tokio::test]
    async fn snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        let written = entry(OWNER_ID, timestamp());

        store.write(&written).await.unwrap();
        let read = store.read(OWNER_ID).await.unwrap().unwrap();

        assert_eq!(read.owner_id, OWNER_ID);
        assert_eq!(read.timestamp, written.timestamp);
        assert_eq!(read.inventory, written.inventory);
    }

    /// Expect the temporary file to be gone after a write
    #[tokio::test]
    async fn write_replaces_snapshot_atomically() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path().join("nested"));

        store.write(&entry(OWNER_ID, timestamp())).await.unwrap();
        store
            .write(&entry(OWNER_ID, timestamp() + Duration::hours(1)))
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec![format!("assets_{}.json", OWNER_ID)]);

        let read = store.read(OWNER_ID).await.unwrap().unwrap();
        assert_eq!(read.timestamp, timestamp() + Duration::hours(1));
    }

    /// Expect a snapshot of another version to be deleted rather than parsed
    #[tokio::test]
    async fn discards_other_snapshot_version() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        std::fs::write(
            store.path(OWNER_ID),
            r#"{"version":0,"owner_id":2114794365,"timestamp":"2025-11-01T12:00:00Z","items":[]}"#,
        )
        .unwrap();

        assert!(store.read(OWNER_ID).await.unwrap().is_none());
        assert!(!store.path(OWNER_ID).exists());
    }

    /// Expect a corrupt snapshot to be treated as absent and deleted
    #[tokio::test]
    async fn discards_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        std::fs::write(store.path(OWNER_ID), b"{\"version\":1,").unwrap();

        assert!(store.read(OWNER_ID).await.unwrap().is_none());
        assert!(!store.path(OWNER_ID).exists());
    }

    /// Expect a snapshot rewritten after it was judged unusable to survive the discard
    #[tokio::test]
    async fn discard_keeps_rewritten_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        store.write(&entry(OWNER_ID, timestamp())).await.unwrap();

        store.discard(OWNER_ID, b"{\"version\":1,").await.unwrap();

        let read = store.read(OWNER_ID).await.unwrap().unwrap();
        assert_eq!(read.timestamp, timestamp());
    }

    #[tokio::test]
    async fn missing_snapshot_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path().join("never-created"));

        assert!(store.read(OWNER_ID).await.unwrap().is_none());
        assert!(!store.remove(OWNER_ID).await.unwrap());
    }

    /// Expect only snapshots older than the cutoff to be pruned
    #[tokio::test]
    async fn prunes_expired_snapshots() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        store.write(&entry(1, timestamp() - Duration::days(8))).await.unwrap();
        store.write(&entry(2, timestamp())).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        let pruned = store.prune(timestamp() - Duration::days(7)).await.unwrap();

        assert_eq!(pruned, 1);
        assert!(!store.path(1).exists());
        assert!(store.path(2).exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn parses_owner_from_file_name() {
        assert_eq!(
            owner_id_from_path(Path::new("/cache/assets_98000001.json")),
            Some(98000001)
        );
        assert_eq!(owner_id_from_path(Path::new("/cache/assets_1.json.tmp")), None);
        assert_eq!(owner_id_from_path(Path::new("/cache/notes.txt")), None);
    }
}
