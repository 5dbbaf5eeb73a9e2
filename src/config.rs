//! Environment configuration.

use std::path::PathBuf;

use chrono::Duration;

use crate::{
    cache::CacheConfig,
    error::config::ConfigError,
    esi::{
        assets::{AssetOwner, OwnerKind},
        DEFAULT_ESI_URL,
    },
    service::asset::config::AssetServiceConfig,
};

pub const DEFAULT_ASSET_CACHE_DIR: &str = "./cache/assets";

pub struct Config {
    pub user_agent: String,
    pub database_url: String,
    pub esi_url: String,
    pub cache: CacheConfig,
    pub service: AssetServiceConfig,
    /// Owners aggregated at startup and refreshed on schedule
    pub owners: Vec<AssetOwner>,
    /// Bearer token registered for every configured owner
    pub esi_access_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Build the configuration from a variable lookup.
    ///
    /// Empty values are treated as unset. Durations are given in seconds.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| get(var).filter(|value| !value.trim().is_empty());
        let require =
            |var: &str| get(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()));

        let cache_dir = get("ASSET_CACHE_DIR").unwrap_or_else(|| DEFAULT_ASSET_CACHE_DIR.into());
        let mut cache = CacheConfig::new(PathBuf::from(cache_dir));
        if let Some(secs) = parse::<i64>("ASSET_CACHE_TTL_SECS", get("ASSET_CACHE_TTL_SECS"))? {
            cache = cache.with_ttl(Duration::seconds(secs));
        }
        if let Some(secs) = parse::<i64>("ASSET_MEMORY_TTL_SECS", get("ASSET_MEMORY_TTL_SECS"))? {
            cache = cache.with_memory_ttl(Duration::seconds(secs));
        }
        if let Some(secs) = parse::<i64>(
            "ASSET_DISK_RETENTION_SECS",
            get("ASSET_DISK_RETENTION_SECS"),
        )? {
            cache = cache.with_disk_retention(Duration::seconds(secs));
        }

        let page_concurrency = parse::<usize>("ESI_PAGE_CONCURRENCY", get("ESI_PAGE_CONCURRENCY"))?
            .unwrap_or(AssetServiceConfig::DEFAULT_PAGE_CONCURRENCY);
        let location_workers = parse::<usize>("LOCATION_WORKERS", get("LOCATION_WORKERS"))?
            .unwrap_or(AssetServiceConfig::DEFAULT_LOCATION_WORKERS);

        let owners = match get("ASSET_OWNERS") {
            Some(owners) => parse_owners(&owners)?,
            None => Vec::new(),
        };

        Ok(Self {
            user_agent: require("USER_AGENT")?,
            database_url: require("DATABASE_URL")?,
            esi_url: get("ESI_URL").unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            cache,
            service: AssetServiceConfig::new(page_concurrency, location_workers),
            owners,
            esi_access_token: get("ESI_ACCESS_TOKEN"),
        })
    }
}

fn parse<T: std::str::FromStr>(var: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvValue {
                    var: var.to_string(),
                    reason: format!("{:?}: {}", value, e),
                })
        })
        .transpose()
}

/// Parse a comma-separated `character:<id>` / `corporation:<id>` list.
fn parse_owners(value: &str) -> Result<Vec<AssetOwner>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvValue {
        var: "ASSET_OWNERS".to_string(),
        reason,
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (kind, owner_id) = entry
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected <kind>:<id>, got {:?}", entry)))?;
            let kind = match kind.trim().to_ascii_lowercase().as_str() {
                "character" => OwnerKind::Character,
                "corporation" => OwnerKind::Corporation,
                other => return Err(invalid(format!("unknown owner kind {:?}", other))),
            };
            let owner_id = owner_id
                .trim()
                .parse::<i64>()
                .map_err(|e| invalid(format!("{:?}: {}", owner_id, e)))?;

            Ok(AssetOwner { kind, owner_id })
        })
        .collect()
}
