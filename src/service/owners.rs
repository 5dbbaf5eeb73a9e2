//! Character and corporation asset services sharing one cache and ESI client.

use std::sync::Arc;

use crate::{
    cache::AssetCache,
    error::Error,
    esi::{
        assets::{AssetOwner, OwnerKind},
        CharacterAssets, CorporationAssets, EsiClient,
    },
    model::{
        asset::{AssetInventory, MatchPath},
        location::RootLocation,
    },
    reference::ReferenceStore,
    service::asset::{config::AssetServiceConfig, location::LocationResolver, AssetService},
};

pub type CharacterAssetService = AssetService<CharacterAssets, CharacterAssets>;
pub type CorporationAssetService = AssetService<CorporationAssets, CorporationAssets>;

/// Routes owner requests to the service matching the owner's kind.
///
/// Character and corporation IDs are allocated from disjoint ranges, so both services share
/// one cache keyed by owner ID.
#[derive(Clone)]
pub struct OwnerServices {
    pub characters: CharacterAssetService,
    pub corporations: CorporationAssetService,
}

impl OwnerServices {
    pub fn new(
        client: EsiClient,
        reference: Arc<dyn ReferenceStore>,
        cache: AssetCache,
        config: AssetServiceConfig,
    ) -> Self {
        let resolver = || {
            LocationResolver::esi(
                client.clone(),
                Arc::clone(&reference),
                config.location_workers,
                config.retry,
            )
        };

        let characters = AssetService::new(
            CharacterAssets::new(client.clone()),
            CharacterAssets::new(client.clone()),
            resolver(),
            cache.clone(),
            config.clone(),
        );
        let corporations = AssetService::new(
            CorporationAssets::new(client.clone()),
            CorporationAssets::new(client.clone()),
            resolver(),
            cache,
            config.clone(),
        );

        Self {
            characters,
            corporations,
        }
    }

    pub fn cache(&self) -> &AssetCache {
        self.characters.cache()
    }

    pub async fn get_aggregated_assets(
        &self,
        owner: AssetOwner,
        force_refresh: bool,
    ) -> Result<Arc<AssetInventory>, Error> {
        match owner.kind {
            OwnerKind::Character => {
                self.characters
                    .get_aggregated_assets(owner.owner_id, force_refresh)
                    .await
            }
            OwnerKind::Corporation => {
                self.corporations
                    .get_aggregated_assets(owner.owner_id, force_refresh)
                    .await
            }
        }
    }

    pub async fn search_by_type(
        &self,
        owner: AssetOwner,
        type_ids: &[i64],
    ) -> Result<Vec<MatchPath>, Error> {
        match owner.kind {
            OwnerKind::Character => self.characters.search_by_type(owner.owner_id, type_ids).await,
            OwnerKind::Corporation => {
                self.corporations
                    .search_by_type(owner.owner_id, type_ids)
                    .await
            }
        }
    }

    pub async fn resolve_location(&self, owner: AssetOwner, location_id: i64) -> RootLocation {
        match owner.kind {
            OwnerKind::Character => {
                self.characters
                    .resolve_location(owner.owner_id, location_id)
                    .await
            }
            OwnerKind::Corporation => {
                self.corporations
                    .resolve_location(owner.owner_id, location_id)
                    .await
            }
        }
    }

    /// Start a background refresh of the owner unless one is already running.
    pub fn spawn_refresh(&self, owner: AssetOwner) -> bool {
        match owner.kind {
            OwnerKind::Character => self.characters.spawn_refresh(owner.owner_id),
            OwnerKind::Corporation => self.corporations.spawn_refresh(owner.owner_id),
        }
    }
}
