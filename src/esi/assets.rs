//! Owner asset endpoints.
//!
//! Characters and corporations expose the same asset and asset-name shapes under different
//! path prefixes; [`CharacterAssets`] and [`CorporationAssets`] bind an [`EsiClient`] to one
//! of them.

use std::collections::HashMap;

use reqwest::{Method, StatusCode};
use serde::Deserialize;

use crate::{
    error::{esi::EsiError, Error},
    esi::{
        source::{AssetPage, AssetSource, NameLookup},
        EsiClient,
    },
    model::asset::Asset,
    util::eve::{ESI_ASSET_NAME_REQUEST_LIMIT, ESI_PAGES_HEADER, ESI_PAGE_NOT_EXIST_MESSAGE},
};

/// Which kind of entity owns an asset record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Character,
    Corporation,
}

impl OwnerKind {
    fn path_segment(self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Corporation => "corporations",
        }
    }

    pub fn assets_endpoint(self, owner_id: i64) -> String {
        format!("/{}/{}/assets/", self.path_segment(), owner_id)
    }

    pub fn names_endpoint(self, owner_id: i64) -> String {
        format!("/{}/{}/assets/names/", self.path_segment(), owner_id)
    }
}

/// An asset owner together with the endpoint family its assets are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetOwner {
    pub kind: OwnerKind,
    pub owner_id: i64,
}

impl AssetOwner {
    pub fn character(owner_id: i64) -> Self {
        Self {
            kind: OwnerKind::Character,
            owner_id,
        }
    }

    pub fn corporation(owner_id: i64) -> Self {
        Self {
            kind: OwnerKind::Corporation,
            owner_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetName {
    item_id: i64,
    name: String,
}

impl EsiClient {
    /// Fetch one page of an owner's assets.
    ///
    /// # Returns
    /// - `Ok(AssetPage::Assets)` - Records on the page along with ESI's `X-Pages` total
    /// - `Ok(AssetPage::PageNotExist)` - 404 stating the page does not exist
    /// - `Err(Error::EsiError)` - Transport failure, unexpected status or undecodable body
    pub async fn fetch_asset_page(
        &self,
        kind: OwnerKind,
        owner_id: i64,
        page: u32,
    ) -> Result<AssetPage, Error> {
        let endpoint = kind.assets_endpoint(owner_id);
        let request = self
            .request(Method::GET, &endpoint, Some(owner_id))
            .await?
            .query(&[("page", page)]);
        let response = Self::send(&endpoint, request).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            if body.to_lowercase().contains(ESI_PAGE_NOT_EXIST_MESSAGE) {
                return Ok(AssetPage::PageNotExist);
            }

            return Err(EsiError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            }
            .into());
        }
        if !status.is_success() {
            return Err(Self::status_error(&endpoint, response).await.into());
        }

        let total_pages = response
            .headers()
            .get(ESI_PAGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u32>().ok());

        let body = Self::body(&endpoint, response).await?;
        let assets: Vec<Asset> = Self::decode(&endpoint, &body)?;

        Ok(AssetPage::Assets {
            assets,
            total_pages,
        })
    }

    /// Resolve player-assigned names for a batch of item IDs.
    ///
    /// # Returns
    /// - `Ok(HashMap)` - Names keyed by item ID, including ESI's `"None"` placeholder
    /// - `Err(Error::InvalidInput)` - The batch is empty or exceeds ESI's 1000 ID limit
    /// - `Err(Error::EsiError)` - Transport failure, unexpected status or undecodable body
    pub async fn fetch_asset_names(
        &self,
        kind: OwnerKind,
        owner_id: i64,
        item_ids: &[i64],
    ) -> Result<HashMap<i64, String>, Error> {
        if item_ids.is_empty() {
            return Err(Error::InvalidInput(
                "asset name lookup requires at least one item ID".to_string(),
            ));
        }
        if item_ids.len() > ESI_ASSET_NAME_REQUEST_LIMIT {
            return Err(Error::InvalidInput(format!(
                "asset name lookup accepts at most {} item IDs, got {}",
                ESI_ASSET_NAME_REQUEST_LIMIT,
                item_ids.len()
            )));
        }

        let endpoint = kind.names_endpoint(owner_id);
        let request = self
            .request(Method::POST, &endpoint, Some(owner_id))
            .await?
            .json(item_ids);
        let response = Self::send(&endpoint, request).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(&endpoint, response).await.into());
        }

        let body = Self::body(&endpoint, response).await?;
        let names: Vec<AssetName> = Self::decode(&endpoint, &body)?;

        Ok(names
            .into_iter()
            .map(|entry| (entry.item_id, entry.name))
            .collect())
    }
}

/// Asset endpoints of characters.
#[derive(Clone)]
pub struct CharacterAssets {
    client: EsiClient,
}

impl CharacterAssets {
    pub fn new(client: EsiClient) -> Self {
        Self { client }
    }
}

impl AssetSource for CharacterAssets {
    async fn fetch_page(&self, owner_id: i64, page: u32) -> Result<AssetPage, Error> {
        self.client
            .fetch_asset_page(OwnerKind::Character, owner_id, page)
            .await
    }
}

impl NameLookup for CharacterAssets {
    async fn names(&self, owner_id: i64, item_ids: &[i64]) -> Result<HashMap<i64, String>, Error> {
        self.client
            .fetch_asset_names(OwnerKind::Character, owner_id, item_ids)
            .await
    }
}

/// Asset endpoints of corporations, which require a director's token.
#[derive(Clone)]
pub struct CorporationAssets {
    client: EsiClient,
}

impl CorporationAssets {
    pub fn new(client: EsiClient) -> Self {
        Self { client }
    }
}

impl AssetSource for CorporationAssets {
    async fn fetch_page(&self, owner_id: i64, page: u32) -> Result<AssetPage, Error> {
        self.client
            .fetch_asset_page(OwnerKind::Corporation, owner_id, page)
            .await
    }
}

impl NameLookup for CorporationAssets {
    async fn names(&self, owner_id: i64, item_ids: &[i64]) -> Result<HashMap<i64, String>, Error> {
        self.client
            .fetch_asset_names(OwnerKind::Corporation, owner_id, item_ids)
            .await
    }
}
