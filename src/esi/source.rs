//! Narrow traits the aggregation pipeline consumes.
//!
//! Each trait covers exactly one upstream question so the fetcher, resolver and name enricher
//! can be driven by ESI in production and by in-process fakes in tests.

use std::{collections::HashMap, future::Future};

use crate::{
    error::Error,
    model::{
        asset::Asset,
        location::{StationInfo, StructureInfo},
    },
};

/// One page of an owner's asset record set.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPage {
    /// Records on the requested page; an empty list ends pagination
    Assets {
        assets: Vec<Asset>,
        /// Total page count reported by ESI, if the response carried one
        total_pages: Option<u32>,
    },
    /// ESI reported the requested page is past the end of the record set
    PageNotExist,
}

/// Paginated asset records of a character or corporation.
pub trait AssetSource: Clone + Send + Sync + 'static {
    /// Fetch a single page (1-based) of `owner_id`'s assets.
    fn fetch_page(
        &self,
        owner_id: i64,
        page: u32,
    ) -> impl Future<Output = Result<AssetPage, Error>> + Send;
}

/// Player-assigned names of containers and ships.
pub trait NameLookup: Clone + Send + Sync + 'static {
    /// Resolve names for up to [`ESI_ASSET_NAME_REQUEST_LIMIT`](crate::util::eve::ESI_ASSET_NAME_REQUEST_LIMIT)
    /// item IDs owned by `owner_id`. IDs without a name may be missing from the result.
    fn names(
        &self,
        owner_id: i64,
        item_ids: &[i64],
    ) -> impl Future<Output = Result<HashMap<i64, String>, Error>> + Send;
}

/// Public NPC station information.
///
/// Failures are returned unclassified so the caller can retry transient ones before recording
/// a [`LocationError`](crate::error::location::LocationError) on the location.
pub trait StationLookup: Clone + Send + Sync + 'static {
    /// `Ok(None)` when no station exists with the given ID.
    fn station(
        &self,
        location_id: i64,
    ) -> impl Future<Output = Result<Option<StationInfo>, Error>> + Send;
}

/// Player-owned structure information, visible only to owners with docking access.
pub trait StructureLookup: Clone + Send + Sync + 'static {
    /// `Ok(None)` when no structure exists with the given ID. An owner without docking access
    /// gets ESI's 401/403 status error.
    fn structure(
        &self,
        location_id: i64,
        owner_id: i64,
    ) -> impl Future<Output = Result<Option<StructureInfo>, Error>> + Send;
}
