//! Resolution of root locations into stations and structures.
//!
//! Each distinct root location is offered to an ordered list of [`LocationStrategy`]s; the
//! first one that recognises the ID supplies its kind, name and solar system, which is then
//! looked up in the reference catalog. A location no strategy recognises is reported as
//! [`LocationKind::Unknown`](crate::model::location::LocationKind::Unknown) with the reason
//! attached instead of failing the aggregation.

use std::{cmp::Ordering, collections::HashMap, collections::HashSet, sync::Arc};

use dioxus_logger::tracing;
use futures::{future::BoxFuture, stream, StreamExt};

use crate::{
    error::{location::LocationError, Error},
    esi::{
        source::{StationLookup, StructureLookup},
        EsiClient,
    },
    model::location::{ResolvedLocation, RootLocation},
    reference::ReferenceStore,
    service::retry::{RetryContext, RetryPolicy},
    util::eve::is_structure_id,
};

/// One way of identifying a location.
pub trait LocationStrategy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Identify `location_id` as seen by `owner_id`.
    ///
    /// # Returns
    /// - `Ok(Some(_))` - The strategy recognised the location
    /// - `Ok(None)` - The location is not of this strategy's kind
    /// - `Err(LocationError)` - The lookup failed
    fn resolve<'a>(
        &'a self,
        location_id: i64,
        owner_id: i64,
    ) -> BoxFuture<'a, Result<Option<ResolvedLocation>, LocationError>>;
}

/// NPC stations, answered from the reference catalog before asking ESI.
pub struct StationStrategy<L: StationLookup> {
    reference: Arc<dyn ReferenceStore>,
    lookup: L,
    retry: RetryPolicy,
}

impl<L: StationLookup> StationStrategy<L> {
    pub fn new(reference: Arc<dyn ReferenceStore>, lookup: L) -> Self {
        Self {
            reference,
            lookup,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<L: StationLookup> LocationStrategy for StationStrategy<L> {
    fn name(&self) -> &'static str {
        "station"
    }

    fn resolve<'a>(
        &'a self,
        location_id: i64,
        _owner_id: i64,
    ) -> BoxFuture<'a, Result<Option<ResolvedLocation>, LocationError>> {
        Box::pin(async move {
            if let Some(station) = self.reference.station(location_id) {
                return Ok(Some(station.into()));
            }
            if is_structure_id(location_id) {
                return Ok(None);
            }

            let mut ctx: RetryContext<()> = RetryContext::with_policy(self.retry);
            let station = ctx
                .execute_with_retry(&format!("station {}", location_id), |_| {
                    let lookup = self.lookup.clone();

                    Box::pin(async move { lookup.station(location_id).await })
                })
                .await
                .map_err(|e| upstream(location_id, e))?;

            Ok(station.map(ResolvedLocation::from))
        })
    }
}

/// Player-owned structures, visible only with the owner's docking access.
pub struct StructureStrategy<L: StructureLookup> {
    lookup: L,
    retry: RetryPolicy,
}

impl<L: StructureLookup> StructureStrategy<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<L: StructureLookup> LocationStrategy for StructureStrategy<L> {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn resolve<'a>(
        &'a self,
        location_id: i64,
        owner_id: i64,
    ) -> BoxFuture<'a, Result<Option<ResolvedLocation>, LocationError>> {
        Box::pin(async move {
            let mut ctx: RetryContext<()> = RetryContext::with_policy(self.retry);
            let structure = ctx
                .execute_with_retry(
                    &format!("structure {} for owner {}", location_id, owner_id),
                    |_| {
                        let lookup = self.lookup.clone();

                        Box::pin(async move { lookup.structure(location_id, owner_id).await })
                    },
                )
                .await
                .map_err(|e| {
                    if is_forbidden(&e) {
                        LocationError::Forbidden(location_id)
                    } else {
                        upstream(location_id, e)
                    }
                })?;

            Ok(structure.map(ResolvedLocation::from))
        })
    }
}

fn is_forbidden(error: &Error) -> bool {
    matches!(error, Error::EsiError(e) if matches!(e.status(), Some(401 | 403)))
}

/// Record a lookup failure that outlasted its retries on the location.
fn upstream(location_id: i64, error: Error) -> LocationError {
    LocationError::Upstream {
        location_id,
        reason: error.to_string(),
    }
}

/// Resolves root locations with bounded parallelism.
pub struct LocationResolver {
    strategies: Vec<Arc<dyn LocationStrategy>>,
    reference: Arc<dyn ReferenceStore>,
    workers: usize,
}

impl LocationResolver {
    /// Create a resolver without strategies; every location resolves as unknown until
    /// strategies are added with [`with_strategy`](Self::with_strategy).
    pub fn new(reference: Arc<dyn ReferenceStore>, workers: usize) -> Self {
        Self {
            strategies: Vec::new(),
            reference,
            workers: workers.max(1),
        }
    }

    /// Resolver trying stations first, then structures, both through ESI.
    ///
    /// Transient ESI failures are retried per `retry` before a location is reported unknown.
    pub fn esi(
        client: EsiClient,
        reference: Arc<dyn ReferenceStore>,
        workers: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self::new(Arc::clone(&reference), workers)
            .with_strategy(StationStrategy::new(reference, client.clone()).with_retry(retry))
            .with_strategy(StructureStrategy::new(client).with_retry(retry))
    }

    /// Append a strategy, tried after every strategy added before it.
    pub fn with_strategy(mut self, strategy: impl LocationStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Resolve a single root location.
    ///
    /// When every strategy misses or fails, the location is returned as unknown carrying the
    /// last strategy error, or [`LocationError::NotFound`] if none failed.
    pub async fn resolve(&self, location_id: i64, owner_id: i64) -> RootLocation {
        let mut last_error = None;

        for strategy in &self.strategies {
            match strategy.resolve(location_id, owner_id).await {
                Ok(Some(resolved)) => return self.locate(location_id, resolved),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        "{} lookup failed for location {}: {}",
                        strategy.name(),
                        location_id,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        let error = last_error.unwrap_or(LocationError::NotFound(location_id));
        tracing::warn!("Failed to resolve location {}: {}", location_id, error);

        RootLocation::unknown(location_id, error)
    }

    /// Resolve each distinct location once, in order of first appearance.
    ///
    /// Up to `workers` resolutions run at the same time; a failed location never affects
    /// the others.
    pub async fn resolve_all(&self, location_ids: &[i64], owner_id: i64) -> Vec<RootLocation> {
        let mut seen = HashSet::new();
        let distinct: Vec<i64> = location_ids
            .iter()
            .copied()
            .filter(|location_id| seen.insert(*location_id))
            .collect();

        let mut resolved: HashMap<i64, RootLocation> = stream::iter(distinct.iter().copied())
            .map(|location_id| async move {
                (location_id, self.resolve(location_id, owner_id).await)
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        distinct
            .into_iter()
            .filter_map(|location_id| resolved.remove(&location_id))
            .collect()
    }

    fn locate(&self, location_id: i64, resolved: ResolvedLocation) -> RootLocation {
        let solar_system = self.reference.system_info(resolved.solar_system_id);
        let error = match solar_system {
            Some(_) => None,
            None => Some(LocationError::UnknownSolarSystem {
                location_id,
                system_id: resolved.solar_system_id,
            }),
        };

        RootLocation {
            location_id,
            kind: resolved.kind,
            name: Some(resolved.name),
            solar_system,
            type_id: resolved.type_id,
            error,
            item_count: 0,
        }
    }
}

/// Sort locations by region then system name; locations without system info go last.
///
/// The sort is stable, so locations with equal keys keep their relative order.
pub fn sort_locations(locations: &mut [RootLocation]) {
    locations.sort_by(|a, b| match (&a.solar_system, &b.solar_system) {
        (Some(a), Some(b)) => a
            .region_name
            .cmp(&b.region_name)
            .then_with(|| a.system_name.cmp(&b.system_name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
