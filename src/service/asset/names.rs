//! Player-assigned names for ships and containers.

use std::{collections::HashMap, collections::HashSet, sync::Arc};

use dioxus_logger::tracing;

use crate::{
    error::Error,
    esi::source::NameLookup,
    model::asset::AssetNode,
    service::retry::{RetryContext, RetryPolicy},
    util::eve::{is_assigned_name, ESI_ASSET_NAME_REQUEST_LIMIT},
};

/// Item IDs of every non-root node that holds other items, without duplicates.
///
/// Roots sit directly in a station or structure and are named by their location instead.
pub fn container_ids(forest: &[AssetNode]) -> Vec<i64> {
    fn walk(node: &AssetNode, seen: &mut HashSet<i64>, ids: &mut Vec<i64>) {
        if !node.children.is_empty() && seen.insert(node.asset.item_id) {
            ids.push(node.asset.item_id);
        }
        for child in &node.children {
            walk(child, seen, ids);
        }
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for root in forest {
        for child in &root.children {
            walk(child, &mut seen, &mut ids);
        }
    }

    ids
}

/// Resolve and attach names of containers in `forest`.
///
/// IDs are looked up in chunks of at most 1000; chunks already answered are not requested
/// again when a later chunk is retried. ESI's `"None"` placeholder is ignored.
///
/// # Returns
/// - `Ok(usize)` - Number of nodes that received a name
/// - `Err(Error)` - A chunk failed permanently or exhausted its retries; no names are set
pub async fn enrich_names<N: NameLookup>(
    forest: &mut [AssetNode],
    owner_id: i64,
    lookup: &N,
    retry: RetryPolicy,
) -> Result<usize, Error> {
    let ids = container_ids(forest);
    if ids.is_empty() {
        return Ok(0);
    }

    let names = fetch_names(lookup, owner_id, ids, retry).await?;

    Ok(apply_names(forest, &names))
}

async fn fetch_names<N: NameLookup>(
    lookup: &N,
    owner_id: i64,
    ids: Vec<i64>,
    retry: RetryPolicy,
) -> Result<HashMap<i64, String>, Error> {
    let chunks: Arc<Vec<Vec<i64>>> = Arc::new(
        ids.chunks(ESI_ASSET_NAME_REQUEST_LIMIT)
            .map(<[i64]>::to_vec)
            .collect(),
    );

    let mut ctx: RetryContext<HashMap<usize, HashMap<i64, String>>> =
        RetryContext::with_policy(retry);
    let description = format!(
        "{} asset names in {} batches for owner {}",
        ids.len(),
        chunks.len(),
        owner_id
    );

    let resolved = ctx
        .execute_with_retry(&description, |resolved| {
            let lookup = lookup.clone();
            let chunks = Arc::clone(&chunks);

            Box::pin(async move {
                for (index, chunk) in chunks.iter().enumerate() {
                    if resolved.contains_key(&index) {
                        continue;
                    }

                    let names = lookup.names(owner_id, chunk).await?;
                    resolved.insert(index, names);
                }

                Ok(resolved.clone())
            })
        })
        .await?;

    let names: HashMap<i64, String> = resolved
        .into_values()
        .flatten()
        .filter(|(_, name)| is_assigned_name(name))
        .collect();

    tracing::debug!(
        "Resolved {} of {} asset names for owner {}",
        names.len(),
        ids.len(),
        owner_id
    );

    Ok(names)
}

/// Set `name` on every node whose item ID has an entry in `names`.
pub fn apply_names(forest: &mut [AssetNode], names: &HashMap<i64, String>) -> usize {
    let mut applied = 0;
    for node in forest.iter_mut() {
        if let Some(name) = names.get(&node.asset.item_id) {
            node.name = Some(name.clone());
            applied += 1;
        }
        applied += apply_names(&mut node.children, names);
    }

    applied
}
