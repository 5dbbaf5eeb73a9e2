//! Type search across a containment forest.

use std::collections::HashSet;

use crate::model::asset::{AssetNode, MatchPath, PathNode};

/// Root-to-node paths for every node whose type is in `type_ids`, in depth-first order.
///
/// A match nested inside another match yields its own path as well.
pub fn find_paths(forest: &[AssetNode], type_ids: &[i64]) -> Vec<MatchPath> {
    let wanted: HashSet<i64> = type_ids.iter().copied().collect();
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut path = Vec::new();
    for root in forest {
        collect(root, root.asset.location_id, &wanted, &mut path, &mut matches);
    }

    matches
}

fn collect(
    node: &AssetNode,
    location_id: i64,
    wanted: &HashSet<i64>,
    path: &mut Vec<PathNode>,
    matches: &mut Vec<MatchPath>,
) {
    path.push(PathNode::from(node));

    if wanted.contains(&node.asset.type_id) {
        matches.push(MatchPath {
            location_id,
            nodes: path.clone(),
        });
    }
    for child in &node.children {
        collect(child, location_id, wanted, path, matches);
    }

    path.pop();
}
