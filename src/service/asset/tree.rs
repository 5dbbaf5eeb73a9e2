//! Conversion of flat asset records into a containment forest.

use std::collections::{HashMap, HashSet};

use dioxus_logger::tracing;

use crate::model::asset::{Asset, AssetNode};

/// Records grouped by the ID of the item or location containing them.
///
/// Children keep the order they had in the input so the built forest is deterministic.
pub struct ContainerIndex<'a> {
    children: HashMap<i64, Vec<&'a Asset>>,
}

impl<'a> ContainerIndex<'a> {
    pub fn new(assets: &'a [Asset]) -> Self {
        let mut children: HashMap<i64, Vec<&'a Asset>> = HashMap::new();
        for asset in assets {
            children.entry(asset.location_id).or_default().push(asset);
        }

        Self { children }
    }

    pub fn children_of(&self, item_id: i64) -> &[&'a Asset] {
        self.children
            .get(&item_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Build the containment forest of a record set.
///
/// A record is a root when no record in the set has an `item_id` equal to its `location_id`.
/// Roots keep their input order. Records that no root reaches, which only happens when
/// records contain each other in a cycle, are left out and reported.
pub fn build_forest(assets: &[Asset]) -> Vec<AssetNode> {
    let item_ids: HashSet<i64> = assets.iter().map(|asset| asset.item_id).collect();
    let index = ContainerIndex::new(assets);
    let mut path = HashSet::new();

    let forest: Vec<AssetNode> = assets
        .iter()
        .filter(|asset| !item_ids.contains(&asset.location_id))
        .map(|root| build_node(root, &index, &mut path))
        .collect();

    let placed: usize = forest.iter().map(AssetNode::subtree_size).sum();
    if placed < assets.len() {
        tracing::warn!(
            "Dropped {} asset records not reachable from any root location (containment cycle)",
            assets.len() - placed
        );
    }

    forest
}

/// Build the subtree rooted at `asset`.
///
/// `path` holds the item IDs of the ancestors currently being expanded; an asset already on
/// it is emitted as a leaf so malformed input cannot recurse forever.
pub fn build_node(asset: &Asset, index: &ContainerIndex<'_>, path: &mut HashSet<i64>) -> AssetNode {
    if !path.insert(asset.item_id) {
        return AssetNode::new(asset.clone(), Vec::new());
    }

    let children = index
        .children_of(asset.item_id)
        .iter()
        .map(|child| build_node(child, index, path))
        .collect();

    path.remove(&asset.item_id);

    AssetNode::new(asset.clone(), children)
}

/// Distinct root location IDs in order of first appearance.
pub fn root_location_ids(forest: &[AssetNode]) -> Vec<i64> {
    let mut seen = HashSet::new();

    forest
        .iter()
        .map(|root| root.asset.location_id)
        .filter(|location_id| seen.insert(*location_id))
        .collect()
}

/// Number of records held at each root location, counting whole subtrees.
pub fn count_items_by_location(forest: &[AssetNode]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for root in forest {
        *counts.entry(root.asset.location_id).or_insert(0) += root.subtree_size();
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::asset;

    fn collect_item_ids(node: &AssetNode, ids: &mut Vec<i64>) {
        ids.push(node.asset.item_id);
        for child in &node.children {
            collect_item_ids(child, ids);
        }
    }

    /// A station hangar with a ship, its cargo, a nested container and a second station
    fn fixture() -> Vec<Asset> {
        vec![
            asset(11, 1, 34),
            asset(1, 60003760, 587),
            asset(2, 60003760, 3468),
            asset(21, 2, 17366),
            asset(211, 21, 35),
            asset(3, 60008494, 34),
            asset(12, 1, 35),
        ]
    }

    #[test]
    fn builds_single_child_example() {
        let assets = vec![asset(1, 100, 587), asset(2, 1, 34)];

        let forest = build_forest(&assets);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].asset.item_id, 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].asset.item_id, 2);
        assert_eq!(count_items_by_location(&forest)[&100], 2);
    }

    /// Expect every record to appear exactly once in the forest
    #[test]
    fn places_every_record_once() {
        let assets = fixture();

        let forest = build_forest(&assets);

        let mut ids = Vec::new();
        for root in &forest {
            collect_item_ids(root, &mut ids);
        }
        ids.sort_unstable();

        let mut expected: Vec<i64> = assets.iter().map(|a| a.item_id).collect();
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }

    /// Expect roots in input order and children in input order
    #[test]
    fn keeps_input_order() {
        let forest = build_forest(&fixture());

        let roots: Vec<i64> = forest.iter().map(|n| n.asset.item_id).collect();
        assert_eq!(roots, vec![1, 2, 3]);

        let cargo: Vec<i64> = forest[0].children.iter().map(|n| n.asset.item_id).collect();
        assert_eq!(cargo, vec![11, 12]);
    }

    /// Expect the same root set whatever order the records arrive in
    #[test]
    fn root_set_is_order_independent() {
        let assets = fixture();
        let mut reversed = assets.clone();
        reversed.reverse();

        let mut forward: Vec<i64> = build_forest(&assets).iter().map(|n| n.asset.item_id).collect();
        let mut backward: Vec<i64> = build_forest(&reversed)
            .iter()
            .map(|n| n.asset.item_id)
            .collect();
        forward.sort_unstable();
        backward.sort_unstable();

        assert_eq!(forward, backward);
    }

    /// Expect per-location counts to sum to the number of records
    #[test]
    fn item_counts_sum_to_record_count() {
        let assets = fixture();
        let forest = build_forest(&assets);

        let counts = count_items_by_location(&forest);

        assert_eq!(counts[&60003760], 6);
        assert_eq!(counts[&60008494], 1);
        assert_eq!(counts.values().sum::<usize>(), assets.len());
    }

    /// Expect records containing each other to terminate and be left out of the forest
    #[test]
    fn terminates_on_containment_cycle() {
        let assets = vec![
            asset(1, 60003760, 587),
            asset(2, 3, 34),
            asset(3, 2, 34),
            asset(4, 4, 34),
        ];

        let forest = build_forest(&assets);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].asset.item_id, 1);
        assert_eq!(count_items_by_location(&forest).values().sum::<usize>(), 1);
    }

    /// Expect an item already on the expansion path to become a leaf
    #[test]
    fn revisited_item_becomes_leaf() {
        let assets = vec![asset(1, 60003760, 587), asset(1, 1, 34)];
        let index = ContainerIndex::new(&assets);
        let mut path = HashSet::new();

        let node = build_node(&assets[0], &index, &mut path);

        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].children.is_empty());
        assert!(path.is_empty());
    }

    #[test]
    fn root_location_ids_are_distinct() {
        let forest = build_forest(&fixture());

        assert_eq!(root_location_ids(&forest), vec![60003760, 60008494]);
    }
}
