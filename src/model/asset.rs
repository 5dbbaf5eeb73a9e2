use serde::{Deserialize, Serialize};

use crate::model::location::RootLocation;

/// One item record as served by the ESI assets endpoints.
///
/// Decoded directly from the ESI JSON shape. `item_id` is unique within one owner's record
/// set for the duration of one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub item_id: i64,
    /// Item ID of the containing item, or the ID of the station/structure/system holding it
    pub location_id: i64,
    /// `true` for unpackaged singletons, `false` for stacks
    pub is_singleton: bool,
    pub type_id: i64,
    pub quantity: i32,
    /// Slot within the container (`Hangar`, `Cargo`, `HiSlot0`, ...)
    pub location_flag: String,
    /// ESI location category (`station`, `solar_system`, `item`, `other`)
    pub location_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blueprint_copy: Option<bool>,
}

/// A node of the containment forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetNode {
    pub asset: Asset,
    pub children: Vec<AssetNode>,
    /// Player-assigned name for containers, filled in by name enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AssetNode {
    pub fn new(asset: Asset, children: Vec<AssetNode>) -> Self {
        Self {
            asset,
            children,
            name: None,
        }
    }

    /// Number of records in this subtree, counting this node once.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(AssetNode::subtree_size)
            .sum::<usize>()
    }
}

/// Result of one aggregation: the containment forest and its resolved root locations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetInventory {
    pub forest: Vec<AssetNode>,
    pub locations: Vec<RootLocation>,
}

impl AssetInventory {
    /// Total number of records in the forest.
    pub fn item_count(&self) -> usize {
        self.forest.iter().map(AssetNode::subtree_size).sum()
    }
}

/// A node on a search result path, without its children.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub asset: Asset,
    pub name: Option<String>,
}

impl From<&AssetNode> for PathNode {
    fn from(node: &AssetNode) -> Self {
        Self {
            asset: node.asset.clone(),
            name: node.name.clone(),
        }
    }
}

/// Root-to-match path for one search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPath {
    /// Root location the path's first node sits in
    pub location_id: i64,
    pub nodes: Vec<PathNode>,
}

impl MatchPath {
    /// The matching node, which is always the last node on the path.
    pub fn matched(&self) -> Option<&PathNode> {
        self.nodes.last()
    }
}
