//! EVE Online and ESI constants.

/// ESI hard limit for the `/assets/names/` endpoints.
///
/// Both the character and corporation variants accept at most 1000 item IDs per request;
/// larger batches are rejected with 400 Bad Request.
pub const ESI_ASSET_NAME_REQUEST_LIMIT: usize = 1000;

/// Name ESI reports for containers and ships that were never renamed.
pub const ESI_UNNAMED_ITEM: &str = "None";

/// Body fragment of the 404 ESI returns when a requested page is past the last one.
pub const ESI_PAGE_NOT_EXIST_MESSAGE: &str = "page does not exist";

/// Header carrying the total page count of a paginated ESI endpoint.
pub const ESI_PAGES_HEADER: &str = "x-pages";

/// Lowest ID assigned to player-owned Upwell structures.
///
/// NPC stations, solar systems and items all use IDs below this value.
pub const STRUCTURE_ID_FLOOR: i64 = 1_000_000_000_000;

/// Whether a location ID belongs to a player-owned structure.
pub fn is_structure_id(location_id: i64) -> bool {
    location_id >= STRUCTURE_ID_FLOOR
}

/// Whether an asset name returned by ESI is a real, player-assigned name.
pub fn is_assigned_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != ESI_UNNAMED_ITEM
}
