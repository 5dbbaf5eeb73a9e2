mod get_aggregated_assets;
mod search_by_type;
