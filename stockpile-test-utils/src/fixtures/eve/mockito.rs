//! ESI HTTP mock endpoint creation utilities.
//!
//! This module provides methods for creating mock HTTP endpoints that simulate ESI API
//! responses. Endpoints are registered with the mockito server and can verify they were called
//! the expected number of times. Authenticated endpoints only match requests carrying
//! [`TEST_ACCESS_TOKEN`](crate::constant::TEST_ACCESS_TOKEN).

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{constant::TEST_ACCESS_TOKEN, fixtures::eve::EveFixtures};

/// Asset endpoint path of a character.
pub fn character_assets_path(character_id: i64) -> String {
    format!("/characters/{}/assets/", character_id)
}

/// Asset endpoint path of a corporation.
pub fn corporation_assets_path(corporation_id: i64) -> String {
    format!("/corporations/{}/assets/", corporation_id)
}

fn bearer() -> String {
    format!("Bearer {}", TEST_ACCESS_TOKEN)
}

impl<'a> EveFixtures<'a> {
    /// Create a mock HTTP endpoint for one page of an owner's assets.
    ///
    /// Sets up a mock GET endpoint at `assets_path?page={page}` returning `assets` with an
    /// `X-Pages` header of `total_pages`.
    ///
    /// # Arguments
    /// - `assets_path` - Asset endpoint path, see [`character_assets_path`]
    /// - `page` - 1-based page number matched against the `page` query parameter
    /// - `assets` - Asset records on the page
    /// - `total_pages` - Value of the `X-Pages` header
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn create_asset_page_endpoint(
        &mut self,
        assets_path: &str,
        page: u32,
        assets: Vec<Value>,
        total_pages: u32,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", assets_path)
            .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-pages", &total_pages.to_string())
            .with_body(serde_json::to_string(&assets).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create one mock page endpoint per entry of `pages`, each reporting `pages.len()` pages.
    pub fn create_asset_pages_endpoints(
        &mut self,
        assets_path: &str,
        pages: Vec<Vec<Value>>,
        expected_requests: usize,
    ) -> Vec<Mock> {
        let total_pages = pages.len() as u32;

        pages
            .into_iter()
            .enumerate()
            .map(|(index, assets)| {
                self.create_asset_page_endpoint(
                    assets_path,
                    index as u32 + 1,
                    assets,
                    total_pages,
                    expected_requests,
                )
            })
            .collect()
    }

    /// Create a mock endpoint answering `page` with ESI's "page does not exist" 404.
    pub fn create_asset_page_not_exist_endpoint(
        &mut self,
        assets_path: &str,
        page: u32,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", assets_path)
            .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": "Requested page does not exist!" }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock HTTP endpoint for asset names.
    ///
    /// Sets up a mock POST endpoint at `{assets_path}names/` returning `names`.
    pub fn create_asset_names_endpoint(
        &mut self,
        assets_path: &str,
        names: &[(i64, &str)],
        expected_requests: usize,
    ) -> Mock {
        let body: Vec<Value> = names
            .iter()
            .map(|(item_id, name)| json!({ "item_id": item_id, "name": name }))
            .collect();

        self.setup
            .server
            .mock("POST", format!("{}names/", assets_path).as_str())
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&body).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock HTTP endpoint for NPC station information.
    ///
    /// Sets up a mock GET endpoint at `/universe/stations/{station_id}/` returning `station`.
    pub fn create_station_endpoint(
        &mut self,
        station_id: i64,
        station: Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/stations/{}/", station_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(station.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock HTTP endpoint for player structure information.
    ///
    /// Sets up an authenticated mock GET endpoint at `/universe/structures/{structure_id}/`.
    pub fn create_structure_endpoint(
        &mut self,
        structure_id: i64,
        structure: Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/structures/{}/", structure_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(structure.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint answering with `status` and an ESI error body.
    ///
    /// # Arguments
    /// - `method` - HTTP method to match
    /// - `path` - Request path to match, without query
    /// - `status` - HTTP status to respond with
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn create_error_endpoint(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": format!("status {}", status) }).to_string())
            .expect(expected_requests)
            .create()
    }
}
