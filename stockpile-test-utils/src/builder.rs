//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring test environments before execution.
//! The builder pattern allows chaining multiple configuration methods together, with all operations
//! queued and executed during the final `build()` call.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{
    error::TestError,
    fixtures::eve::mockito::{character_assets_path, corporation_assets_path},
    TestContext,
};

/// Builder for declarative test initialization.
///
/// Provides an interface for setting up test environments with database tables,
/// reference data fixtures, and ESI mock endpoints. Methods can be chained together
/// and finalized with `build()` to create a complete test setup.
pub struct TestBuilder {
    // Tables to create
    tables: Vec<TableCreateStatement>,

    // Database fixtures to insert
    solar_systems: Vec<(i64, String)>,    // (system_id, name)
    stations: Vec<(i64, i64, String)>,    // (station_id, system_id, name)

    // Mock endpoints to create
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,

    // Pre-configured endpoint shortcuts
    asset_endpoints: Vec<(String, Vec<Vec<Value>>, usize)>, // (assets_path, pages, expected_requests)
    asset_name_endpoints: Vec<(String, Vec<(i64, String)>, usize)>, // (assets_path, names, expected_requests)
    station_endpoints: Vec<(i64, Value, usize)>,
    structure_endpoints: Vec<(i64, Value, usize)>,
}

impl TestBuilder {
    /// Create a new TestBuilder.
    ///
    /// Initializes an empty builder with no tables, fixtures, or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            solar_systems: Vec::new(),
            stations: Vec::new(),
            mock_builders: Vec::new(),
            asset_endpoints: Vec::new(),
            asset_name_endpoints: Vec::new(),
            station_endpoints: Vec::new(),
            structure_endpoints: Vec::new(),
        }
    }

    /// Add the solar system and station reference tables to the test database.
    pub fn with_reference_tables(self) -> Self {
        self.with_table(entity::prelude::EveSolarSystem)
            .with_table(entity::prelude::EveStation)
    }

    /// Add a custom entity table to the test database.
    ///
    /// Generates a CREATE TABLE statement for the entity, which will be executed during `build()`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stockpile_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), stockpile_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(EveSolarSystem)
    ///     .with_table(EveStation)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert mock solar system into database.
    ///
    /// Requires the reference tables, see [`with_reference_tables`](Self::with_reference_tables).
    pub fn with_mock_solar_system(mut self, system_id: i64, name: &str) -> Self {
        self.solar_systems.push((system_id, name.to_string()));
        self
    }

    /// Insert mock NPC station into database, creating its solar system if missing.
    pub fn with_mock_station(mut self, station_id: i64, system_id: i64, name: &str) -> Self {
        self.stations
            .push((station_id, system_id, name.to_string()));
        self
    }

    /// Add mock asset page endpoints of a character to the test server.
    ///
    /// One endpoint is created per page, each reporting `pages.len()` through `X-Pages`
    /// and expecting `expected_requests` calls.
    pub fn with_character_assets_endpoint(
        mut self,
        character_id: i64,
        pages: Vec<Vec<Value>>,
        expected_requests: usize,
    ) -> Self {
        self.asset_endpoints.push((
            character_assets_path(character_id),
            pages,
            expected_requests,
        ));
        self
    }

    /// Add mock asset page endpoints of a corporation to the test server.
    pub fn with_corporation_assets_endpoint(
        mut self,
        corporation_id: i64,
        pages: Vec<Vec<Value>>,
        expected_requests: usize,
    ) -> Self {
        self.asset_endpoints.push((
            corporation_assets_path(corporation_id),
            pages,
            expected_requests,
        ));
        self
    }

    /// Add mock asset name endpoint of a character to the test server.
    pub fn with_character_asset_names_endpoint(
        mut self,
        character_id: i64,
        names: Vec<(i64, &str)>,
        expected_requests: usize,
    ) -> Self {
        self.asset_name_endpoints.push((
            character_assets_path(character_id),
            names
                .into_iter()
                .map(|(item_id, name)| (item_id, name.to_string()))
                .collect(),
            expected_requests,
        ));
        self
    }

    /// Add mock NPC station endpoint to the test server.
    pub fn with_station_endpoint(
        mut self,
        station_id: i64,
        station: Value,
        expected_requests: usize,
    ) -> Self {
        self.station_endpoints
            .push((station_id, station, expected_requests));
        self
    }

    /// Add mock player structure endpoint to the test server.
    pub fn with_structure_endpoint(
        mut self,
        structure_id: i64,
        structure: Value,
        expected_requests: usize,
    ) -> Self {
        self.structure_endpoints
            .push((structure_id, structure, expected_requests));
        self
    }

    /// Add a custom mock endpoint with full control.
    ///
    /// Allows complete customization of mock endpoint behavior by providing direct access
    /// to the mockito ServerGuard. Use this for endpoints not covered by helper methods.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context.
    ///
    /// Executes all queued operations in order:
    /// 1. Create database tables
    /// 2. Insert database fixtures
    /// 3. Create mock endpoints
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test context
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        // 1. Create tables
        setup.with_tables(self.tables).await?;

        // 2. Insert fixtures
        for (system_id, name) in self.solar_systems {
            setup.eve().insert_mock_solar_system(system_id, &name).await?;
        }

        for (station_id, system_id, name) in self.stations {
            setup
                .eve()
                .insert_mock_station(station_id, system_id, &name)
                .await?;
        }

        // 3. Create mock endpoints
        // Note: Custom endpoints are created first to allow proper sequential mockito matching
        // when tests need to create multiple mocks for the same path (e.g., error then success)
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (assets_path, pages, expected) in self.asset_endpoints {
            mocks.extend(
                setup
                    .eve()
                    .create_asset_pages_endpoints(&assets_path, pages, expected),
            );
        }

        for (assets_path, names, expected) in self.asset_name_endpoints {
            let names: Vec<(i64, &str)> = names
                .iter()
                .map(|(item_id, name)| (*item_id, name.as_str()))
                .collect();
            mocks.push(
                setup
                    .eve()
                    .create_asset_names_endpoint(&assets_path, &names, expected),
            );
        }

        for (station_id, station, expected) in self.station_endpoints {
            mocks.push(
                setup
                    .eve()
                    .create_station_endpoint(station_id, station, expected),
            );
        }

        for (structure_id, structure, expected) in self.structure_endpoints {
            mocks.push(
                setup
                    .eve()
                    .create_structure_endpoint(structure_id, structure, expected),
            );
        }

        // Store mocks in setup so they live as long as the test
        setup.mocks.extend(mocks);

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_creates_reference_tables() {
        let result = TestBuilder::new().with_reference_tables().build().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_builder_chains_methods() {
        let result = TestBuilder::new()
            .with_reference_tables()
            .with_mock_solar_system(30000142, "Jita")
            .with_mock_station(60003760, 30000142, "Jita IV - Moon 4 - Caldari Navy Assembly Plant")
            .build()
            .await;
        assert!(result.is_ok());
    }
}
