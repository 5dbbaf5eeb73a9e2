pub use super::eve_solar_system::Entity as EveSolarSystem;
pub use super::eve_station::Entity as EveStation;
