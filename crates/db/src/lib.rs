pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{connect, connect_in_memory, connect_with_settings, DbPool};
pub use fixtures::{seed_demo_hotel, SeedResult, DEMO_CUSTOMER_ID};
pub use store::{InMemoryInventoryStore, RepositoryInventoryStore, SqlInventoryStore};
