//! Infrastructure layer: entity stores (in-memory and Postgres) and configuration.

pub mod config;
pub mod store;

pub use config::{ConfigError, StorageMode};
pub use store::{EntityStore, InMemoryStore, PostgresProductStore, Session, StoreError};
