//! Entity storage: the store contract and its two backends.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{EntityStore, Session, StoreError};
