//! Inventory console program.
//!
//! Storage is chosen once at startup from `USE_DATABASE` / `DATABASE_URL`.

use anyhow::Context;

use verduleria_cli::{StdConsole, menu};
use verduleria_infra::{EntityStore, InMemoryStore, PostgresProductStore, StorageMode};
use verduleria_products::Product;

fn open_store(mode: StorageMode) -> anyhow::Result<Box<dyn EntityStore<Product>>> {
    match mode {
        StorageMode::InMemory => {
            tracing::info!(storage = "in-memory", "inventario started");
            Ok(Box::new(InMemoryStore::<Product>::new()))
        }
        StorageMode::Postgres { url } => {
            let store = PostgresProductStore::connect(url)
                .context("failed to connect to the product database")?;
            tracing::info!(storage = "postgres", "inventario started");
            Ok(Box::new(store))
        }
    }
}

fn main() -> anyhow::Result<()> {
    verduleria_observability::init();

    let mode = StorageMode::from_env().context("invalid storage configuration")?;
    let store = open_store(mode)?;

    let mut console = StdConsole::stdio();
    menu::inventory_menu(&*store)
        .run(&mut console)
        .context("inventory menu terminated")?;
    Ok(())
}
