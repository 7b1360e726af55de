//! Fruit list console program. Always in-memory.

use anyhow::Context;

use verduleria_cli::{StdConsole, menu};
use verduleria_fruits::Fruit;
use verduleria_infra::InMemoryStore;

fn main() -> anyhow::Result<()> {
    verduleria_observability::init();

    let store: InMemoryStore<Fruit> = InMemoryStore::new();
    tracing::info!(storage = "in-memory", "frutas started");

    let mut console = StdConsole::stdio();
    menu::fruit_menu(&store)
        .run(&mut console)
        .context("fruit menu terminated")?;
    Ok(())
}
