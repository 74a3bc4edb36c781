use std::io::{self, Write};

use alcohol_tracker::catalog::{catalog_schema, DEFAULT_DB_PATH};
use alcohol_tracker::entry::{add_entry, EntryKind};
use alcohol_tracker::input::Prompter;
use alcohol_tracker::sqlite::{SqliteConfig, SqliteStore};
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let config = SqliteConfig::new(DEFAULT_DB_PATH, catalog_schema());
    let store = SqliteStore::new(config);
    info!(db_path = %store.path(), "opening catalog");

    store
        .initialize_schema()
        .with_context(|| format!("failed to create tables in {}", store.path()))?;

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    add_entry(&store, EntryKind::Drink, &mut prompter).context("failed to add drink")?;
    add_entry(&store, EntryKind::Ingredient, &mut prompter).context("failed to add ingredient")?;

    let mut out = prompter.into_output();
    for table in &catalog_schema().tables {
        let data = store
            .fetch_all(table)
            .with_context(|| format!("failed to read table {}", table.name))?;
        data.write_tsv(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
